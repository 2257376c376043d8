//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `firesafe_core` linkage.
//! - Open the configured database so schema migrations can be checked locally.
//! - Keep output deterministic for quick local sanity checks.

use firesafe_core::db::migrations::{current_user_version, latest_version};
use firesafe_core::db::open_db;
use firesafe_core::{core_version, init_logging, ping, CoreConfig};
use log::error;
use std::process::ExitCode;

fn main() -> ExitCode {
    let config = CoreConfig::from_env();

    if let Some(log_dir) = config.log_dir.as_ref().and_then(|dir| dir.to_str()) {
        if let Err(err) = init_logging(&config.log_level, log_dir) {
            eprintln!("firesafe logging disabled: {err}");
        }
    }

    println!("firesafe_core ping={}", ping());
    println!("firesafe_core version={}", core_version());
    println!("firesafe_core latest_schema={}", latest_version());

    let conn = match open_db(&config.db_path) {
        Ok(conn) => conn,
        Err(err) => {
            error!("event=cli_probe module=cli status=error error={err}");
            eprintln!("firesafe db open failed ({}): {err}", config.db_path.display());
            return ExitCode::FAILURE;
        }
    };

    match current_user_version(&conn) {
        Ok(version) => {
            println!("firesafe_core db_schema={version}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("firesafe schema check failed: {err}");
            ExitCode::FAILURE
        }
    }
}
