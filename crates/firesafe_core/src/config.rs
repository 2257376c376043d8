//! Runtime configuration resolved from environment variables.
//!
//! # Responsibility
//! - Resolve database path and logging settings with safe defaults.
//!
//! # Invariants
//! - Blank variables count as unset.
//! - Resolution never fails; validation of values happens where they are used
//!   (`open_db`, `init_logging`).

use crate::logging::default_log_level;
use std::path::PathBuf;

pub const ENV_DB_PATH: &str = "FIRESAFE_DB_PATH";
pub const ENV_LOG_LEVEL: &str = "FIRESAFE_LOG_LEVEL";
pub const ENV_LOG_DIR: &str = "FIRESAFE_LOG_DIR";

const DEFAULT_DB_FILE_NAME: &str = "firesafe.sqlite3";

/// Resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_level: String,
    /// Logging stays disabled when `None`.
    pub log_dir: Option<PathBuf>,
}

impl CoreConfig {
    /// Resolves settings from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves settings from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        Self {
            db_path: read(ENV_DB_PATH)
                .map(PathBuf::from)
                .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME)),
            log_level: read(ENV_LOG_LEVEL).unwrap_or_else(|| default_log_level().to_string()),
            log_dir: read(ENV_LOG_DIR).map(PathBuf::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{CoreConfig, ENV_DB_PATH, ENV_LOG_DIR, ENV_LOG_LEVEL};
    use crate::logging::default_log_level;
    use std::collections::HashMap;
    use std::path::PathBuf;

    #[test]
    fn defaults_apply_when_unset_or_blank() {
        let config = CoreConfig::from_lookup(|key| (key == ENV_LOG_DIR).then(|| "  ".to_string()));
        assert!(config.db_path.ends_with("firesafe.sqlite3"));
        assert_eq!(config.log_level, default_log_level());
        assert_eq!(config.log_dir, None);
    }

    #[test]
    fn explicit_values_are_trimmed() {
        let vars = HashMap::from([
            (ENV_DB_PATH, " /data/firesafe.db ".to_string()),
            (ENV_LOG_LEVEL, "warn".to_string()),
            (ENV_LOG_DIR, "/var/log/firesafe".to_string()),
        ]);
        let config = CoreConfig::from_lookup(|key| vars.get(key).cloned());
        assert_eq!(config.db_path, PathBuf::from("/data/firesafe.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.log_dir, Some(PathBuf::from("/var/log/firesafe")));
    }
}
