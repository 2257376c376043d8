//! Core domain logic for firesafe equipment tracking.
//! This crate is the single source of truth for expiration and tenant rules.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod report;
pub mod service;

pub use config::CoreConfig;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::company::{Company, CompanyId, CompanyMeta, CompanyValidationError, OwnerId};
pub use model::draft::DraftCompany;
pub use model::equipment::{
    EquipmentItem, EquipmentKind, EquipmentValidationError, ExtinguisherAgent, Measure,
    NewEquipmentItem, EXTINGUISHER_CAPACITIES, HOSE_LENGTHS,
};
pub use repo::company_repo::{CompanyRepository, RepoError, RepoResult, SqliteCompanyRepository};
pub use report::aggregate::{aggregate, EquipmentLine, ExpiringReport, ReportEntry};
pub use report::expiration::{expiration_of, is_expired_on, VALIDITY_PERIOD_DAYS};
pub use report::range_filter::{filter_expiring, ExpirationWindow, InvalidWindow};
pub use report::render::{render_report, PlainTextRenderer, RenderOutcome, ReportRenderer};
pub use service::company_service::{
    CompanyRegistration, CompanyService, CompanyServiceError, DeleteOutcome,
};
pub use service::report_service::{ReportService, ReportServiceError};
pub use service::ErrorKind;

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
