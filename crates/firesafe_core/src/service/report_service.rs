//! Expiring-equipment report use-case.
//!
//! # Responsibility
//! - Validate the query window before touching the store.
//! - Run one owner-scoped store query, then filter, aggregate and render.
//!
//! # Invariants
//! - `start > end` fails with a validation error and no store call.
//! - Identical inputs on unmodified storage yield identical output.
//! - An empty result is reported as `RenderOutcome::NothingToRender`.

use crate::model::company::OwnerId;
use crate::repo::company_repo::{CompanyRepository, RepoError};
use crate::report::aggregate::{aggregate, ExpiringReport};
use crate::report::range_filter::{filter_expiring, ExpirationWindow, InvalidWindow};
use crate::report::render::{render_report, RenderOutcome, ReportRenderer};
use crate::service::ErrorKind;
use chrono::NaiveDate;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Service error for report use-cases.
#[derive(Debug)]
pub enum ReportServiceError {
    InvalidWindow(InvalidWindow),
    Repo(RepoError),
    Render(Box<dyn Error + Send + Sync>),
}

impl ReportServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidWindow(_) => ErrorKind::Validation,
            Self::Repo(_) => ErrorKind::Connection,
            Self::Render(_) => ErrorKind::Renderer,
        }
    }
}

impl Display for ReportServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidWindow(err) => write!(f, "{err}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::Render(err) => write!(f, "report rendering failed: {err}"),
        }
    }
}

impl Error for ReportServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidWindow(err) => Some(err),
            Self::Repo(err) => Some(err),
            Self::Render(err) => Some(err.as_ref()),
        }
    }
}

impl From<InvalidWindow> for ReportServiceError {
    fn from(value: InvalidWindow) -> Self {
        Self::InvalidWindow(value)
    }
}

impl From<RepoError> for ReportServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Report service facade over repository implementations.
pub struct ReportService<R: CompanyRepository> {
    repo: R,
}

impl<R: CompanyRepository> ReportService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Builds the owner's report of equipment expiring in `[start, end]`.
    pub fn expiring_report(
        &self,
        owner: &OwnerId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<ExpiringReport, ReportServiceError> {
        let started_at = Instant::now();
        let window = ExpirationWindow::new(start, end).inspect_err(|_| {
            info!("event=report_generate module=service status=rejected error_code=invalid_window");
        })?;

        let companies = self.repo.find_by_owner(owner).map_err(|err| {
            error!("event=report_generate module=service status=error error={err}");
            ReportServiceError::from(err)
        })?;
        let report = aggregate(window, filter_expiring(&companies, owner, &window));

        info!(
            "event=report_generate module=service status=ok scanned_companies={} company_count={} item_count={} duration_ms={}",
            companies.len(),
            report.company_count(),
            report.item_count(),
            started_at.elapsed().as_millis()
        );
        Ok(report)
    }

    /// Builds the report and hands it to `renderer` unless it is empty.
    pub fn render_expiring<T: ReportRenderer>(
        &self,
        owner: &OwnerId,
        start: NaiveDate,
        end: NaiveDate,
        renderer: &T,
    ) -> Result<RenderOutcome<T::Output>, ReportServiceError> {
        let report = self.expiring_report(owner, start, end)?;
        render_report(&report, renderer).map_err(|err| {
            error!("event=report_render module=service status=error error={err}");
            ReportServiceError::Render(Box::new(err))
        })
    }
}
