//! Company registration and maintenance use-cases.
//!
//! # Responsibility
//! - Commit a draft company to the store and clear the draft on success.
//! - Append equipment to, list, and delete an owner's companies.
//!
//! # Invariants
//! - A draft is cleared only after the store confirmed the write.
//! - Deleting an absent company is a zero-count outcome, not an error.

use crate::model::company::{Company, CompanyId, CompanyValidationError, OwnerId};
use crate::model::draft::DraftCompany;
use crate::repo::company_repo::{CompanyRepository, RepoError};
use crate::service::ErrorKind;
use chrono::{NaiveDate, Utc};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Company metadata collected by the data-entry collaborator.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyRegistration {
    pub name: String,
    pub address: String,
    pub city: Option<String>,
    /// Defaults to today's UTC date.
    pub registered_at: Option<NaiveDate>,
}

/// Outcome of a delete request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeleteOutcome {
    pub deleted_count: usize,
}

impl DeleteOutcome {
    /// Whether the delete target was absent.
    pub fn is_not_found(&self) -> bool {
        self.deleted_count == 0
    }
}

/// Service error for company use-cases.
#[derive(Debug)]
pub enum CompanyServiceError {
    Validation(CompanyValidationError),
    DuplicateName(String),
    CompanyNotFound(CompanyId),
    Repo(RepoError),
}

impl CompanyServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) | Self::DuplicateName(_) => ErrorKind::Validation,
            Self::CompanyNotFound(_) => ErrorKind::NotFound,
            Self::Repo(_) => ErrorKind::Connection,
        }
    }
}

impl Display for CompanyServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::DuplicateName(name) => {
                write!(f, "a company named `{name}` is already registered")
            }
            Self::CompanyNotFound(id) => write!(f, "company not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CompanyServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<CompanyValidationError> for CompanyServiceError {
    fn from(value: CompanyValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for CompanyServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::Validation(err) => Self::Validation(err),
            RepoError::DuplicateName(name) => Self::DuplicateName(name),
            RepoError::NotFound(id) => Self::CompanyNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Company service facade over repository implementations.
pub struct CompanyService<R: CompanyRepository> {
    repo: R,
}

impl<R: CompanyRepository> CompanyService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Registers a company carrying the draft's equipment.
    ///
    /// # Contract
    /// - Validation runs before any store call.
    /// - On success the draft is cleared; on any failure it is left intact.
    pub fn register_company(
        &mut self,
        owner: &OwnerId,
        registration: &CompanyRegistration,
        draft: &mut DraftCompany,
    ) -> Result<CompanyId, CompanyServiceError> {
        let started_at = Instant::now();
        let registered_at = registration.registered_at.unwrap_or_else(today_utc);
        let company = Company::new(
            owner.clone(),
            &registration.name,
            &registration.address,
            registration.city.as_deref(),
            registered_at,
            draft.items().to_vec(),
        )
        .inspect_err(|err| {
            info!(
                "event=company_register module=service status=rejected error_code=validation error={}",
                err
            );
        })?;

        let id = self.repo.insert_company(&company).map_err(|err| {
            log_store_failure("company_register", &err);
            CompanyServiceError::from(err)
        })?;
        draft.clear();

        info!(
            "event=company_register module=service status=ok company_id={} equipment_count={} duration_ms={}",
            id,
            company.equipment().len(),
            started_at.elapsed().as_millis()
        );
        Ok(id)
    }

    /// Appends the draft's equipment to an existing company of `owner`.
    ///
    /// The company must exist and belong to `owner` even when the draft is
    /// empty; an empty draft then writes nothing. The draft is cleared on
    /// success.
    pub fn append_equipment(
        &mut self,
        id: CompanyId,
        owner: &OwnerId,
        draft: &mut DraftCompany,
    ) -> Result<(), CompanyServiceError> {
        if draft.is_empty() {
            return match self.repo.get_company(id, owner)? {
                Some(_) => Ok(()),
                None => {
                    info!(
                        "event=equipment_append module=service status=rejected error_kind=caller_input"
                    );
                    Err(CompanyServiceError::CompanyNotFound(id))
                }
            };
        }

        self.repo
            .append_equipment(id, owner, draft.items())
            .map_err(|err| {
                log_store_failure("equipment_append", &err);
                CompanyServiceError::from(err)
            })?;
        draft.clear();
        Ok(())
    }

    /// Lists the owner's companies with all equipment.
    pub fn list_companies(&self, owner: &OwnerId) -> Result<Vec<Company>, CompanyServiceError> {
        Ok(self.repo.find_by_owner(owner)?)
    }

    /// Loads one company of the owner.
    pub fn get_company(
        &self,
        id: CompanyId,
        owner: &OwnerId,
    ) -> Result<Option<Company>, CompanyServiceError> {
        Ok(self.repo.get_company(id, owner)?)
    }

    /// Deletes the owner's company with this name.
    pub fn delete_company(
        &mut self,
        name: &str,
        owner: &OwnerId,
    ) -> Result<DeleteOutcome, CompanyServiceError> {
        let deleted_count = self
            .repo
            .delete_by_name_and_owner(name, owner)
            .map_err(|err| {
                log_store_failure("company_delete", &err);
                CompanyServiceError::from(err)
            })?;
        Ok(DeleteOutcome { deleted_count })
    }

    /// Deletes the owner's company with this id.
    pub fn delete_company_by_id(
        &mut self,
        id: CompanyId,
        owner: &OwnerId,
    ) -> Result<DeleteOutcome, CompanyServiceError> {
        let deleted_count = self.repo.delete_by_id_and_owner(id, owner).map_err(|err| {
            log_store_failure("company_delete", &err);
            CompanyServiceError::from(err)
        })?;
        Ok(DeleteOutcome { deleted_count })
    }
}

fn log_store_failure(event: &str, err: &RepoError) {
    match err {
        RepoError::Validation(_) | RepoError::DuplicateName(_) | RepoError::NotFound(_) => {
            info!("event={event} module=service status=rejected error_kind=caller_input");
        }
        other => error!("event={event} module=service status=error error={other}"),
    }
}

fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}
