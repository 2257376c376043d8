//! Company domain model.
//!
//! # Responsibility
//! - Define the tenant-owned company record and its equipment list.
//! - Normalize and validate company metadata at construction.
//!
//! # Invariants
//! - `id` is a generated, non-nil UUID; name lookups are a convenience only.
//! - Every company has exactly one non-blank owner.
//! - The equipment list is owned exclusively by its company.

use crate::model::equipment::EquipmentItem;
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));

/// Stable company identifier.
pub type CompanyId = Uuid;

/// Identity string scoping visibility and mutation rights (the tenant).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct OwnerId(String);

impl OwnerId {
    /// Validates an owner identity, keeping it byte-for-byte.
    ///
    /// Identities are opaque; `" alice"` and `"alice"` are distinct tenants.
    pub fn new(value: impl Into<String>) -> Result<Self, CompanyValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(CompanyValidationError::BlankOwner);
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for OwnerId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<OwnerId> for String {
    fn from(value: OwnerId) -> Self {
        value.0
    }
}

impl TryFrom<String> for OwnerId {
    type Error = CompanyValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Validation errors for company construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompanyValidationError {
    NilId,
    BlankOwner,
    BlankName,
    BlankAddress,
}

impl Display for CompanyValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "company id must not be nil"),
            Self::BlankOwner => write!(f, "owner must not be blank"),
            Self::BlankName => write!(f, "company name must not be blank"),
            Self::BlankAddress => write!(f, "company address must not be blank"),
        }
    }
}

impl Error for CompanyValidationError {}

/// Company metadata passed through filtering and reporting unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyMeta {
    pub id: CompanyId,
    pub name: String,
    pub address: String,
    pub city: Option<String>,
    pub registered_at: NaiveDate,
}

/// Unvalidated company fields, also used as the serde wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyRecord {
    pub id: CompanyId,
    pub name: String,
    pub address: String,
    #[serde(default)]
    pub city: Option<String>,
    pub owner: OwnerId,
    pub registered_at: NaiveDate,
    #[serde(default)]
    pub equipment: Vec<EquipmentItem>,
}

/// Tenant-owned company record with its equipment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CompanyRecord", into = "CompanyRecord")]
pub struct Company {
    meta: CompanyMeta,
    owner: OwnerId,
    equipment: Vec<EquipmentItem>,
}

impl Company {
    /// Creates a company with a freshly generated id.
    pub fn new(
        owner: OwnerId,
        name: &str,
        address: &str,
        city: Option<&str>,
        registered_at: NaiveDate,
        equipment: Vec<EquipmentItem>,
    ) -> Result<Self, CompanyValidationError> {
        Self::try_new(CompanyRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            address: address.to_string(),
            city: city.map(str::to_string),
            owner,
            registered_at,
            equipment,
        })
    }

    /// Validates and normalizes a full record, keeping its id.
    ///
    /// Used by read-back and import paths where identity already exists.
    pub fn try_new(record: CompanyRecord) -> Result<Self, CompanyValidationError> {
        if record.id.is_nil() {
            return Err(CompanyValidationError::NilId);
        }
        let name = normalize_text(&record.name).ok_or(CompanyValidationError::BlankName)?;
        let address =
            normalize_text(&record.address).ok_or(CompanyValidationError::BlankAddress)?;
        let city = record.city.as_deref().and_then(normalize_text);

        Ok(Self {
            meta: CompanyMeta {
                id: record.id,
                name,
                address,
                city,
                registered_at: record.registered_at,
            },
            owner: record.owner,
            equipment: record.equipment,
        })
    }

    pub fn id(&self) -> CompanyId {
        self.meta.id
    }

    pub fn name(&self) -> &str {
        &self.meta.name
    }

    pub fn address(&self) -> &str {
        &self.meta.address
    }

    pub fn city(&self) -> Option<&str> {
        self.meta.city.as_deref()
    }

    pub fn owner(&self) -> &OwnerId {
        &self.owner
    }

    pub fn registered_at(&self) -> NaiveDate {
        self.meta.registered_at
    }

    pub fn meta(&self) -> &CompanyMeta {
        &self.meta
    }

    /// Equipment in insertion order.
    pub fn equipment(&self) -> &[EquipmentItem] {
        &self.equipment
    }

    /// Returns a copy holding only the equipment matching `keep`.
    ///
    /// Metadata and owner are carried over unchanged; relative item order is
    /// preserved.
    pub fn with_equipment_matching(&self, mut keep: impl FnMut(&EquipmentItem) -> bool) -> Self {
        Self {
            meta: self.meta.clone(),
            owner: self.owner.clone(),
            equipment: self
                .equipment
                .iter()
                .filter(|item| keep(item))
                .cloned()
                .collect(),
        }
    }

    pub fn into_parts(self) -> (CompanyMeta, OwnerId, Vec<EquipmentItem>) {
        (self.meta, self.owner, self.equipment)
    }
}

impl From<Company> for CompanyRecord {
    fn from(value: Company) -> Self {
        Self {
            id: value.meta.id,
            name: value.meta.name,
            address: value.meta.address,
            city: value.meta.city,
            owner: value.owner,
            registered_at: value.meta.registered_at,
            equipment: value.equipment,
        }
    }
}

impl TryFrom<CompanyRecord> for Company {
    type Error = CompanyValidationError;

    fn try_from(value: CompanyRecord) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

/// Trims and collapses inner whitespace; returns `None` for blank input.
pub fn normalize_text(value: &str) -> Option<String> {
    let collapsed = WHITESPACE_RE.replace_all(value.trim(), " ");
    if collapsed.is_empty() {
        None
    } else {
        Some(collapsed.into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::{normalize_text, CompanyValidationError, OwnerId};

    #[test]
    fn normalize_text_collapses_whitespace() {
        assert_eq!(
            normalize_text("  Acme \t  Foods\nLtd ").as_deref(),
            Some("Acme Foods Ltd")
        );
        assert_eq!(normalize_text(" \n "), None);
    }

    #[test]
    fn owner_id_is_kept_verbatim_and_rejects_blank() {
        assert_eq!(OwnerId::new(" alice ").unwrap().as_str(), " alice ");
        assert_ne!(OwnerId::new(" alice ").unwrap(), OwnerId::new("alice").unwrap());
        assert_eq!(
            OwnerId::new("   ").unwrap_err(),
            CompanyValidationError::BlankOwner
        );
        assert!(OwnerId::new("").is_err());
    }
}
