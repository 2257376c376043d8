//! Report aggregation with deterministic ordering.
//!
//! # Invariants
//! - Entries are ordered by company `registered_at ASC`, then name
//!   (byte-wise); full ties keep input order.
//! - Items keep their insertion order; none are dropped or duplicated.

use crate::model::company::{Company, CompanyMeta};
use crate::model::equipment::{EquipmentItem, EquipmentKind, ExtinguisherAgent, Measure};
use crate::report::expiration::expiration_of;
use crate::report::range_filter::ExpirationWindow;
use chrono::NaiveDate;
use serde::Serialize;

/// One line handed to renderers per equipment item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EquipmentLine {
    pub kind: EquipmentKind,
    pub agent: Option<ExtinguisherAgent>,
    pub quantity: u32,
    pub capacity_or_length: Measure,
    pub registered_at: NaiveDate,
    pub expires_at: NaiveDate,
}

impl From<&EquipmentItem> for EquipmentLine {
    fn from(item: &EquipmentItem) -> Self {
        Self {
            kind: item.kind(),
            agent: item.agent(),
            quantity: item.quantity(),
            capacity_or_length: item.capacity_or_length(),
            registered_at: item.registered_at(),
            expires_at: expiration_of(item),
        }
    }
}

/// Company metadata plus its expiring items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportEntry {
    pub company: CompanyMeta,
    pub items: Vec<EquipmentItem>,
}

impl ReportEntry {
    /// Renderer lines in item order.
    pub fn lines(&self) -> Vec<EquipmentLine> {
        self.items.iter().map(EquipmentLine::from).collect()
    }

    /// Renderer lines of one kind, in item order.
    pub fn lines_of(&self, kind: EquipmentKind) -> Vec<EquipmentLine> {
        self.items
            .iter()
            .filter(|item| item.kind() == kind)
            .map(EquipmentLine::from)
            .collect()
    }
}

/// Aggregated expiring-equipment report for one owner and window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpiringReport {
    window: ExpirationWindow,
    entries: Vec<ReportEntry>,
}

impl ExpiringReport {
    pub fn window(&self) -> &ExpirationWindow {
        &self.window
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<ReportEntry> {
        self.entries
    }

    /// An empty report means "nothing to render".
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn company_count(&self) -> usize {
        self.entries.len()
    }

    pub fn item_count(&self) -> usize {
        self.entries.iter().map(|entry| entry.items.len()).sum()
    }
}

/// Groups filtered companies into report entries in deterministic order.
pub fn aggregate(window: ExpirationWindow, filtered: Vec<Company>) -> ExpiringReport {
    let mut entries: Vec<ReportEntry> = filtered
        .into_iter()
        .map(|company| {
            let (company, _owner, items) = company.into_parts();
            ReportEntry { company, items }
        })
        .collect();

    // `sort_by` is stable, so exact ties keep the store's order.
    entries.sort_by(|left, right| {
        left.company
            .registered_at
            .cmp(&right.company.registered_at)
            .then_with(|| left.company.name.cmp(&right.company.name))
    });

    ExpiringReport { window, entries }
}
