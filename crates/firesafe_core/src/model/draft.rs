//! Draft company: equipment collected before a company is committed.
//!
//! # Invariants
//! - A draft is owned by exactly one caller session (`&mut` access only).
//! - Items in a draft are already validated `EquipmentItem`s.

use crate::model::equipment::{EquipmentItem, EquipmentKind};

/// Transient, caller-owned equipment list for a company being registered.
///
/// Cleared by `CompanyService::register_company` on successful commit and
/// left untouched on failure.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftCompany {
    items: Vec<EquipmentItem>,
}

impl DraftCompany {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one item and returns its index in the draft.
    pub fn add(&mut self, item: EquipmentItem) -> usize {
        self.items.push(item);
        self.items.len() - 1
    }

    /// Removes the item at `index`, if present.
    pub fn remove(&mut self, index: usize) -> Option<EquipmentItem> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn items(&self) -> &[EquipmentItem] {
        &self.items
    }

    /// Items of one kind, in insertion order.
    pub fn items_of(&self, kind: EquipmentKind) -> impl Iterator<Item = &EquipmentItem> {
        self.items.iter().filter(move |item| item.kind() == kind)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::DraftCompany;
    use crate::model::equipment::{EquipmentItem, EquipmentKind, ExtinguisherAgent, Measure};
    use chrono::NaiveDate;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    #[test]
    fn add_remove_and_filter_by_kind() {
        let mut draft = DraftCompany::new();
        let hose = EquipmentItem::hose(Measure::Meters(20), 1, day()).unwrap();
        let extinguisher = EquipmentItem::extinguisher(
            ExtinguisherAgent::Co2,
            Measure::Kilograms(6),
            2,
            day(),
        )
        .unwrap();

        assert_eq!(draft.add(hose.clone()), 0);
        assert_eq!(draft.add(extinguisher.clone()), 1);
        assert_eq!(draft.items_of(EquipmentKind::Hose).count(), 1);

        assert_eq!(draft.remove(0), Some(hose));
        assert_eq!(draft.remove(5), None);
        assert_eq!(draft.items(), &[extinguisher]);
    }
}
