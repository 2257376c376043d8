//! Expiration date computation.
//!
//! # Invariants
//! - An explicit expiration is returned unchanged.
//! - Otherwise expiration is `registered_at + VALIDITY_PERIOD_DAYS` by literal
//!   day addition, never "plus one calendar year".

use crate::model::equipment::EquipmentItem;
use chrono::{Days, NaiveDate};

/// Days an item stays valid after registration absent an explicit override.
pub const VALIDITY_PERIOD_DAYS: u64 = 365;

/// Returns the effective expiration date of one equipment item.
pub fn expiration_of(item: &EquipmentItem) -> NaiveDate {
    item.explicit_expiration()
        .unwrap_or_else(|| default_expiration(item.registered_at()))
}

/// Applies the validity period to a registration date.
///
/// Saturates at `NaiveDate::MAX` instead of overflowing.
pub fn default_expiration(registered_at: NaiveDate) -> NaiveDate {
    registered_at
        .checked_add_days(Days::new(VALIDITY_PERIOD_DAYS))
        .unwrap_or(NaiveDate::MAX)
}

/// Returns whether the item is past its expiration on `today`.
pub fn is_expired_on(item: &EquipmentItem, today: NaiveDate) -> bool {
    expiration_of(item) < today
}

#[cfg(test)]
mod tests {
    use super::{default_expiration, expiration_of, is_expired_on};
    use crate::model::equipment::{EquipmentItem, Measure};
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn default_expiration_adds_literal_days() {
        assert_eq!(default_expiration(date(2023, 1, 1)), date(2024, 1, 1));
        // 2024 is a leap year: 365 days land one day short of the anniversary.
        assert_eq!(default_expiration(date(2024, 1, 1)), date(2024, 12, 31));
        assert_eq!(default_expiration(date(2023, 3, 1)), date(2024, 2, 29));
    }

    #[test]
    fn default_expiration_saturates_at_max_date() {
        assert_eq!(default_expiration(NaiveDate::MAX), NaiveDate::MAX);
    }

    #[test]
    fn explicit_expiration_wins() {
        let item = EquipmentItem::hose(Measure::Meters(15), 1, date(2023, 1, 1))
            .unwrap()
            .with_expiration(date(2023, 6, 30))
            .unwrap();
        assert_eq!(expiration_of(&item), date(2023, 6, 30));
    }

    #[test]
    fn item_is_not_expired_on_its_expiration_day() {
        let item = EquipmentItem::hose(Measure::Meters(15), 1, date(2023, 1, 1)).unwrap();
        assert!(!is_expired_on(&item, date(2024, 1, 1)));
        assert!(is_expired_on(&item, date(2024, 1, 2)));
    }
}
