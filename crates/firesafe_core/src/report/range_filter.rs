//! Owner-scoped expiration window filter.
//!
//! # Responsibility
//! - Select the companies/items of one owner whose expiration falls inside an
//!   inclusive date window.
//!
//! # Invariants
//! - Companies of any other owner are dropped here, whatever the caller passed.
//! - Returned companies hold only matching items, in their original order.
//! - Companies without a matching item are omitted.
//! - Input is never mutated.

use crate::model::company::{Company, OwnerId};
use crate::report::expiration::expiration_of;
use chrono::NaiveDate;
use log::warn;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Inclusive `[start, end]` date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExpirationWindow {
    start: NaiveDate,
    end: NaiveDate,
}

/// Rejected window where `start > end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl Display for InvalidWindow {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "window start ({}) must be <= window end ({})",
            self.start, self.end
        )
    }
}

impl Error for InvalidWindow {}

impl ExpirationWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, InvalidWindow> {
        if start > end {
            return Err(InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Inclusive on both ends.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Filters `companies` down to `owner`'s equipment expiring inside `window`.
pub fn filter_expiring<'a>(
    companies: impl IntoIterator<Item = &'a Company>,
    owner: &OwnerId,
    window: &ExpirationWindow,
) -> Vec<Company> {
    let mut foreign = 0_usize;
    let mut matched = Vec::new();

    for company in companies {
        if company.owner() != owner {
            foreign += 1;
            continue;
        }

        let subset = company.with_equipment_matching(|item| window.contains(expiration_of(item)));
        if !subset.equipment().is_empty() {
            matched.push(subset);
        }
    }

    if foreign > 0 {
        warn!(
            "event=range_filter module=report status=ok dropped_foreign_companies={}",
            foreign
        );
    }
    matched
}

#[cfg(test)]
mod tests {
    use super::ExpirationWindow;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn window_is_inclusive_on_both_ends() {
        let window = ExpirationWindow::new(date(2023, 12, 1), date(2024, 1, 15)).unwrap();
        assert!(window.contains(date(2023, 12, 1)));
        assert!(window.contains(date(2024, 1, 15)));
        assert!(!window.contains(date(2023, 11, 30)));
        assert!(!window.contains(date(2024, 1, 16)));
    }

    #[test]
    fn single_day_window_is_allowed_and_reversed_is_rejected() {
        assert!(ExpirationWindow::new(date(2024, 1, 1), date(2024, 1, 1)).is_ok());
        let err = ExpirationWindow::new(date(2024, 1, 2), date(2024, 1, 1)).unwrap_err();
        assert_eq!(err.start, date(2024, 1, 2));
        assert!(err.to_string().contains("must be <="));
    }
}
