//! Expiration reporting pipeline.
//!
//! # Responsibility
//! - Compute expiration dates (`expiration`).
//! - Filter one owner's equipment by expiration window (`range_filter`).
//! - Group and order matches per company (`aggregate`).
//! - Hand the result to a document renderer (`render`).
//!
//! # Invariants
//! - Every stage is pure and read-only over its input.
//! - Dates are day-granular `NaiveDate` values.

pub mod aggregate;
pub mod expiration;
pub mod range_filter;
pub mod render;
