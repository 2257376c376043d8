//! Domain model for tenant-owned companies and their fire-safety equipment.
//!
//! # Responsibility
//! - Define the canonical company/equipment schema used by every layer.
//! - Reject malformed data once, at construction or deserialization.
//!
//! # Invariants
//! - Every equipment item belongs to exactly one company.
//! - Every company is scoped to exactly one owner.

pub mod company;
pub mod draft;
pub mod equipment;
