//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the record-store contract consumed by services.
//! - Isolate SQLite query details from service/report orchestration.
//!
//! # Invariants
//! - Every repository operation is scoped by owner.
//! - Repository APIs return semantic errors (`NotFound`, `DuplicateName`) in
//!   addition to DB transport errors.

pub mod company_repo;
