//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Classify every failure into the caller-facing [`ErrorKind`] taxonomy.
//!
//! # Invariants
//! - Each service call issues at most one store round-trip (or one query
//!   followed by one delete).
//! - No service retries a failed store call.

pub mod company_service;
pub mod report_service;

use std::fmt::{Display, Formatter};

/// Caller-facing error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Store unreachable or failing; the action was aborted.
    Connection,
    /// Malformed input rejected before (or by) the store without side effects.
    Validation,
    /// Target record absent for the requesting owner.
    NotFound,
    /// Document renderer collaborator failed.
    Renderer,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Connection => "connection",
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Renderer => "renderer",
        }
    }
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
