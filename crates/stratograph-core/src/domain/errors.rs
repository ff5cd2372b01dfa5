//! Domain error types
//!
//! This module defines error types for domain-level validation failures:
//! invalid identifiers, malformed configuration values, and sync job
//! option rules that must hold before any network call is made.

use thiserror::Error;

/// Errors that can occur in domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A sync job in DIFF mode was requested without a scope
    #[error("A scope is required when starting a sync job in DIFF mode")]
    MissingScope,

    /// ID parsing or validation error
    #[error("Invalid ID format: {0}")]
    InvalidId(String),

    /// A configuration value is missing or malformed
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Generic validation failure
    #[error("Validation failed: {0}")]
    ValidationFailed(String),
}
