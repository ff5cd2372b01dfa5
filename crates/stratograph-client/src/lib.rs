//! Stratograph Client - HTTP client for the platform API
//!
//! Provides an async client for:
//! - Paginated deferred queries against the graph
//! - Sync job lifecycle calls (start, upload, finalize, abort, status)
//! - Bulk upload and bulk delete orchestration
//!
//! ## Modules
//!
//! - [`client`] - Authenticated platform HTTP client and query transport
//! - [`retry`] - Bounded retry wrapper with transient/permanent classification
//! - [`query`] - Paginated deferred query executor
//! - [`sync_job`] - Sync job lifecycle operations
//! - [`bulk`] - Bulk upload/delete orchestrator

pub mod bulk;
pub mod client;
pub mod query;
pub mod retry;
pub mod sync_job;

pub use bulk::{BulkDeleteParams, BulkUploadParams};
pub use client::PlatformClient;
pub use query::{QueryOutcome, QueryTree};
pub use sync_job::{GraphObjectDeletionPayload, SyncJobResponse, SyncJobResult};

use std::time::Duration;

use stratograph_core::domain::DomainError;
use thiserror::Error;

/// Errors that can occur when communicating with the platform API
#[derive(Debug, Error)]
pub enum ClientError {
    /// The platform returned a non-success HTTP status
    ///
    /// Statuses below 500 are permanent (never retried); statuses of 500 and
    /// above surface here only after the retry budget is exhausted.
    #[error("API request failed (status={status}, method={method}, url={url}). Response: {body}")]
    Http {
        /// HTTP method of the failed request
        method: String,
        /// Full request URL
        url: String,
        /// HTTP status code
        status: u16,
        /// Response body text
        body: String,
    },

    /// A transport-level failure (connection reset, timeout, bad TLS)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request succeeded at the transport level but the operation failed
    ///
    /// Examples: a populated `errors` array in a query response, or a
    /// deferred job reporting FAILED. Never retried.
    #[error("Platform returned error(s) for {operation}: {message}")]
    Protocol {
        /// The operation that failed
        operation: String,
        /// Server-supplied error message, or a generic fallback
        message: String,
    },

    /// A sync job response did not contain the expected `job` envelope
    #[error("Sync job response did not return a job. Response: {body}")]
    MissingJobEnvelope {
        /// The offending response body
        body: String,
    },

    /// A deferred query's polling loop exceeded its wall-clock ceiling
    ///
    /// Distinct from [`ClientError::Protocol`]: the query may still be
    /// processing server-side; it has not definitely failed.
    #[error("Exceeded deferred query timeout of {} seconds", .limit.as_secs())]
    QueryTimeout {
        /// The configured ceiling that was exceeded
        limit: Duration,
    },

    /// Options failed validation before any network call was made
    #[error(transparent)]
    Validation(#[from] DomainError),
}
