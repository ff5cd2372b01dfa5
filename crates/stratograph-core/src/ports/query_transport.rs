//! Query transport port (driven/secondary port)
//!
//! The core treats query submission as a narrow interface: a document plus
//! variables goes in, the response `data` payload comes out. The primary
//! implementation posts to the platform's query endpoint over HTTP, but the
//! trait keeps the deferred-query executor independent of the transport
//! stack (batching, header injection, authentication).
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because errors at port boundaries are
//!   adapter-specific and don't need domain-level classification.
//! - Implementations must treat a non-empty `errors` array in the response
//!   as a hard failure for that call; errors of this kind are never retried.

use serde_json::Value;

/// Port trait for submitting query documents to the platform
#[async_trait::async_trait]
pub trait QueryTransport: Send + Sync {
    /// Submits a query document with variables and returns the response data
    ///
    /// # Arguments
    /// * `document` - The query document text
    /// * `variables` - JSON object of variables referenced by the document
    ///
    /// # Returns
    /// The `data` payload of the response
    ///
    /// # Errors
    /// Fails on transport errors and whenever the response carries a
    /// non-empty `errors` array
    async fn submit(&self, document: &str, variables: Value) -> anyhow::Result<Value>;
}
