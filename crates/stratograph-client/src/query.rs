//! Paginated deferred query executor
//!
//! Query execution against the platform is asynchronous: submitting a query
//! returns a deferred-job handle (a status URL) rather than results. The
//! executor polls that URL until the job completes or fails, fetches the
//! result payload, and pages through large result sets.
//!
//! ## Pagination
//!
//! Pagination is offset-based: the executor appends `SKIP n LIMIT page_size`
//! clauses to the caller's query and increments the offset per page.
//! A short page (fewer rows than `page_size`) signals completion. Pages are
//! requested strictly in sequence and concatenated in arrival order.
//!
//! Tree-shaped results (queries ending in `return tree`) are not
//! incrementally paginated: a payload carrying both `vertices` and `edges`
//! short-circuits the page loop and is returned whole.
//!
//! ## Polling
//!
//! Each page's deferred job is polled at a fixed short interval under a
//! wall-clock ceiling. Exceeding the ceiling fails with a timeout error
//! distinct from a server-reported failure, since the job may still be
//! running somewhere.

use reqwest::Method;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::client::PlatformClient;
use crate::retry::send_with_retry;
use crate::ClientError;

/// Document submitted for every deferred query page
const DEFERRED_QUERY_DOCUMENT: &str = r#"
query QueryLanguageV1($query: String!, $deferredResponse: DeferredResponseOption) {
  queryV1(query: $query, deferredResponse: $deferredResponse) {
    type
    data
    url
  }
}"#;

// ============================================================================
// Deferred job protocol types
// ============================================================================

/// Status of an asynchronous query execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum DeferredJobStatus {
    InProgress,
    Completed,
    Failed,
}

/// Payload served by a deferred job's status URL
#[derive(Debug, Deserialize)]
struct DeferredStatusFile {
    /// Current job status
    status: DeferredJobStatus,
    /// Location of the result payload, present once completed
    url: Option<String>,
    /// Server-supplied error message, present on failure
    error: Option<String>,
}

/// Result payload fetched from a completed deferred job
#[derive(Debug, Deserialize)]
struct DeferredResultFile {
    /// The result page: an array of records, or a tree object
    #[serde(default)]
    data: Value,
}

// ============================================================================
// Query outcome
// ============================================================================

/// The full result of a paginated query
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// Flat result records, concatenated across pages in arrival order
    Rows(Vec<Value>),
    /// A tree-shaped result, returned whole from the first page
    Tree(QueryTree),
}

impl QueryOutcome {
    /// Returns the rows, or an empty slice for tree results
    #[must_use]
    pub fn rows(&self) -> &[Value] {
        match self {
            Self::Rows(rows) => rows,
            Self::Tree(_) => &[],
        }
    }
}

/// Vertices and edges of a tree-shaped query result
#[derive(Debug, Clone, PartialEq)]
pub struct QueryTree {
    /// Result vertices
    pub vertices: Value,
    /// Result edges
    pub edges: Value,
}

// ============================================================================
// Executor
// ============================================================================

/// Executes a query, following the deferred-job protocol for every page
///
/// # Arguments
/// * `client` - The platform client carrying endpoint and policy config
/// * `query` - Query text without SKIP/LIMIT clauses; the executor owns
///   pagination
///
/// # Errors
/// - [`ClientError::Protocol`] when the server reports a failed job or a
///   malformed payload
/// - [`ClientError::QueryTimeout`] when polling exceeds the wall-clock
///   ceiling
/// - [`ClientError::Http`] / [`ClientError::Network`] when transport retries
///   are exhausted
pub async fn execute(client: &PlatformClient, query: &str) -> Result<QueryOutcome, ClientError> {
    let page_size = client.config().query.page_size;
    let mut page: usize = 0;
    let mut rows: Vec<Value> = Vec::new();

    loop {
        let paged_query = format!("{query} SKIP {} LIMIT {page_size}", page * page_size);
        page += 1;

        debug!(page, "Submitting deferred query page");

        let data = client
            .submit_document(
                DEFERRED_QUERY_DOCUMENT,
                json!({
                    "query": paged_query,
                    "deferredResponse": "FORCE",
                }),
            )
            .await?;

        let deferred_url = data
            .pointer("/queryV1/url")
            .and_then(Value::as_str)
            .ok_or_else(|| ClientError::Protocol {
                operation: "queryV1".to_string(),
                message: "deferred response did not include a status url".to_string(),
            })?
            .to_string();

        let status_file = poll_deferred_job(client, &deferred_url).await?;

        let result_url = status_file.url.ok_or_else(|| ClientError::Protocol {
            operation: "queryV1".to_string(),
            message: "completed job did not include a result url".to_string(),
        })?;

        let result = fetch_result_payload(client, &result_url).await?;
        let data = result.data;

        // Tree-shaped data is never paginated; return it whole.
        if data.get("vertices").is_some() && data.get("edges").is_some() {
            debug!(page, "Received tree-shaped result, stopping pagination");
            return Ok(QueryOutcome::Tree(QueryTree {
                vertices: data["vertices"].clone(),
                edges: data["edges"].clone(),
            }));
        }

        let page_rows = data
            .as_array()
            .cloned()
            .ok_or_else(|| ClientError::Protocol {
                operation: "queryV1".to_string(),
                message: format!("expected array-shaped result data, got: {data}"),
            })?;

        debug!(page, rows = page_rows.len(), "Received result page");

        let complete = page_rows.len() < page_size;
        rows.extend(page_rows);

        if complete {
            debug!(pages = page, total_rows = rows.len(), "Query complete");
            return Ok(QueryOutcome::Rows(rows));
        }
    }
}

/// Polls a deferred job's status URL until it leaves IN_PROGRESS
///
/// Enforces the configured wall-clock ceiling across the entire polling loop
/// for this page. The status URL is pre-signed; the request carries no
/// platform credentials, and transport failures go through the retry
/// wrapper like any other call.
async fn poll_deferred_job(
    client: &PlatformClient,
    status_url: &str,
) -> Result<DeferredStatusFile, ClientError> {
    let poll_interval = client.config().query.poll_interval();
    let timeout = client.config().query.result_timeout();
    let started = tokio::time::Instant::now();

    loop {
        if started.elapsed() > timeout {
            warn!(status_url, "Deferred query exceeded polling ceiling");
            return Err(ClientError::QueryTimeout { limit: timeout });
        }

        tokio::time::sleep(poll_interval).await;

        let response = send_with_retry(&client.config().retry, &Method::GET, status_url, || {
            client.http().get(status_url).send()
        })
        .await?;

        let status_file: DeferredStatusFile = response.json().await?;

        match status_file.status {
            DeferredJobStatus::InProgress => continue,
            DeferredJobStatus::Completed => return Ok(status_file),
            DeferredJobStatus::Failed => {
                return Err(ClientError::Protocol {
                    operation: "queryV1".to_string(),
                    message: status_file
                        .error
                        .unwrap_or_else(|| "Job failed without an error message.".to_string()),
                })
            }
        }
    }
}

/// Fetches the result payload of a completed deferred job
async fn fetch_result_payload(
    client: &PlatformClient,
    result_url: &str,
) -> Result<DeferredResultFile, ClientError> {
    let response = send_with_retry(&client.config().retry, &Method::GET, result_url, || {
        client.http().get(result_url).send()
    })
    .await?;

    Ok(response.json().await?)
}

// ============================================================================
// Convenience surface
// ============================================================================

impl PlatformClient {
    /// Executes a query and returns the full, flattened result set
    ///
    /// See [`execute`] for pagination and polling semantics.
    pub async fn query_v1(&self, query: &str) -> Result<QueryOutcome, ClientError> {
        execute(self, query).await
    }
}

// ============================================================================
// Tests
// ============================================================================
