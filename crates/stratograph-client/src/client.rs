//! Stratograph platform HTTP client
//!
//! Provides a typed HTTP client for the platform API. Handles authentication
//! headers, base URL construction, and the query transport used by the
//! deferred query executor.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use stratograph_client::PlatformClient;
//! use stratograph_core::config::ClientConfig;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ClientConfig::from_env()?;
//! let client = PlatformClient::new(config)?;
//! let results = client.query_v1("Find Host with platform = 'linux'").await?;
//! # Ok(())
//! # }
//! ```

use anyhow::Context;
use reqwest::{Client, Method, RequestBuilder};
use serde_json::{json, Value};
use tracing::debug;

use stratograph_core::config::ClientConfig;
use stratograph_core::domain::DomainError;
use stratograph_core::ports::QueryTransport;

use crate::retry::send_with_retry;
use crate::ClientError;

/// Header carrying the account (tenant) identifier
const ACCOUNT_HEADER: &str = "Stratograph-Account";

/// Path of the query submission endpoint relative to the base URL
const QUERY_PATH: &str = "/graphql";

// ============================================================================
// PlatformClient
// ============================================================================

/// HTTP client for the Stratograph platform API
///
/// Wraps `reqwest::Client` with bearer authentication, the account header,
/// and base URL construction. All configuration is passed explicitly at
/// construction; there are no ambient endpoint constants.
pub struct PlatformClient {
    /// The underlying HTTP client
    http: Client,
    /// Client configuration (endpoint, credentials, retry and query policy)
    config: ClientConfig,
}

impl PlatformClient {
    /// Creates a new client from a validated configuration
    ///
    /// # Arguments
    /// * `config` - Endpoint, credentials and policy settings
    ///
    /// # Errors
    /// Returns `DomainError::InvalidConfig` if the configuration is invalid
    pub fn new(config: ClientConfig) -> Result<Self, DomainError> {
        config.validate()?;
        debug!(base_url = %config.base_url, account = %config.account, "Creating platform client");
        Ok(Self {
            http: Client::new(),
            config,
        })
    }

    /// Returns the client configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Builds the full URL for an API path
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    /// Creates an authenticated request builder for the given method and path
    ///
    /// Automatically prepends the base URL and adds the Authorization and
    /// account headers.
    ///
    /// # Arguments
    /// * `method` - HTTP method (GET, POST, ...)
    /// * `path` - API path relative to the base URL
    pub fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http
            .request(method, self.url(path))
            .bearer_auth(&self.config.access_token)
            .header(ACCOUNT_HEADER, &self.config.account)
    }

    /// Returns the underlying HTTP client
    ///
    /// Used for requests to absolute URLs outside the API base, such as
    /// pre-signed deferred result locations, which carry their own
    /// authorization and must not receive the bearer token.
    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// Submits a query document and returns the response `data` payload
    ///
    /// The HTTP request is retried per the configured policy. A populated
    /// `errors` array in the response is a protocol error and is never
    /// retried.
    ///
    /// # Arguments
    /// * `document` - The query document text
    /// * `variables` - Variables referenced by the document
    pub async fn submit_document(
        &self,
        document: &str,
        variables: Value,
    ) -> Result<Value, ClientError> {
        let url = self.url(QUERY_PATH);
        let body = json!({
            "query": document,
            "variables": variables,
        });

        let response = send_with_retry(&self.config.retry, &Method::POST, &url, || {
            self.request(Method::POST, QUERY_PATH).json(&body).send()
        })
        .await?;

        let payload: Value = response.json().await?;

        if let Some(errors) = payload.get("errors").and_then(Value::as_array) {
            if !errors.is_empty() {
                let message = errors
                    .iter()
                    .map(|e| {
                        e.get("message")
                            .and_then(Value::as_str)
                            .unwrap_or("unknown error")
                            .to_string()
                    })
                    .collect::<Vec<_>>()
                    .join("; ");
                return Err(ClientError::Protocol {
                    operation: "query".to_string(),
                    message,
                });
            }
        }

        Ok(payload.get("data").cloned().unwrap_or(Value::Null))
    }
}

#[async_trait::async_trait]
impl QueryTransport for PlatformClient {
    async fn submit(&self, document: &str, variables: Value) -> anyhow::Result<Value> {
        self.submit_document(document, variables)
            .await
            .context("Query submission failed")
    }
}

// ============================================================================
// Tests
// ============================================================================
