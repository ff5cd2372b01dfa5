//! Configuration module for the Stratograph client.
//!
//! Provides typed configuration structs passed explicitly at construction
//! time. Endpoints and credentials are never ambient constants; callers load
//! them from the environment, a YAML document, or build them in code.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

/// Environment variable holding the API base URL
pub const ENV_API_URL: &str = "STRATOGRAPH_API_URL";
/// Environment variable holding the account identifier
pub const ENV_ACCOUNT: &str = "STRATOGRAPH_ACCOUNT";
/// Environment variable holding the API access token
pub const ENV_API_TOKEN: &str = "STRATOGRAPH_API_TOKEN";

// ---------------------------------------------------------------------------
// ClientConfig
// ---------------------------------------------------------------------------

/// Top-level configuration for the platform client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the platform API, e.g. `https://api.stratograph.io`.
    pub base_url: String,
    /// Account (tenant) identifier sent with every request.
    pub account: String,
    /// Bearer token for authenticating API requests.
    pub access_token: String,
    /// HTTP retry policy.
    #[serde(default)]
    pub retry: RetryConfig,
    /// Deferred query execution settings.
    #[serde(default)]
    pub query: QueryConfig,
}

impl ClientConfig {
    /// Creates a configuration with default retry and query settings.
    pub fn new(
        base_url: impl Into<String>,
        account: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            account: account.into(),
            access_token: access_token.into(),
            retry: RetryConfig::default(),
            query: QueryConfig::default(),
        }
    }

    /// Loads configuration from the process environment
    ///
    /// Reads `STRATOGRAPH_API_URL`, `STRATOGRAPH_ACCOUNT` and
    /// `STRATOGRAPH_API_TOKEN`.
    ///
    /// # Errors
    /// Returns `DomainError::InvalidConfig` naming the first missing variable
    pub fn from_env() -> Result<Self, DomainError> {
        let read = |name: &str| {
            std::env::var(name)
                .map_err(|_| DomainError::InvalidConfig(format!("{name} is not set")))
        };

        let config = Self::new(read(ENV_API_URL)?, read(ENV_ACCOUNT)?, read(ENV_API_TOKEN)?);
        config.validate()?;
        Ok(config)
    }

    /// Parses configuration from a YAML document
    ///
    /// # Errors
    /// Returns `DomainError::InvalidConfig` if the document is malformed or
    /// fails validation
    pub fn from_yaml(yaml: &str) -> Result<Self, DomainError> {
        let config: Self = serde_yaml::from_str(yaml)
            .map_err(|e| DomainError::InvalidConfig(format!("YAML parse error: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Validates that all required values are present and well-formed
    ///
    /// # Errors
    /// Returns `DomainError::InvalidConfig` for the first invalid field
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.base_url.is_empty() {
            return Err(DomainError::InvalidConfig(
                "base_url must not be empty".to_string(),
            ));
        }
        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(DomainError::InvalidConfig(format!(
                "base_url must be an http(s) URL: {}",
                self.base_url
            )));
        }
        if self.account.is_empty() {
            return Err(DomainError::InvalidConfig(
                "account must not be empty".to_string(),
            ));
        }
        if self.access_token.is_empty() {
            return Err(DomainError::InvalidConfig(
                "access_token must not be empty".to_string(),
            ));
        }
        if self.retry.max_attempts == 0 {
            return Err(DomainError::InvalidConfig(
                "retry.max_attempts must be at least 1".to_string(),
            ));
        }
        if self.query.page_size == 0 {
            return Err(DomainError::InvalidConfig(
                "query.page_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RetryConfig
// ---------------------------------------------------------------------------

/// HTTP retry policy settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts per request, including the first (default 5).
    pub max_attempts: u32,
    /// Delay between attempts in milliseconds (default 1000).
    pub delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay_ms: 1000,
        }
    }
}

impl RetryConfig {
    /// Delay between attempts as a `Duration`.
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

// ---------------------------------------------------------------------------
// QueryConfig
// ---------------------------------------------------------------------------

/// Deferred query execution settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Rows requested per page via SKIP/LIMIT (default 250).
    pub page_size: usize,
    /// Interval between deferred-status polls in milliseconds (default 200).
    pub poll_interval_ms: u64,
    /// Wall-clock ceiling for one page's polling loop in seconds (default 300).
    pub result_timeout_secs: u64,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            page_size: 250,
            poll_interval_ms: 200,
            result_timeout_secs: 300,
        }
    }
}

impl QueryConfig {
    /// Poll interval as a `Duration`.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Result timeout as a `Duration`.
    #[must_use]
    pub fn result_timeout(&self) -> Duration {
        Duration::from_secs(self.result_timeout_secs)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
