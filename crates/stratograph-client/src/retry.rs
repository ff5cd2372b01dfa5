//! Bounded retry wrapper for outbound HTTP calls
//!
//! Wraps any request send with a fixed number of attempts and a
//! permanent-vs-transient failure classification:
//!
//! - any status in `[200, 300)` is success
//! - a status below 500 (auth failure, bad request, missing resource) aborts
//!   immediately without further attempts - it will not self-heal, and
//!   retrying a non-idempotent call could violate at-most-once semantics
//! - a status of 500 or above, or a transport-level failure, is retried
//!   after a fixed delay until the attempt budget is exhausted

use std::future::Future;

use reqwest::{Method, Response};
use tracing::{debug, info, warn};

use stratograph_core::config::RetryConfig;

use crate::ClientError;

/// Sends a request with bounded retry and failure classification
///
/// The `send` closure must build and send a fresh request each time it is
/// called; request builders are consumed by sending.
///
/// # Arguments
/// * `policy` - Attempt budget and inter-attempt delay
/// * `method` - HTTP method, used for error context only
/// * `url` - Request URL, used for error context only
/// * `send` - Closure producing the request future
///
/// # Returns
/// The successful response, or the last error once attempts are exhausted
pub async fn send_with_retry<F, Fut>(
    policy: &RetryConfig,
    method: &Method,
    url: &str,
    send: F,
) -> Result<Response, ClientError>
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Response, reqwest::Error>>,
{
    let mut attempt: u32 = 1;

    loop {
        match send().await {
            Ok(response) => {
                let status = response.status();

                if status.is_success() {
                    if attempt > 1 {
                        info!(url, attempt, "Request succeeded after retry");
                    }
                    return Ok(response);
                }

                let status_code = status.as_u16();
                let body = response.text().await.unwrap_or_default();
                let error = ClientError::Http {
                    method: method.to_string(),
                    url: url.to_string(),
                    status: status_code,
                    body,
                };

                if status_code < 500 {
                    debug!(url, status = status_code, "Permanent failure, not retrying");
                    return Err(error);
                }

                if attempt >= policy.max_attempts {
                    warn!(url, attempts = attempt, "Retry budget exhausted");
                    return Err(error);
                }

                debug!(
                    url,
                    status = status_code,
                    attempt,
                    "Transient server error, will retry"
                );
            }
            Err(network_error) => {
                if attempt >= policy.max_attempts {
                    warn!(url, attempts = attempt, "Retry budget exhausted");
                    return Err(ClientError::Network(network_error));
                }

                debug!(url, attempt, error = %network_error, "Transport error, will retry");
            }
        }

        attempt += 1;
        tokio::time::sleep(policy.delay()).await;
    }
}
