//! Shared test helpers for platform API integration tests
//!
//! Provides wiremock-based mock server setup. Helpers return a configured
//! `PlatformClient` pointing at the mock server, with short retry delays
//! and poll intervals so tests stay fast.

use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stratograph_client::PlatformClient;
use stratograph_core::config::{ClientConfig, QueryConfig, RetryConfig};

/// Starts a mock server and returns it with a client pointed at it.
pub async fn setup_platform_mock() -> (MockServer, PlatformClient) {
    let server = MockServer::start().await;
    let client = test_client(&server);
    (server, client)
}

/// Builds a client against the given mock server with fast test timings.
pub fn test_client(server: &MockServer) -> PlatformClient {
    test_client_with_query_config(
        server,
        QueryConfig {
            page_size: 250,
            poll_interval_ms: 10,
            result_timeout_secs: 5,
        },
    )
}

/// Builds a client with a custom query configuration.
pub fn test_client_with_query_config(server: &MockServer, query: QueryConfig) -> PlatformClient {
    let mut config = ClientConfig::new(server.uri(), "test-account", "test-access-token");
    config.retry = RetryConfig {
        max_attempts: 5,
        delay_ms: 10,
    };
    config.query = query;
    PlatformClient::new(config).expect("test config should be valid")
}

/// JSON body for a sync job envelope with the given id and status.
pub fn job_envelope(id: &str, status: &str) -> serde_json::Value {
    serde_json::json!({
        "job": {
            "id": id,
            "status": status,
        }
    })
}

/// Mounts the three deferred-query endpoints for one immediately-completed
/// page: query submission, status file, and result payload.
///
/// The status URL completes on the first poll and points at the result URL.
#[allow(dead_code)]
pub async fn mount_completed_query_page(server: &MockServer, data: serde_json::Value) {
    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {
                "queryV1": {
                    "type": "deferred",
                    "url": format!("{}/deferred/status-1", server.uri()),
                }
            }
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/deferred/status-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "COMPLETED",
            "url": format!("{}/results/result-1", server.uri()),
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/results/result-1"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "data": data })),
        )
        .mount(server)
        .await;
}
