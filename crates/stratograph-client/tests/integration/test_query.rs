//! Integration tests for the paginated deferred query executor
//!
//! Verifies end-to-end behavior against a wiremock-based platform mock:
//! - polling until the deferred job completes
//! - server-reported failures with and without messages
//! - the tree-shaped result short-circuit
//! - SKIP/LIMIT pagination and short-page termination
//! - the distinct wall-clock timeout error

use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stratograph_client::{ClientError, QueryOutcome};
use stratograph_core::config::QueryConfig;

use crate::common;

#[tokio::test]
async fn test_polls_until_completed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {
                "queryV1": {
                    "type": "deferred",
                    "url": format!("{}/deferred/slow-job", server.uri()),
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    // Two IN_PROGRESS polls, then COMPLETED: exactly three status fetches.
    Mock::given(method("GET"))
        .and(path("/deferred/slow-job"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "status": "IN_PROGRESS" })),
        )
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/deferred/slow-job"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "COMPLETED",
            "url": format!("{}/results/slow-job", server.uri()),
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/results/slow-job"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [ {"id": "row-1"}, {"id": "row-2"} ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::test_client(&server);
    let outcome = client
        .query_v1("Find Host")
        .await
        .expect("Query should succeed after polling");

    match outcome {
        QueryOutcome::Rows(rows) => {
            assert_eq!(rows.len(), 2);
            assert_eq!(rows[0]["id"], "row-1");
            assert_eq!(rows[1]["id"], "row-2");
        }
        other => panic!("Expected rows, got {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_job_surfaces_server_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {
                "queryV1": {
                    "type": "deferred",
                    "url": format!("{}/deferred/doomed", server.uri()),
                }
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/deferred/doomed"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "FAILED",
            "error": "boom",
        })))
        .mount(&server)
        .await;

    let client = common::test_client(&server);
    let result = client.query_v1("Find Host").await;

    match result {
        Err(ClientError::Protocol { message, .. }) => assert!(message.contains("boom")),
        other => panic!("Expected Protocol error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_failed_job_without_message_uses_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {
                "queryV1": {
                    "type": "deferred",
                    "url": format!("{}/deferred/silent", server.uri()),
                }
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/deferred/silent"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "status": "FAILED" })),
        )
        .mount(&server)
        .await;

    let client = common::test_client(&server);
    let result = client.query_v1("Find Host").await;

    match result {
        Err(ClientError::Protocol { message, .. }) => {
            assert_eq!(message, "Job failed without an error message.");
        }
        other => panic!("Expected Protocol error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_tree_result_short_circuits_pagination() {
    let server = MockServer::start().await;

    // A tree payload on the first page must stop pagination: the query
    // endpoint is hit exactly once even though the "page" is not short.
    common::mount_completed_query_page(
        &server,
        serde_json::json!({
            "vertices": [ {"id": "v1"}, {"id": "v2"} ],
            "edges": [ {"id": "e1"} ],
        }),
    )
    .await;

    let client = common::test_client(&server);
    let outcome = client
        .query_v1("Find Host that uses Database return tree")
        .await
        .expect("Tree query should succeed");

    match outcome {
        QueryOutcome::Tree(tree) => {
            assert_eq!(tree.vertices.as_array().unwrap().len(), 2);
            assert_eq!(tree.edges.as_array().unwrap().len(), 1);
        }
        other => panic!("Expected tree, got {other:?}"),
    }

    let graphql_requests = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|r| r.url.path() == "/graphql")
        .count();
    assert_eq!(graphql_requests, 1);
}

#[tokio::test]
async fn test_full_page_requests_next_offset() {
    let server = MockServer::start().await;

    // page_size 2: first page returns 2 rows (full), second returns 1 (short).
    let page1_status = format!("{}/deferred/page1", server.uri());
    let page2_status = format!("{}/deferred/page2", server.uri());

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("SKIP 0 LIMIT 2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": { "queryV1": { "type": "deferred", "url": page1_status } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .and(body_string_contains("SKIP 2 LIMIT 2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": { "queryV1": { "type": "deferred", "url": page2_status } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/deferred/page1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "COMPLETED",
            "url": format!("{}/results/page1", server.uri()),
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/deferred/page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "status": "COMPLETED",
            "url": format!("{}/results/page2", server.uri()),
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/results/page1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [ {"id": "a"}, {"id": "b"} ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/results/page2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [ {"id": "c"} ]
        })))
        .mount(&server)
        .await;

    let client = common::test_client_with_query_config(
        &server,
        QueryConfig {
            page_size: 2,
            poll_interval_ms: 10,
            result_timeout_secs: 5,
        },
    );

    let outcome = client
        .query_v1("Find Host")
        .await
        .expect("Paginated query should succeed");

    match outcome {
        QueryOutcome::Rows(rows) => {
            assert_eq!(rows.len(), 3);
            // Arrival order is preserved across pages.
            assert_eq!(rows[0]["id"], "a");
            assert_eq!(rows[1]["id"], "b");
            assert_eq!(rows[2]["id"], "c");
        }
        other => panic!("Expected rows, got {other:?}"),
    }
}

#[tokio::test]
async fn test_polling_ceiling_yields_timeout_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {
                "queryV1": {
                    "type": "deferred",
                    "url": format!("{}/deferred/forever", server.uri()),
                }
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/deferred/forever"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "status": "IN_PROGRESS" })),
        )
        .mount(&server)
        .await;

    let client = common::test_client_with_query_config(
        &server,
        QueryConfig {
            page_size: 250,
            poll_interval_ms: 100,
            result_timeout_secs: 1,
        },
    );

    let result = client.query_v1("Find Host").await;

    match result {
        Err(ClientError::QueryTimeout { limit }) => assert_eq!(limit.as_secs(), 1),
        other => panic!("Expected QueryTimeout, got {other:?}"),
    }
}

#[tokio::test]
async fn test_graphql_errors_fail_before_polling() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "errors": [ {"message": "syntax error in query"} ],
            "data": null,
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::test_client(&server);
    let result = client.query_v1("Fnd Host").await;

    match result {
        Err(ClientError::Protocol { message, .. }) => {
            assert!(message.contains("syntax error"));
        }
        other => panic!("Expected Protocol error, got {other:?}"),
    }
}
