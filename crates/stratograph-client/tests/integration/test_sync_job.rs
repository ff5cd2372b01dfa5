//! Integration tests for sync job lifecycle operations
//!
//! Verifies the 1:1 resource actions end-to-end: start with option
//! validation, both upload variants, finalize, abort, and status fetch,
//! plus the hard failure on a response without the job envelope.

use wiremock::matchers::{body_json, body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stratograph_client::ClientError;
use stratograph_core::domain::{
    Entity, ObjectDeletion, SyncJobOptions, SyncJobStatus, SyncMode,
};

use crate::common;

#[tokio::test]
async fn test_full_job_lifecycle() {
    let server = MockServer::start().await;

    // Start: the options body is posted as-is.
    Mock::given(method("POST"))
        .and(path("/synchronization/jobs"))
        .and(body_partial_json(serde_json::json!({
            "source": "api",
            "scope": "s1",
            "syncMode": "DIFF",
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::job_envelope("J1", "AWAITING_UPLOADS")),
        )
        .expect(1)
        .mount(&server)
        .await;

    // Upload: entity payload appended to the job batch.
    Mock::given(method("POST"))
        .and(path("/synchronization/jobs/J1/upload"))
        .and(body_partial_json(serde_json::json!({
            "entities": [ {"_key": "user:1", "_type": "acme_user", "_class": "User"} ],
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::job_envelope("J1", "AWAITING_UPLOADS")),
        )
        .expect(1)
        .mount(&server)
        .await;

    // Finalize: returns the reconciled job with counters.
    Mock::given(method("POST"))
        .and(path("/synchronization/jobs/J1/finalize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "job": {
                "id": "J1",
                "status": "FINISHED",
                "done": true,
                "numEntitiesUploaded": 1,
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::test_client(&server);

    let options = SyncJobOptions {
        scope: Some("s1".to_string()),
        sync_mode: Some(SyncMode::Diff),
        ..Default::default()
    };

    let started = client.start_sync_job(&options).await.expect("start failed");
    assert_eq!(started.job.id.as_str(), "J1");
    assert_eq!(started.job.status, SyncJobStatus::AwaitingUploads);

    let entity = Entity::new("user:1", "acme_user", "User");
    client
        .upload_graph_objects_for_sync_job(&started.job.id, &[entity], &[])
        .await
        .expect("upload failed");

    let finalized = client
        .finalize_sync_job(&started.job.id)
        .await
        .expect("finalize failed");
    assert_eq!(finalized.job.status, SyncJobStatus::Finished);
    assert!(finalized.job.done);
    assert_eq!(finalized.job.num_entities_uploaded, 1);
}

#[tokio::test]
async fn test_start_diff_without_scope_fails_before_network() {
    let (server, client) = common::setup_platform_mock().await;

    let options = SyncJobOptions {
        sync_mode: Some(SyncMode::Diff),
        ..Default::default()
    };

    let result = client.start_sync_job(&options).await;

    assert!(matches!(result, Err(ClientError::Validation(_))));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_deletion_upload_payload_shape() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/synchronization/jobs/J3/upload"))
        .and(body_json(serde_json::json!({
            "deleteEntities": [ {"_id": "e1"}, {"_id": "e2"} ],
            "deleteRelationships": [ {"_id": "r1"} ],
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::job_envelope("J3", "AWAITING_UPLOADS")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = common::test_client(&server);
    let job_id = "J3".parse().unwrap();

    client
        .upload_graph_objects_for_delete_sync_job(
            &job_id,
            &[ObjectDeletion::new("e1"), ObjectDeletion::new("e2")],
            &[ObjectDeletion::new("r1")],
        )
        .await
        .expect("deletion upload failed");
}

#[tokio::test]
async fn test_abort_returns_updated_job() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/synchronization/jobs/J4/abort"))
        .and(body_json(serde_json::json!({ "reason": "operator cancelled" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::job_envelope("J4", "ABORTED")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = common::test_client(&server);
    let job_id = "J4".parse().unwrap();

    let response = client
        .abort_sync_job(&job_id, "operator cancelled")
        .await
        .expect("abort failed");

    assert_eq!(response.job.status, SyncJobStatus::Aborted);
}

#[tokio::test]
async fn test_status_fetch() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/synchronization/jobs/J5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "job": {
                "id": "J5",
                "status": "FINALIZING_ENTITIES",
                "numEntitiesUploaded": 40,
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::test_client(&server);
    let job_id = "J5".parse().unwrap();

    let response = client
        .fetch_sync_job_status(&job_id)
        .await
        .expect("status fetch failed");

    assert_eq!(response.job.status, SyncJobStatus::FinalizingEntities);
    assert_eq!(response.job.num_entities_uploaded, 40);
}

#[tokio::test]
async fn test_unrecognized_status_maps_to_unknown() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/synchronization/jobs/J6"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::job_envelope("J6", "A_BRAND_NEW_STATE")),
        )
        .mount(&server)
        .await;

    let client = common::test_client(&server);
    let job_id = "J6".parse().unwrap();

    let response = client.fetch_sync_job_status(&job_id).await.unwrap();
    assert_eq!(response.job.status, SyncJobStatus::Unknown);
}

#[tokio::test]
async fn test_missing_job_envelope_is_hard_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/synchronization/jobs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "message": "created, maybe" })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let client = common::test_client(&server);
    let result = client.start_sync_job(&Default::default()).await;

    match result {
        Err(ClientError::MissingJobEnvelope { body }) => {
            assert!(body.contains("created, maybe"));
        }
        other => panic!("Expected MissingJobEnvelope, got {other:?}"),
    }
}
