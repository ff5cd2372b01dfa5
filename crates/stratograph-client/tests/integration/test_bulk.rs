//! Integration tests for the bulk upload/delete orchestrator
//!
//! Verifies the no-op paths (no data, invalid options) issue zero network
//! calls, and that the happy paths drive start → upload → finalize in
//! sequence with the expected option defaults.

use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use stratograph_client::{BulkDeleteParams, BulkUploadParams};
use stratograph_core::domain::{
    Entity, ObjectDeletion, Relationship, SyncJobOptions, SyncJobStatus, SyncMode,
};

use crate::common;

#[tokio::test]
async fn test_bulk_upload_without_data_is_noop() {
    let (server, client) = common::setup_platform_mock().await;

    let result = client
        .bulk_upload(BulkUploadParams::default())
        .await
        .expect("noop bulk upload should not fail");

    assert!(result.is_none());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_bulk_upload_invalid_options_is_noop() {
    let (server, client) = common::setup_platform_mock().await;

    // sync_mode defaults to DIFF and no scope is given: invalid, so the
    // orchestrator must log and bail without starting a job.
    let params = BulkUploadParams {
        entities: vec![Entity::new("user:1", "acme_user", "User")],
        ..Default::default()
    };

    let result = client
        .bulk_upload(params)
        .await
        .expect("invalid options should be swallowed as a noop");

    assert!(result.is_none());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_bulk_upload_runs_full_sequence() {
    let server = MockServer::start().await;

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

    Mock::given(method("POST"))
        .and(path("/synchronization/jobs/J1/upload"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::job_envelope("J1", "AWAITING_UPLOADS")),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/synchronization/jobs/J1/finalize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "job": {
                "id": "J1",
                "status": "FINISHED",
                "done": true,
                "numEntitiesUploaded": 1,
                "numRelationshipsUploaded": 1,
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::test_client(&server);

    let params = BulkUploadParams {
        sync_job_options: SyncJobOptions {
            scope: Some("s1".to_string()),
            ..Default::default()
        },
        entities: vec![Entity::new("user:1", "acme_user", "User")],
        relationships: vec![Relationship::between_keys(
            "r:1",
            "acme_user_owns_host",
            "OWNS",
            "user:1",
            "host:1",
        )],
    };

    let result = client
        .bulk_upload(params)
        .await
        .expect("bulk upload failed")
        .expect("bulk upload should produce a result");

    assert_eq!(result.sync_job_id.as_str(), "J1");
    assert_eq!(result.finalize_result.job.status, SyncJobStatus::Finished);
    assert_eq!(result.finalize_result.job.num_entities_uploaded, 1);
}

#[tokio::test]
async fn test_bulk_upload_keeps_caller_sync_mode() {
    let server = MockServer::start().await;

    // The caller's CREATE_OR_UPDATE must survive the default merge.
    Mock::given(method("POST"))
        .and(path("/synchronization/jobs"))
        .and(body_partial_json(
            serde_json::json!({ "syncMode": "CREATE_OR_UPDATE" }),
        ))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::job_envelope("J2", "AWAITING_UPLOADS")),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/synchronization/jobs/J2/upload"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::job_envelope("J2", "AWAITING_UPLOADS")),
        )
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/synchronization/jobs/J2/finalize"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(common::job_envelope("J2", "FINISHED")),
        )
        .mount(&server)
        .await;

    let client = common::test_client(&server);

    let params = BulkUploadParams {
        sync_job_options: SyncJobOptions {
            sync_mode: Some(SyncMode::CreateOrUpdate),
            ..Default::default()
        },
        entities: vec![Entity::new("user:2", "acme_user", "User")],
        ..Default::default()
    };

    let result = client.bulk_upload(params).await.expect("upload failed");
    assert!(result.is_some());
}

#[tokio::test]
async fn test_bulk_delete_without_data_is_noop() {
    let (server, client) = common::setup_platform_mock().await;

    let result = client
        .bulk_delete(BulkDeleteParams::default())
        .await
        .expect("noop bulk delete should not fail");

    assert!(result.is_none());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_bulk_delete_uses_create_or_update_and_deletion_payload() {
    let server = MockServer::start().await;

    // No DIFF reconciliation for deletes: the job is CREATE_OR_UPDATE and
    // carries no scope.
    Mock::given(method("POST"))
        .and(path("/synchronization/jobs"))
        .and(body_partial_json(serde_json::json!({
            "source": "api",
            "syncMode": "CREATE_OR_UPDATE",
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::job_envelope("J9", "AWAITING_UPLOADS")),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/synchronization/jobs/J9/upload"))
        .and(body_partial_json(serde_json::json!({
            "deleteEntities": [ {"_id": "e1"} ],
            "deleteRelationships": [],
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(common::job_envelope("J9", "AWAITING_UPLOADS")),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/synchronization/jobs/J9/finalize"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "job": {
                "id": "J9",
                "status": "FINISHED",
                "done": true,
                "numEntitiesDeleted": 1,
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = common::test_client(&server);

    let params = BulkDeleteParams {
        entities: vec![ObjectDeletion::new("e1")],
        relationships: vec![],
    };

    let result = client
        .bulk_delete(params)
        .await
        .expect("bulk delete failed")
        .expect("bulk delete should produce a result");

    assert_eq!(result.sync_job_id.as_str(), "J9");
    assert_eq!(result.finalize_result.job.num_entities_deleted, 1);
}
