//! Sync job lifecycle operations
//!
//! A sync job moves through explicit lifecycle calls, each mapping 1:1 to
//! one server-side resource action:
//!
//! - `start_sync_job` - POST `/synchronization/jobs`
//! - `upload_graph_objects_for_sync_job` - POST `/synchronization/jobs/{id}/upload`
//! - `upload_graph_objects_for_delete_sync_job` - same route, deletion payload
//! - `finalize_sync_job` - POST `/synchronization/jobs/{id}/finalize`
//! - `abort_sync_job` - POST `/synchronization/jobs/{id}/abort`
//! - `fetch_sync_job_status` - GET `/synchronization/jobs/{id}`
//!
//! Uploads are additive appends to a job's pending batch, so they are safe
//! to retry at the HTTP layer. Sequencing (all uploads before finalize) is
//! the caller's responsibility. Every response must carry the `job`
//! envelope; a response without one is a hard failure that is never
//! retried.

use reqwest::{Method, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use stratograph_core::domain::{Entity, ObjectDeletion, Relationship, SyncJob, SyncJobId, SyncJobOptions};

use crate::client::PlatformClient;
use crate::retry::send_with_retry;
use crate::ClientError;

/// Path of the sync job collection relative to the base URL
const SYNC_JOBS_PATH: &str = "/synchronization/jobs";

// ============================================================================
// Wire types
// ============================================================================

/// Envelope wrapping every sync job response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncJobResponse {
    /// The job record as the platform sees it after this call
    pub job: SyncJob,
}

/// Result of a completed bulk operation
#[derive(Debug, Clone, PartialEq)]
pub struct SyncJobResult {
    /// Identifier of the job that carried the operation
    pub sync_job_id: SyncJobId,
    /// Job state returned by the finalize call, including counters
    pub finalize_result: SyncJobResponse,
}

/// Upload payload for the normal (upsert-oriented) variant
#[derive(Debug, Serialize)]
struct GraphObjectUploadPayload<'a> {
    entities: &'a [Entity],
    relationships: &'a [Relationship],
}

/// Upload payload for the deletion variant
///
/// Carries only object identifiers; the platform deletes by `_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphObjectDeletionPayload {
    /// Entities to delete
    pub delete_entities: Vec<ObjectDeletion>,
    /// Relationships to delete
    pub delete_relationships: Vec<ObjectDeletion>,
}

// ============================================================================
// Lifecycle operations
// ============================================================================

impl PlatformClient {
    /// Starts a new sync job
    ///
    /// Options are validated before any network call: a DIFF-mode job
    /// without a scope fails immediately with a validation error.
    ///
    /// # Arguments
    /// * `options` - Source, scope and sync mode for the new job
    ///
    /// # Returns
    /// The created job, including its assigned id
    pub async fn start_sync_job(
        &self,
        options: &SyncJobOptions,
    ) -> Result<SyncJobResponse, ClientError> {
        options.validate()?;

        info!(
            source = ?options.source,
            scope = options.scope.as_deref(),
            sync_mode = ?options.sync_mode,
            "Starting sync job"
        );

        let url = self.url(SYNC_JOBS_PATH);
        let response = send_with_retry(&self.config().retry, &Method::POST, &url, || {
            self.request(Method::POST, SYNC_JOBS_PATH)
                .json(options)
                .send()
        })
        .await?;

        validate_sync_job_response(response).await
    }

    /// Uploads graph objects to a started sync job
    ///
    /// Additive append to the job's pending batch; may be called any number
    /// of times before finalize.
    ///
    /// # Arguments
    /// * `sync_job_id` - The job to upload into
    /// * `entities` - Full entity payloads to upsert
    /// * `relationships` - Full relationship payloads to upsert
    pub async fn upload_graph_objects_for_sync_job(
        &self,
        sync_job_id: &SyncJobId,
        entities: &[Entity],
        relationships: &[Relationship],
    ) -> Result<SyncJobResponse, ClientError> {
        debug!(
            sync_job_id = %sync_job_id,
            entities = entities.len(),
            relationships = relationships.len(),
            "Uploading graph objects"
        );

        let payload = GraphObjectUploadPayload {
            entities,
            relationships,
        };

        let path = format!("{SYNC_JOBS_PATH}/{sync_job_id}/upload");
        let url = self.url(&path);
        let response = send_with_retry(&self.config().retry, &Method::POST, &url, || {
            self.request(Method::POST, &path).json(&payload).send()
        })
        .await?;

        validate_sync_job_response(response).await
    }

    /// Uploads object deletions to a started sync job
    ///
    /// Wraps the given identifiers into the deletion-shaped payload. Used by
    /// CREATE_OR_UPDATE jobs that remove specific objects by `_id`.
    ///
    /// # Arguments
    /// * `sync_job_id` - The job to upload into
    /// * `entities` - IDs of entities to delete
    /// * `relationships` - IDs of relationships to delete
    pub async fn upload_graph_objects_for_delete_sync_job(
        &self,
        sync_job_id: &SyncJobId,
        entities: &[ObjectDeletion],
        relationships: &[ObjectDeletion],
    ) -> Result<SyncJobResponse, ClientError> {
        let payload = GraphObjectDeletionPayload {
            delete_entities: entities.to_vec(),
            delete_relationships: relationships.to_vec(),
        };

        info!(
            sync_job_id = %sync_job_id,
            delete_entities = payload.delete_entities.len(),
            delete_relationships = payload.delete_relationships.len(),
            "Uploading deletions"
        );

        let path = format!("{SYNC_JOBS_PATH}/{sync_job_id}/upload");
        let url = self.url(&path);
        let response = send_with_retry(&self.config().retry, &Method::POST, &url, || {
            self.request(Method::POST, &path).json(&payload).send()
        })
        .await?;

        validate_sync_job_response(response).await
    }

    /// Finalizes a sync job, triggering server-side reconciliation
    ///
    /// Must be called exactly once per job after all uploads are queued.
    ///
    /// # Returns
    /// The job with its final counters populated
    pub async fn finalize_sync_job(
        &self,
        sync_job_id: &SyncJobId,
    ) -> Result<SyncJobResponse, ClientError> {
        info!(sync_job_id = %sync_job_id, "Finalizing sync job");

        let path = format!("{SYNC_JOBS_PATH}/{sync_job_id}/finalize");
        let url = self.url(&path);
        let response = send_with_retry(&self.config().retry, &Method::POST, &url, || {
            self.request(Method::POST, &path).json(&json!({})).send()
        })
        .await?;

        validate_sync_job_response(response).await
    }

    /// Aborts a sync job
    ///
    /// # Arguments
    /// * `sync_job_id` - The job to abort
    /// * `reason` - Free-form reason recorded with the abort
    pub async fn abort_sync_job(
        &self,
        sync_job_id: &SyncJobId,
        reason: &str,
    ) -> Result<SyncJobResponse, ClientError> {
        info!(sync_job_id = %sync_job_id, reason, "Aborting sync job");

        let path = format!("{SYNC_JOBS_PATH}/{sync_job_id}/abort");
        let url = self.url(&path);
        let body = json!({ "reason": reason });
        let response = send_with_retry(&self.config().retry, &Method::POST, &url, || {
            self.request(Method::POST, &path).json(&body).send()
        })
        .await?;

        validate_sync_job_response(response).await
    }

    /// Fetches the current status of a sync job
    ///
    /// May be called at any point in the job lifecycle.
    pub async fn fetch_sync_job_status(
        &self,
        sync_job_id: &SyncJobId,
    ) -> Result<SyncJobResponse, ClientError> {
        let path = format!("{SYNC_JOBS_PATH}/{sync_job_id}");
        let url = self.url(&path);
        let response = send_with_retry(&self.config().retry, &Method::GET, &url, || {
            self.request(Method::GET, &path).send()
        })
        .await?;

        validate_sync_job_response(response).await
    }
}

/// Checks that a sync job response carries the expected `job` envelope
///
/// A response without the envelope is a protocol error: the request
/// succeeded at the transport level but the operation result is unusable.
/// This is never retried.
async fn validate_sync_job_response(response: Response) -> Result<SyncJobResponse, ClientError> {
    let body: serde_json::Value = response.json().await?;

    serde_json::from_value::<SyncJobResponse>(body.clone()).map_err(|_| {
        ClientError::MissingJobEnvelope {
            body: body.to_string(),
        }
    })
}

// ============================================================================
// Tests
// ============================================================================
