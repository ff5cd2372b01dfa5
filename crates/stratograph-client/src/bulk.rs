//! Bulk upload/delete orchestration
//!
//! Composes the sync job lifecycle into two high-level operations. Each runs
//! start, upload and finalize as one strict sequence of blocking network
//! round trips for a single job.
//!
//! Both operations return `Ok(None)` ("nothing to do") when given no data,
//! without touching the network. `bulk_upload` also returns `Ok(None)` when
//! the merged options fail validation: the failure is logged as a warning
//! rather than surfaced as an error, so batch callers degrade gracefully.

use tracing::{info, warn};

use stratograph_core::domain::{
    Entity, ObjectDeletion, Relationship, SyncJobOptions, SyncJobSource, SyncMode,
};

use crate::client::PlatformClient;
use crate::sync_job::SyncJobResult;
use crate::ClientError;

// ============================================================================
// Parameters
// ============================================================================

/// Input for [`PlatformClient::bulk_upload`]
#[derive(Debug, Clone, Default)]
pub struct BulkUploadParams {
    /// Options merged over the defaults `{source: api, sync_mode: DIFF}`
    pub sync_job_options: SyncJobOptions,
    /// Entities to upsert
    pub entities: Vec<Entity>,
    /// Relationships to upsert
    pub relationships: Vec<Relationship>,
}

/// Input for [`PlatformClient::bulk_delete`]
#[derive(Debug, Clone, Default)]
pub struct BulkDeleteParams {
    /// Entities to delete, referenced by platform-assigned ID
    pub entities: Vec<ObjectDeletion>,
    /// Relationships to delete, referenced by platform-assigned ID
    pub relationships: Vec<ObjectDeletion>,
}

// ============================================================================
// Orchestration
// ============================================================================

impl PlatformClient {
    /// Uploads entities and relationships through one sync job
    ///
    /// Runs start → upload → finalize sequentially. Caller options are
    /// merged over the defaults `{source: api, sync_mode: DIFF}`.
    ///
    /// # Returns
    /// - `Ok(Some(result))` once the job is finalized
    /// - `Ok(None)` when there is nothing to upload, or when the merged
    ///   options are invalid (logged as a warning; no job is started)
    pub async fn bulk_upload(
        &self,
        params: BulkUploadParams,
    ) -> Result<Option<SyncJobResult>, ClientError> {
        if params.entities.is_empty() && params.relationships.is_empty() {
            info!("No entities or relationships to upload");
            return Ok(None);
        }

        let mut options = params.sync_job_options;
        if options.sync_mode.is_none() {
            options.sync_mode = Some(SyncMode::Diff);
        }

        if let Err(error) = options.validate() {
            warn!(%error, "Not starting sync job: invalid options");
            return Ok(None);
        }

        let started = self.start_sync_job(&options).await?;
        let sync_job_id = started.job.id.clone();

        self.upload_graph_objects_for_sync_job(
            &sync_job_id,
            &params.entities,
            &params.relationships,
        )
        .await?;

        let finalize_result = self.finalize_sync_job(&sync_job_id).await?;

        info!(
            sync_job_id = %sync_job_id,
            entities_uploaded = finalize_result.job.num_entities_uploaded,
            relationships_uploaded = finalize_result.job.num_relationships_uploaded,
            "Bulk upload finalized"
        );

        Ok(Some(SyncJobResult {
            sync_job_id,
            finalize_result,
        }))
    }

    /// Deletes existing graph objects through one sync job
    ///
    /// Uses a fixed `{source: api, sync_mode: CREATE_OR_UPDATE}` job so no
    /// scope-wide removal is computed; only the referenced objects are
    /// deleted, keyed by their platform-assigned IDs.
    ///
    /// # Returns
    /// - `Ok(Some(result))` once the job is finalized
    /// - `Ok(None)` when there is nothing to delete
    pub async fn bulk_delete(
        &self,
        params: BulkDeleteParams,
    ) -> Result<Option<SyncJobResult>, ClientError> {
        if params.entities.is_empty() && params.relationships.is_empty() {
            info!("No entities or relationships to delete");
            return Ok(None);
        }

        let options = SyncJobOptions {
            source: SyncJobSource::Api,
            scope: None,
            sync_mode: Some(SyncMode::CreateOrUpdate),
        };

        let started = self.start_sync_job(&options).await?;
        let sync_job_id = started.job.id.clone();

        self.upload_graph_objects_for_delete_sync_job(
            &sync_job_id,
            &params.entities,
            &params.relationships,
        )
        .await?;

        let finalize_result = self.finalize_sync_job(&sync_job_id).await?;

        info!(
            sync_job_id = %sync_job_id,
            entities_deleted = finalize_result.job.num_entities_deleted,
            relationships_deleted = finalize_result.job.num_relationships_deleted,
            "Bulk delete finalized"
        );

        Ok(Some(SyncJobResult {
            sync_job_id,
            finalize_result,
        }))
    }
}
