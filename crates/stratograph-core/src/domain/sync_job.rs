//! Sync job domain model
//!
//! A sync job is one server-side unit of bulk graph-data ingestion. It is
//! created by `start`, accumulates uploads, and reaches a terminal status via
//! `finalize` or `abort`. The platform populates an extensive counter block
//! as the job progresses; all counters are modeled here so status responses
//! deserialize losslessly.
//!
//! ## Lifecycle
//!
//! ```text
//! AWAITING_UPLOADS → FINALIZE_PENDING → FINALIZING_ENTITIES
//!     → FINALIZING_RELATIONSHIPS → FINISHED
//! ```
//!
//! with `ABORTED`, `ERROR_BAD_DATA`, `ERROR_UNEXPECTED_FAILURE` and `UNKNOWN`
//! as alternate/terminal outcomes.

use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::newtypes::SyncJobId;

// ============================================================================
// Enumerations
// ============================================================================

/// Server-side lifecycle status of a sync job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncJobStatus {
    /// Job created; uploads may be appended
    AwaitingUploads,
    /// Finalize requested; reconciliation queued
    FinalizePending,
    /// Entities are being reconciled
    FinalizingEntities,
    /// Relationships are being reconciled
    FinalizingRelationships,
    /// Job was explicitly aborted
    Aborted,
    /// Job completed successfully
    Finished,
    /// Uploaded data failed validation server-side
    ErrorBadData,
    /// The platform hit an unexpected failure
    ErrorUnexpectedFailure,
    /// Any status value this client does not recognize
    #[serde(other)]
    Unknown,
}

impl Default for SyncJobStatus {
    fn default() -> Self {
        Self::Unknown
    }
}

impl SyncJobStatus {
    /// Returns true when the job can no longer change state
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Finished | Self::Aborted | Self::ErrorBadData | Self::ErrorUnexpectedFailure
        )
    }
}

/// How the platform reconciles uploaded data against prior state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SyncMode {
    /// Compute and apply removals relative to prior uploads in the same scope
    Diff,
    /// Upsert only; never delete
    CreateOrUpdate,
}

/// Who initiated the sync job
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SyncJobSource {
    /// A direct API caller
    Api,
    /// An integration-managed run
    IntegrationManaged,
}

impl Default for SyncJobSource {
    fn default() -> Self {
        Self::Api
    }
}

// ============================================================================
// Options
// ============================================================================

/// Caller-supplied options for starting a sync job
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncJobOptions {
    /// Who initiated the job (defaults to the direct API caller)
    #[serde(default)]
    pub source: SyncJobSource,

    /// Caller-chosen partition identifying which prior uploads a DIFF-mode
    /// job reconciles against
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,

    /// Reconciliation mode (server default applies when omitted)
    #[serde(
        rename = "syncMode",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub sync_mode: Option<SyncMode>,
}

impl SyncJobOptions {
    /// Validates option combinations before any network call is made
    ///
    /// DIFF mode needs a scope to compute removals against; starting a DIFF
    /// job without one is rejected here, cheaply, rather than by the server.
    ///
    /// # Errors
    /// Returns `DomainError::MissingScope` for DIFF mode without a scope
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.sync_mode == Some(SyncMode::Diff) && self.scope.is_none() {
            return Err(DomainError::MissingScope);
        }
        Ok(())
    }
}

// ============================================================================
// SyncJob record
// ============================================================================

/// One server-side bulk ingestion unit with its progress counters
///
/// All counters are populated by the platform; the client never computes
/// them. Fields absent from a response default to zero so partial
/// status payloads still deserialize.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncJob {
    /// Identifier assigned at job start
    pub id: SyncJobId,

    /// Tenant that owns the job
    #[serde(default)]
    pub account_id: String,

    /// Who initiated the job
    #[serde(default)]
    pub source: SyncJobSource,

    /// Partition the job reconciles against (DIFF mode)
    #[serde(default)]
    pub scope: Option<String>,

    /// Reconciliation mode
    #[serde(default)]
    pub sync_mode: Option<SyncMode>,

    /// Current lifecycle status
    #[serde(default)]
    pub status: SyncJobStatus,

    /// True once the job has reached a terminal status
    #[serde(default)]
    pub done: bool,

    /// Epoch-millisecond timestamp of job creation
    #[serde(default)]
    pub start_timestamp: i64,

    // Entity counters
    #[serde(default)]
    pub num_entities_uploaded: u64,
    #[serde(default)]
    pub num_entities_created: u64,
    #[serde(default)]
    pub num_entities_updated: u64,
    #[serde(default)]
    pub num_entities_deleted: u64,
    #[serde(default)]
    pub num_entity_create_errors: u64,
    #[serde(default)]
    pub num_entity_update_errors: u64,
    #[serde(default)]
    pub num_entity_delete_errors: u64,

    // Entity raw-data counters
    #[serde(default)]
    pub num_entity_raw_data_entries_uploaded: u64,
    #[serde(default)]
    pub num_entity_raw_data_entries_created: u64,
    #[serde(default)]
    pub num_entity_raw_data_entries_updated: u64,
    #[serde(default)]
    pub num_entity_raw_data_entries_deleted: u64,
    #[serde(default)]
    pub num_entity_raw_data_entry_create_errors: u64,
    #[serde(default)]
    pub num_entity_raw_data_entry_update_errors: u64,
    #[serde(default)]
    pub num_entity_raw_data_entry_delete_errors: u64,

    // Relationship counters
    #[serde(default)]
    pub num_relationships_uploaded: u64,
    #[serde(default)]
    pub num_relationships_created: u64,
    #[serde(default)]
    pub num_relationships_updated: u64,
    #[serde(default)]
    pub num_relationships_deleted: u64,
    #[serde(default)]
    pub num_relationship_create_errors: u64,
    #[serde(default)]
    pub num_relationship_update_errors: u64,
    #[serde(default)]
    pub num_relationship_delete_errors: u64,

    // Relationship raw-data counters
    #[serde(default)]
    pub num_relationship_raw_data_entries_uploaded: u64,
    #[serde(default)]
    pub num_relationship_raw_data_entries_created: u64,
    #[serde(default)]
    pub num_relationship_raw_data_entries_updated: u64,
    #[serde(default)]
    pub num_relationship_raw_data_entries_deleted: u64,
    #[serde(default)]
    pub num_relationship_raw_data_entry_create_errors: u64,
    #[serde(default)]
    pub num_relationship_raw_data_entry_update_errors: u64,
    #[serde(default)]
    pub num_relationship_raw_data_entry_delete_errors: u64,

    // Mapped relationship counters
    #[serde(default)]
    pub num_mapped_relationships_created: u64,
    #[serde(default)]
    pub num_mapped_relationships_updated: u64,
    #[serde(default)]
    pub num_mapped_relationships_deleted: u64,
    #[serde(default)]
    pub num_mapped_relationship_create_errors: u64,
    #[serde(default)]
    pub num_mapped_relationship_update_errors: u64,
    #[serde(default)]
    pub num_mapped_relationship_delete_errors: u64,
}

// ============================================================================
// Tests
// ============================================================================
