//! Run metadata and work-function context
//!
//! A pipeline run carries three metadata records - the integration instance
//! being executed, its definition, and the job tracking this run - plus an
//! optional provider produced by the prepare step. Work functions receive a
//! [`WorkContext`] that adds a private graph data collector bound to a
//! fresh run id.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use uuid::Uuid;

use stratograph_collector::LocalGraphDataClient;
use stratograph_core::domain::{Entity, Relationship, RunId};
use stratograph_core::ports::{GraphDataClient, GraphDataCollector};

// ============================================================================
// Metadata records
// ============================================================================

/// An activated integration instance
#[derive(Debug, Clone)]
pub struct IntegrationInstance {
    /// Unique identifier of the instance
    pub id: String,
    /// Short friendly name provided by the end user
    pub name: String,
    /// Tenant that activated the integration
    pub account_id: String,
    /// The definition this instance was created from
    pub integration_definition_id: String,
    /// User configuration of the instance
    pub config: serde_json::Value,
}

impl IntegrationInstance {
    /// Builds the instance record for a run
    ///
    /// Instance metadata is resolved locally; a hosted deployment would look
    /// these records up in the platform's registry.
    pub(crate) fn resolve(account_id: &str, id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: Uuid::new_v4().to_string(),
            account_id: account_id.to_string(),
            integration_definition_id: Uuid::new_v4().to_string(),
            config: serde_json::Value::Object(Default::default()),
        }
    }
}

/// The definition an integration instance was created from
#[derive(Debug, Clone)]
pub struct IntegrationDefinition {
    /// Unique identifier of the definition
    pub id: String,
    /// Unique name of the integration
    pub name: String,
    /// Title presented to users
    pub title: String,
    /// Type tag transferred to entity data created by the integration
    pub integration_type: String,
    /// Class tags transferred to entity data created by the integration
    pub integration_class: Vec<String>,
}

impl IntegrationDefinition {
    pub(crate) fn resolve(id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: Uuid::new_v4().to_string(),
            title: Uuid::new_v4().to_string(),
            integration_type: Uuid::new_v4().to_string(),
            integration_class: Vec::new(),
        }
    }
}

/// The job record tracking one pipeline run
#[derive(Debug, Clone)]
pub struct CollectionJob {
    /// Identifier of the job
    pub id: String,
    /// The instance this job runs for
    pub integration_instance_id: String,
    /// When the job was created
    pub create_date: DateTime<Utc>,
    /// Whether any phase reported an error
    pub errors_occurred: bool,
}

impl CollectionJob {
    pub(crate) fn create(integration_instance_id: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            integration_instance_id: integration_instance_id.to_string(),
            create_date: Utc::now(),
            errors_occurred: false,
        }
    }
}

// ============================================================================
// RunContext
// ============================================================================

/// Context shared by every phase of one pipeline run
///
/// Cheap to clone; all metadata is behind `Arc`s. The provider slot is
/// populated by the prepare step and is `None` for pipelines without one.
pub struct RunContext<P> {
    pub(crate) definition: Arc<IntegrationDefinition>,
    pub(crate) instance: Arc<IntegrationInstance>,
    pub(crate) job: Arc<CollectionJob>,
    pub(crate) provider: Option<Arc<P>>,
}

impl<P> Clone for RunContext<P> {
    fn clone(&self) -> Self {
        Self {
            definition: Arc::clone(&self.definition),
            instance: Arc::clone(&self.instance),
            job: Arc::clone(&self.job),
            provider: self.provider.clone(),
        }
    }
}

impl<P> RunContext<P> {
    /// The definition of the integration being run
    pub fn definition(&self) -> &IntegrationDefinition {
        &self.definition
    }

    /// The instance being run
    pub fn instance(&self) -> &IntegrationInstance {
        &self.instance
    }

    /// The job tracking this run
    pub fn job(&self) -> &CollectionJob {
        &self.job
    }

    /// The provider produced by the prepare step, if any
    pub fn provider(&self) -> Option<&P> {
        self.provider.as_deref()
    }
}

// ============================================================================
// WorkContext
// ============================================================================

/// Context handed to one work function execution
///
/// Wraps the shared run context plus a graph data collector that belongs to
/// this execution alone. The collector sits behind a mutex purely so the
/// context can be cloned into the work future and flushed by the runner
/// afterwards; no other task ever holds it.
pub struct WorkContext<P> {
    run: RunContext<P>,
    run_id: RunId,
    collector: Arc<Mutex<LocalGraphDataClient>>,
}

impl<P> Clone for WorkContext<P> {
    fn clone(&self) -> Self {
        Self {
            run: self.run.clone(),
            run_id: self.run_id,
            collector: Arc::clone(&self.collector),
        }
    }
}

impl<P> WorkContext<P> {
    /// Creates a context with a fresh collector bound to a new run id
    pub(crate) fn new(run: RunContext<P>, collector: LocalGraphDataClient) -> Self {
        Self {
            run,
            run_id: collector.run_id(),
            collector: Arc::new(Mutex::new(collector)),
        }
    }

    /// The definition of the integration being run
    pub fn definition(&self) -> &IntegrationDefinition {
        self.run.definition()
    }

    /// The instance being run
    pub fn instance(&self) -> &IntegrationInstance {
        self.run.instance()
    }

    /// The job tracking this run
    pub fn job(&self) -> &CollectionJob {
        self.run.job()
    }

    /// The provider produced by the prepare step, if any
    pub fn provider(&self) -> Option<&P> {
        self.run.provider()
    }

    /// The run id this execution's collector is bound to
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Appends one entity to this execution's collector
    pub async fn add_entity(&self, entity: Entity) {
        self.collector.lock().await.add_entity(entity);
    }

    /// Appends a batch of entities to this execution's collector
    pub async fn add_entities(&self, entities: Vec<Entity>) {
        self.collector.lock().await.add_entities(entities);
    }

    /// Appends one relationship to this execution's collector
    pub async fn add_relationship(&self, relationship: Relationship) {
        self.collector.lock().await.add_relationship(relationship);
    }

    /// Appends a batch of relationships to this execution's collector
    pub async fn add_relationships(&self, relationships: Vec<Relationship>) {
        self.collector.lock().await.add_relationships(relationships);
    }

    /// True iff the collector holds unflushed data
    pub async fn has_data_to_flush(&self) -> bool {
        self.collector.lock().await.has_data_to_flush()
    }

    /// Flushes buffered data to the cache
    ///
    /// The runner flushes automatically after the work function returns;
    /// flushing early mid-loop bounds memory for large collections.
    pub async fn flush(&self) -> anyhow::Result<()> {
        self.collector.lock().await.flush().await
    }

    /// Lists entities of the given type: buffered plus previously flushed
    ///
    /// Includes data flushed by earlier phases of the same run, since all
    /// collectors share one cache layout.
    pub async fn list_entities_by_type(&self, entity_type: &str) -> anyhow::Result<Vec<Entity>> {
        self.collector
            .lock()
            .await
            .list_entities_by_type(entity_type)
            .await
    }

    /// Lists relationships of the given type: buffered plus previously flushed
    pub async fn list_relationships_by_type(
        &self,
        relationship_type: &str,
    ) -> anyhow::Result<Vec<Relationship>> {
        self.collector
            .lock()
            .await
            .list_relationships_by_type(relationship_type)
            .await
    }
}

// ============================================================================
// Tests
// ============================================================================
