//! Graph data collection ports (driven/secondary ports)
//!
//! A [`GraphDataCollector`] is an append-only buffer of entities and
//! relationships accumulated during one collection run. A
//! [`GraphDataClient`] adds persistence on top: flushing the buffer to
//! durable storage and reading previously flushed objects back by type.
//!
//! ## Design Notes
//!
//! - The client capability composes over a plain buffer rather than
//!   inheriting from it; implementations wrap a collector value.
//! - Appends perform no validation and no deduplication. A duplicate `_key`
//!   is a caller error surfaced by the platform at upload time, not here.
//! - Uses `anyhow::Result` because storage errors are adapter-specific.

use crate::domain::graph_object::{Entity, Relationship};
use crate::domain::newtypes::RunId;

/// Append-only buffer for graph objects produced by one collection run
pub trait GraphDataCollector {
    /// The run this collector is bound to
    fn run_id(&self) -> RunId;

    /// Appends one entity to the buffer
    fn add_entity(&mut self, entity: Entity);

    /// Appends a batch of entities to the buffer
    fn add_entities(&mut self, entities: Vec<Entity>);

    /// Appends one relationship to the buffer
    fn add_relationship(&mut self, relationship: Relationship);

    /// Appends a batch of relationships to the buffer
    fn add_relationships(&mut self, relationships: Vec<Relationship>);

    /// True iff either buffer is non-empty
    fn has_data_to_flush(&self) -> bool;

    /// Currently buffered (unflushed) entities
    fn buffered_entities(&self) -> &[Entity];

    /// Currently buffered (unflushed) relationships
    fn buffered_relationships(&self) -> &[Relationship];
}

/// A collector that can persist its buffer and read persisted data back
#[async_trait::async_trait]
pub trait GraphDataClient: GraphDataCollector + Send {
    /// Persists both buffers to storage and clears them
    ///
    /// Ownership of the buffered data moves to storage; this is the one
    /// point where buffer growth is bounded.
    async fn flush(&mut self) -> anyhow::Result<()>;

    /// Lists entities of the given type: buffered plus previously flushed
    async fn list_entities_by_type(&self, entity_type: &str) -> anyhow::Result<Vec<Entity>>;

    /// Lists relationships of the given type: buffered plus previously flushed
    async fn list_relationships_by_type(
        &self,
        relationship_type: &str,
    ) -> anyhow::Result<Vec<Relationship>>;
}
