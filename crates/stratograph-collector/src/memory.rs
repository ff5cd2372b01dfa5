//! In-memory graph data collector
//!
//! An append-only buffer of entities and relationships owned by exactly one
//! collection run. Appends perform no validation and no deduplication;
//! duplicate `_key`s are a caller error surfaced by the platform at upload
//! time. A collector that is never flushed grows unboundedly for the life
//! of its run.

use stratograph_core::domain::{Entity, Relationship, RunId};
use stratograph_core::ports::GraphDataCollector;

/// Append-only buffer for one collection run
#[derive(Debug, Clone)]
pub struct MemoryCollector {
    /// The run this buffer belongs to
    run_id: RunId,
    /// Buffered entities, in append order
    entities: Vec<Entity>,
    /// Buffered relationships, in append order
    relationships: Vec<Relationship>,
}

impl MemoryCollector {
    /// Creates an empty collector bound to the given run
    #[must_use]
    pub fn new(run_id: RunId) -> Self {
        Self {
            run_id,
            entities: Vec::new(),
            relationships: Vec::new(),
        }
    }

    /// Empties both buffers
    ///
    /// Called after a flush has moved ownership of the data to storage.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.relationships.clear();
    }
}

impl GraphDataCollector for MemoryCollector {
    fn run_id(&self) -> RunId {
        self.run_id
    }

    fn add_entity(&mut self, entity: Entity) {
        self.entities.push(entity);
    }

    fn add_entities(&mut self, entities: Vec<Entity>) {
        self.entities.extend(entities);
    }

    fn add_relationship(&mut self, relationship: Relationship) {
        self.relationships.push(relationship);
    }

    fn add_relationships(&mut self, relationships: Vec<Relationship>) {
        self.relationships.extend(relationships);
    }

    fn has_data_to_flush(&self) -> bool {
        !self.entities.is_empty() || !self.relationships.is_empty()
    }

    fn buffered_entities(&self) -> &[Entity] {
        &self.entities
    }

    fn buffered_relationships(&self) -> &[Relationship] {
        &self.relationships
    }
}
