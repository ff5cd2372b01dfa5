//! Local graph data client
//!
//! Extends the in-memory collector with persistence by composing a
//! [`MemoryCollector`] with a [`CacheLayout`]. A flush partitions the
//! buffers by `_type` and dual-writes each object kind: one flat file with
//! the whole collected set, plus one file per distinct type under the
//! type-indexed directory tree. The index is what makes
//! `list_entities_by_type` efficient later without re-scanning everything.
//!
//! Readers see read-your-writes within the same process run only: listing
//! simply unions the unflushed buffer with whatever index files exist at
//! read time.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use futures_util::stream::{self, StreamExt, TryStreamExt};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use stratograph_core::domain::{Entity, Relationship, RunId};
use stratograph_core::ports::{GraphDataClient, GraphDataCollector};

use crate::layout::CacheLayout;
use crate::memory::MemoryCollector;

/// Concurrent file reads while collecting a type index directory
const READ_CONCURRENCY: usize = 3;

// ============================================================================
// LocalGraphDataClient
// ============================================================================

/// File-backed graph data client for one collection run
///
/// Wraps a plain in-memory buffer; all collector operations delegate to it.
/// Only `flush` and the `list_*` operations touch the filesystem.
pub struct LocalGraphDataClient {
    /// The in-memory buffer holding not-yet-flushed objects
    buffer: MemoryCollector,
    /// Where flushed data lands on disk
    layout: CacheLayout,
}

impl LocalGraphDataClient {
    /// Creates a client for the given run, persisting under the given layout
    #[must_use]
    pub fn new(run_id: RunId, layout: CacheLayout) -> Self {
        Self {
            buffer: MemoryCollector::new(run_id),
            layout,
        }
    }

    /// Returns the cache layout this client persists into
    #[must_use]
    pub fn layout(&self) -> &CacheLayout {
        &self.layout
    }
}

impl GraphDataCollector for LocalGraphDataClient {
    fn run_id(&self) -> RunId {
        self.buffer.run_id()
    }

    fn add_entity(&mut self, entity: Entity) {
        self.buffer.add_entity(entity);
    }

    fn add_entities(&mut self, entities: Vec<Entity>) {
        self.buffer.add_entities(entities);
    }

    fn add_relationship(&mut self, relationship: Relationship) {
        self.buffer.add_relationship(relationship);
    }

    fn add_relationships(&mut self, relationships: Vec<Relationship>) {
        self.buffer.add_relationships(relationships);
    }

    fn has_data_to_flush(&self) -> bool {
        self.buffer.has_data_to_flush()
    }

    fn buffered_entities(&self) -> &[Entity] {
        self.buffer.buffered_entities()
    }

    fn buffered_relationships(&self) -> &[Relationship] {
        self.buffer.buffered_relationships()
    }
}

#[async_trait::async_trait]
impl GraphDataClient for LocalGraphDataClient {
    async fn flush(&mut self) -> anyhow::Result<()> {
        let run_id = self.run_id();
        let entities = self.buffer.buffered_entities().to_vec();
        let relationships = self.buffer.buffered_relationships().to_vec();

        debug!(
            run_id = %run_id,
            entities = entities.len(),
            relationships = relationships.len(),
            "Flushing collected graph data"
        );

        let entities_by_type = group_by_type(&entities, |e| &e.entity_type);
        let relationships_by_type = group_by_type(&relationships, |r| &r.relationship_type);

        let mut writes = vec![
            write_json_file(self.layout.entities_file(run_id), to_value(&entities)?),
            write_json_file(
                self.layout.relationships_file(run_id),
                to_value(&relationships)?,
            ),
        ];

        for (entity_type, group) in &entities_by_type {
            writes.push(write_json_file(
                self.layout.entities_index_file(entity_type, run_id),
                to_value(group)?,
            ));
        }

        for (relationship_type, group) in &relationships_by_type {
            writes.push(write_json_file(
                self.layout.relationships_index_file(relationship_type, run_id),
                to_value(group)?,
            ));
        }

        futures_util::future::try_join_all(writes).await?;

        // Ownership of the data has moved to disk.
        self.buffer.clear();

        Ok(())
    }

    async fn list_entities_by_type(&self, entity_type: &str) -> anyhow::Result<Vec<Entity>> {
        let mut entities: Vec<Entity> = self
            .buffer
            .buffered_entities()
            .iter()
            .filter(|e| e.entity_type == entity_type)
            .cloned()
            .collect();

        entities
            .extend(collect_dir_contents::<Entity>(&self.layout.entities_index_dir(entity_type)).await?);

        Ok(entities)
    }

    async fn list_relationships_by_type(
        &self,
        relationship_type: &str,
    ) -> anyhow::Result<Vec<Relationship>> {
        let mut relationships: Vec<Relationship> = self
            .buffer
            .buffered_relationships()
            .iter()
            .filter(|r| r.relationship_type == relationship_type)
            .cloned()
            .collect();

        relationships.extend(
            collect_dir_contents::<Relationship>(
                &self.layout.relationships_index_dir(relationship_type),
            )
            .await?,
        );

        Ok(relationships)
    }
}

// ============================================================================
// File helpers
// ============================================================================

/// Groups objects by their type tag, preserving append order within a group
fn group_by_type<'a, T, F>(objects: &'a [T], type_of: F) -> BTreeMap<&'a str, Vec<&'a T>>
where
    F: Fn(&'a T) -> &'a str,
{
    let mut groups: BTreeMap<&str, Vec<&T>> = BTreeMap::new();
    for object in objects {
        groups.entry(type_of(object)).or_default().push(object);
    }
    groups
}

fn to_value<T: Serialize>(data: &T) -> anyhow::Result<Value> {
    serde_json::to_value(data).context("Failed to serialize graph data")
}

/// Writes a JSON payload, creating parent directories as needed
async fn write_json_file(path: PathBuf, data: Value) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let json = serde_json::to_vec_pretty(&data).context("Failed to encode flush payload")?;

    tokio::fs::write(&path, json)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))
}

/// Reads and concatenates every JSON array file in a directory
///
/// A missing directory simply means nothing of this type has been flushed
/// yet and yields an empty result.
async fn collect_dir_contents<T: DeserializeOwned>(dir: &Path) -> anyhow::Result<Vec<T>> {
    let mut read_dir = match tokio::fs::read_dir(dir).await {
        Ok(read_dir) => read_dir,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => {
            return Err(e).with_context(|| format!("Failed to read directory {}", dir.display()))
        }
    };

    let mut paths = Vec::new();
    while let Some(entry) = read_dir
        .next_entry()
        .await
        .with_context(|| format!("Failed to enumerate {}", dir.display()))?
    {
        paths.push(entry.path());
    }

    let batches: Vec<Vec<T>> = stream::iter(paths.into_iter().map(read_json_file::<T>))
        .buffered(READ_CONCURRENCY)
        .try_collect()
        .await?;

    Ok(batches.into_iter().flatten().collect())
}

/// Reads one flush file as a JSON array of objects
async fn read_json_file<T: DeserializeOwned>(path: PathBuf) -> anyhow::Result<Vec<T>> {
    let raw = tokio::fs::read(&path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    serde_json::from_slice(&raw).with_context(|| format!("Failed to parse {}", path.display()))
}

// ============================================================================
// Tests
// ============================================================================
