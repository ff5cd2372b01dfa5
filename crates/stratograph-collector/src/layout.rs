//! Cache directory layout
//!
//! The local cache is a root directory containing `entities/` and
//! `relationships/` subtrees. Each subtree holds flat per-flush files plus
//! an `index/<type>/` subdirectory holding per-flush files scoped to that
//! type:
//!
//! ```text
//! <root>/
//!   entities/
//!     <run>-<uuid>.json
//!     index/
//!       <type>/
//!         <run>-<uuid>.json
//!   relationships/
//!     <run>-<uuid>.json
//!     index/
//!       <type>/
//!         <run>-<uuid>.json
//! ```
//!
//! Every flush file name embeds the run id plus a fresh random identifier,
//! so concurrent flushes never collide and no file locking is needed.
//! The root is always passed in explicitly; there is no ambient default
//! derived from the working directory.

use std::path::{Path, PathBuf};

use uuid::Uuid;

use stratograph_core::domain::RunId;

/// Directory layout of the local graph data cache
#[derive(Debug, Clone)]
pub struct CacheLayout {
    /// Root directory of the cache
    root: PathBuf,
}

impl CacheLayout {
    /// Creates a layout rooted at the given directory
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Returns the cache root
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding flat entity flush files
    #[must_use]
    pub fn entities_dir(&self) -> PathBuf {
        self.root.join("entities")
    }

    /// Directory holding flat relationship flush files
    #[must_use]
    pub fn relationships_dir(&self) -> PathBuf {
        self.root.join("relationships")
    }

    /// Index directory for entities of one type
    #[must_use]
    pub fn entities_index_dir(&self, entity_type: &str) -> PathBuf {
        self.entities_dir().join("index").join(entity_type)
    }

    /// Index directory for relationships of one type
    #[must_use]
    pub fn relationships_index_dir(&self, relationship_type: &str) -> PathBuf {
        self.relationships_dir().join("index").join(relationship_type)
    }

    /// Fresh uniquely-named flat entity file for one flush
    #[must_use]
    pub fn entities_file(&self, run_id: RunId) -> PathBuf {
        self.entities_dir().join(flush_file_name(run_id))
    }

    /// Fresh uniquely-named flat relationship file for one flush
    #[must_use]
    pub fn relationships_file(&self, run_id: RunId) -> PathBuf {
        self.relationships_dir().join(flush_file_name(run_id))
    }

    /// Fresh uniquely-named type-index entity file for one flush
    #[must_use]
    pub fn entities_index_file(&self, entity_type: &str, run_id: RunId) -> PathBuf {
        self.entities_index_dir(entity_type)
            .join(flush_file_name(run_id))
    }

    /// Fresh uniquely-named type-index relationship file for one flush
    #[must_use]
    pub fn relationships_index_file(&self, relationship_type: &str, run_id: RunId) -> PathBuf {
        self.relationships_index_dir(relationship_type)
            .join(flush_file_name(run_id))
    }
}

/// Builds a flush file name: `<run>-<uuid>.json`
fn flush_file_name(run_id: RunId) -> String {
    format!("{}-{}.json", run_id, Uuid::new_v4())
}
