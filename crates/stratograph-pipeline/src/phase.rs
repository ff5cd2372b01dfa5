//! Phase and work function definitions
//!
//! A phase is a named group of work functions. The definition surface
//! accepts any number of work functions per phase; single-function phases
//! are just a sequence of length one, so the runner never has to
//! distinguish the two shapes.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::context::WorkContext;

/// Boxed future returned by a work function
pub type WorkFuture = Pin<Box<dyn Future<Output = anyhow::Result<()>> + Send>>;

/// A work function: collects data into its context's collector
pub type WorkFn<P> = Arc<dyn Fn(WorkContext<P>) -> WorkFuture + Send + Sync>;

/// One named stage of a collection pipeline
pub struct Phase<P> {
    name: String,
    work: Vec<WorkFn<P>>,
}

impl<P> Phase<P> {
    /// Creates an empty phase with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            work: Vec::new(),
        }
    }

    /// Adds a work function to this phase (builder style)
    ///
    /// Work functions added to the same phase run concurrently, up to the
    /// pipeline's configured limit.
    #[must_use]
    pub fn with_work<F>(mut self, work: F) -> Self
    where
        F: Fn(WorkContext<P>) -> WorkFuture + Send + Sync + 'static,
    {
        self.work.push(Arc::new(work));
        self
    }

    /// The phase name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of work functions in this phase
    pub fn work_count(&self) -> usize {
        self.work.len()
    }

    /// The normalized sequence of work functions
    pub(crate) fn work_fns(&self) -> &[WorkFn<P>] {
        &self.work
    }
}
