//! Collection pipeline runner
//!
//! Executes a sequence of named phases. Phases run strictly in order
//! (concurrency 1 across phases) so later phases can assume earlier phases'
//! data is fully flushed and visible. Within a phase, work functions run
//! with bounded concurrency; each gets a fresh collector bound to a new
//! random run id, and whatever it leaves buffered is flushed automatically
//! when it returns.
//!
//! ## Failure semantics
//!
//! The pipeline is fail-fast: the first work function error stops further
//! work from being launched, in-flight work in the same phase is awaited
//! (not cancelled), and the error aborts the whole run. There is no
//! partial-phase retry and no skip-and-continue. Data already flushed to
//! the cache stays on disk; nothing is rolled back.

use std::collections::VecDeque;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::sync::Arc;

use anyhow::Context;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

use stratograph_collector::{CacheLayout, LocalGraphDataClient};
use stratograph_core::domain::RunId;

use crate::context::{CollectionJob, IntegrationDefinition, IntegrationInstance, RunContext, WorkContext};
use crate::phase::{Phase, WorkFn};

/// Work functions running concurrently within one phase by default
const DEFAULT_WORK_CONCURRENCY: usize = 2;

// ============================================================================
// Options
// ============================================================================

/// Runner configuration
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Root directory of the local graph data cache
    pub cache_dir: PathBuf,
    /// Maximum work functions running concurrently within one phase
    pub work_concurrency: usize,
}

impl PipelineOptions {
    /// Creates options with the default work concurrency
    ///
    /// The cache directory is always explicit; the runner derives nothing
    /// from the working directory.
    pub fn new(cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            cache_dir: cache_dir.into(),
            work_concurrency: DEFAULT_WORK_CONCURRENCY,
        }
    }

    /// Overrides the per-phase work concurrency (builder style)
    #[must_use]
    pub fn with_work_concurrency(mut self, work_concurrency: usize) -> Self {
        self.work_concurrency = work_concurrency;
        self
    }
}

// ============================================================================
// CollectionPipeline
// ============================================================================

/// Boxed future returned by a prepare function
pub type PrepareFuture<P> = Pin<Box<dyn Future<Output = anyhow::Result<P>> + Send>>;

type PrepareFn<P> = Arc<dyn Fn(RunContext<P>) -> PrepareFuture<P> + Send + Sync>;

/// A multi-phase data collection pipeline
///
/// ## Usage
///
/// ```rust,no_run
/// use stratograph_pipeline::{CollectionPipeline, Phase, PipelineOptions};
/// use stratograph_core::domain::Entity;
///
/// # async fn example() -> anyhow::Result<()> {
/// let phases: Vec<Phase<()>> = vec![Phase::new("accounts").with_work(|ctx| {
///     Box::pin(async move {
///         ctx.add_entity(Entity::new("account:1", "acme_account", "Account"))
///             .await;
///         Ok(())
///     })
/// })];
///
/// let pipeline = CollectionPipeline::new(phases, PipelineOptions::new("/var/cache/acme"));
/// pipeline.run("account-id", "integration-instance-id").await?;
/// # Ok(())
/// # }
/// ```
pub struct CollectionPipeline<P> {
    prepare: Option<PrepareFn<P>>,
    phases: Vec<Phase<P>>,
    options: PipelineOptions,
}

impl<P: Send + Sync + 'static> CollectionPipeline<P> {
    /// Creates a pipeline from an ordered list of phases
    pub fn new(phases: Vec<Phase<P>>, options: PipelineOptions) -> Self {
        Self {
            prepare: None,
            phases,
            options,
        }
    }

    /// Attaches a prepare step run once before the first phase
    ///
    /// The prepare step produces the provider made available to every work
    /// function through its context, typically an authenticated client for
    /// the system being collected from.
    #[must_use]
    pub fn with_prepare<F>(mut self, prepare: F) -> Self
    where
        F: Fn(RunContext<P>) -> PrepareFuture<P> + Send + Sync + 'static,
    {
        self.prepare = Some(Arc::new(prepare));
        self
    }

    /// Runs all phases to completion, or until the first failure
    ///
    /// # Arguments
    /// * `account_id` - Tenant the integration instance belongs to
    /// * `integration_instance_id` - The instance to run
    ///
    /// # Errors
    /// Returns the first work function or prepare error, wrapped with the
    /// failing phase's name
    pub async fn run(&self, account_id: &str, integration_instance_id: &str) -> anyhow::Result<()> {
        let instance = Arc::new(IntegrationInstance::resolve(
            account_id,
            integration_instance_id,
        ));
        let definition = Arc::new(IntegrationDefinition::resolve(
            &instance.integration_definition_id,
        ));
        let job = Arc::new(CollectionJob::create(&instance.id));

        info!(
            job_id = %job.id,
            integration_instance_id,
            "Starting pipeline run"
        );

        let mut context = RunContext {
            definition,
            instance,
            job,
            provider: None,
        };

        if let Some(prepare) = &self.prepare {
            info!("Executing prepare step");
            let provider = (prepare)(context.clone())
                .await
                .context("Prepare step failed")?;
            context.provider = Some(Arc::new(provider));
        }

        info!(phases = self.phases.len(), "Executing all phases");

        for phase in &self.phases {
            self.execute_phase(&context, phase)
                .await
                .with_context(|| format!("Phase '{}' failed", phase.name()))?;
        }

        info!("Pipeline run complete");
        Ok(())
    }

    /// Runs one phase's work functions with bounded concurrency
    async fn execute_phase(
        &self,
        context: &RunContext<P>,
        phase: &Phase<P>,
    ) -> anyhow::Result<()> {
        info!(
            phase = phase.name(),
            work_functions = phase.work_count(),
            "Executing phase"
        );

        let limit = self.options.work_concurrency.max(1);
        let mut pending: VecDeque<WorkFn<P>> = phase.work_fns().iter().cloned().collect();
        let mut in_flight: JoinSet<anyhow::Result<()>> = JoinSet::new();
        let mut first_error: Option<anyhow::Error> = None;

        loop {
            // Launch work until the concurrency limit is reached. After a
            // failure, nothing new is launched; in-flight work is awaited.
            while first_error.is_none() && in_flight.len() < limit {
                let Some(work) = pending.pop_front() else {
                    break;
                };

                let collector = LocalGraphDataClient::new(
                    RunId::new(),
                    CacheLayout::new(&self.options.cache_dir),
                );
                let work_context = WorkContext::new(context.clone(), collector);
                in_flight.spawn(run_work_function(work, work_context));
            }

            match in_flight.join_next().await {
                Some(joined) => {
                    let outcome = match joined {
                        Ok(result) => result,
                        Err(join_error) => Err(anyhow::anyhow!(
                            "Work function panicked: {join_error}"
                        )),
                    };

                    if let Err(work_error) = outcome {
                        if first_error.is_none() {
                            error!(
                                phase = phase.name(),
                                error = %work_error,
                                "Work function failed"
                            );
                            first_error = Some(work_error);
                        }
                    }
                }
                None => break,
            }
        }

        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

/// Executes one work function and auto-flushes its collector
async fn run_work_function<P: Send + Sync + 'static>(
    work: WorkFn<P>,
    context: WorkContext<P>,
) -> anyhow::Result<()> {
    let run_id = context.run_id();
    debug!(run_id = %run_id, "Starting work function");

    (work)(context.clone()).await?;

    if context.has_data_to_flush().await {
        debug!(run_id = %run_id, "Auto-flushing collected data");
        context.flush().await?;
    }

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
