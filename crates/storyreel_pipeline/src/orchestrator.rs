//! Batch orchestration with continuity and failure isolation.

use crate::{CinematicPayload, JobClient, PollPolicy, await_terminal};
use chrono::Utc;
use futures::future::join_all;
use std::path::Path;
use storyreel_core::{
    ContinuityContext, GenerationSettings, Manifest, ManifestKind, ManifestMetadata,
    ResultRecord, SequenceKey, WorkItem,
};
use storyreel_error::{GenerationError, GenerationResult, StoryreelResult};
use storyreel_interface::{GenerationProvider, ManifestStore, PayloadStrategy};
use storyreel_rate_limit::JobLimiter;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, instrument, warn};

/// A work item that failed for a recorded reason.
#[derive(Debug, Clone)]
pub struct ItemFailure {
    /// Key of the failed item
    pub sequence_key: SequenceKey,
    /// Why it failed
    pub error: GenerationError,
}

impl ItemFailure {
    /// Pair a key with its error.
    pub fn new(sequence_key: SequenceKey, error: GenerationError) -> Self {
        Self {
            sequence_key,
            error,
        }
    }
}

/// An item ready to submit, or one that already failed while being prepared.
pub type PreparedItem = Result<WorkItem, ItemFailure>;

/// What a batch run produced.
///
/// Every input item lands in exactly one of `manifest.records`, `failures`
/// or `skipped`.
#[derive(Debug, Clone)]
pub struct BatchOutcome {
    /// Successful records plus run metadata
    pub manifest: Manifest,
    /// Failed items in input order
    pub failures: Vec<ItemFailure>,
    /// Items never submitted because of shutdown, in input order
    pub skipped: Vec<SequenceKey>,
}

impl BatchOutcome {
    /// Number of items that produced a record.
    pub fn succeeded(&self) -> usize {
        self.manifest.records.len()
    }

    /// Number of items that failed.
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    /// Write the manifest to `destination`.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the manifest cannot be written. This is
    /// the only error a batch run surfaces.
    pub async fn persist(
        &self,
        store: &dyn ManifestStore,
        destination: &Path,
    ) -> StoryreelResult<()> {
        store
            .write(&self.manifest, destination)
            .await
            .map_err(|e| {
                error!(error = %e, path = %destination.display(), "Failed to write manifest");
                e.into()
            })
    }
}

enum ItemOutcome {
    Succeeded(ResultRecord),
    Failed(ItemFailure),
    Skipped(SequenceKey),
}

/// Drives ordered work items through submission and polling.
///
/// Per-item errors never escape [`run`](Self::run): a failed item is logged,
/// severs continuity, and the next item is still attempted.
///
/// # Example
///
/// ```rust,ignore
/// use storyreel_pipeline::{BatchOrchestrator, JobClient, PollPolicy};
///
/// let orchestrator = BatchOrchestrator::new(JobClient::new(provider))
///     .with_poll_policy(PollPolicy::default())
///     .with_continuity(true);
/// let outcome = orchestrator.run(catalog.work_items()).await;
/// println!("{} of {} scenes generated", outcome.succeeded(), outcome.manifest.metadata.total_items);
/// ```
pub struct BatchOrchestrator<P: GenerationProvider> {
    client: JobClient<P>,
    strategy: Box<dyn PayloadStrategy>,
    settings: GenerationSettings,
    poll_policy: PollPolicy,
    continuity: bool,
    kind: ManifestKind,
    limiter: JobLimiter,
    shutdown: CancellationToken,
}

impl<P: GenerationProvider> BatchOrchestrator<P> {
    /// Create an orchestrator with the cinematic strategy, default settings,
    /// default polling, continuity on and one job at a time.
    pub fn new(client: JobClient<P>) -> Self {
        Self {
            client,
            strategy: Box::new(CinematicPayload),
            settings: GenerationSettings::default(),
            poll_policy: PollPolicy::default(),
            continuity: true,
            kind: ManifestKind::Scenes,
            limiter: JobLimiter::default(),
            shutdown: CancellationToken::new(),
        }
    }

    /// Replace the payload strategy.
    pub fn with_strategy(mut self, strategy: impl PayloadStrategy + 'static) -> Self {
        self.strategy = Box::new(strategy);
        self
    }

    /// Replace the per-request parameters.
    pub fn with_settings(mut self, settings: GenerationSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Replace the poll budget.
    pub fn with_poll_policy(mut self, poll_policy: PollPolicy) -> Self {
        self.poll_policy = poll_policy;
        self
    }

    /// Thread each success into the next item's request.
    ///
    /// With continuity on, the batch is one sequential chain. With it off,
    /// every item is its own chain and chains run concurrently.
    pub fn with_continuity(mut self, continuity: bool) -> Self {
        self.continuity = continuity;
        self
    }

    /// What the manifest's records represent.
    pub fn with_kind(mut self, kind: ManifestKind) -> Self {
        self.kind = kind;
        self
    }

    /// Bound concurrent jobs with `limiter`.
    pub fn with_limiter(mut self, limiter: JobLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    /// Stop submitting new items once `shutdown` is cancelled.
    pub fn with_shutdown(mut self, shutdown: CancellationToken) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// The job client.
    pub fn client(&self) -> &JobClient<P> {
        &self.client
    }

    /// Run every item and return the outcome. Never fails.
    pub async fn run(&self, items: Vec<WorkItem>) -> BatchOutcome {
        self.run_prepared(items.into_iter().map(Ok).collect()).await
    }

    /// Run items some of which may already have failed during preparation.
    ///
    /// A prepared failure counts as a failed item at its position and resets
    /// continuity for the item after it.
    #[instrument(skip(self, items), fields(total = items.len(), continuity = self.continuity, kind = %self.kind))]
    pub async fn run_prepared(&self, items: Vec<PreparedItem>) -> BatchOutcome {
        let total_items = items.len();
        let indexed = items.into_iter().enumerate();

        let chains: Vec<Vec<(usize, PreparedItem)>> = if self.continuity {
            vec![indexed.collect()]
        } else {
            indexed.map(|entry| vec![entry]).collect()
        };

        info!(
            chains = chains.len(),
            max_concurrent_jobs = self.limiter.max_jobs(),
            "Starting batch"
        );

        let mut outcomes: Vec<(usize, ItemOutcome)> =
            join_all(chains.into_iter().map(|chain| self.run_chain(chain)))
                .await
                .into_iter()
                .flatten()
                .collect();
        outcomes.sort_by_key(|(index, _)| *index);

        let mut records = Vec::new();
        let mut failures = Vec::new();
        let mut skipped = Vec::new();
        for (_, outcome) in outcomes {
            match outcome {
                ItemOutcome::Succeeded(record) => records.push(record),
                ItemOutcome::Failed(failure) => failures.push(failure),
                ItemOutcome::Skipped(key) => skipped.push(key),
            }
        }

        for failure in &failures {
            warn!(
                sequence_key = %failure.sequence_key,
                error_kind = failure.error.kind().label(),
                reason = %failure.error.kind(),
                "Item failed"
            );
        }
        info!(
            succeeded = records.len(),
            failed = failures.len(),
            skipped = skipped.len(),
            "Batch finished"
        );

        let metadata = ManifestMetadata {
            total_items,
            succeeded: records.len(),
            failed: failures.len(),
            skipped: skipped.len(),
            processed_at: Utc::now(),
            provider_model: self.settings.model.clone(),
            continuity_enabled: self.continuity,
            kind: self.kind,
            aspect_ratio: self.settings.aspect_ratio.clone(),
            duration: self.settings.duration.clone(),
        };

        BatchOutcome {
            manifest: Manifest { metadata, records },
            failures,
            skipped,
        }
    }

    /// Run the batch and write its manifest.
    ///
    /// # Errors
    ///
    /// Only a persistence error; per-item failures are in the outcome.
    pub async fn run_and_persist(
        &self,
        items: Vec<WorkItem>,
        store: &dyn ManifestStore,
        destination: &Path,
    ) -> StoryreelResult<BatchOutcome> {
        let outcome = self.run(items).await;
        outcome.persist(store, destination).await?;
        Ok(outcome)
    }

    async fn run_chain(&self, chain: Vec<(usize, PreparedItem)>) -> Vec<(usize, ItemOutcome)> {
        let mut context = ContinuityContext::empty();
        let mut outcomes = Vec::with_capacity(chain.len());

        for (index, prepared) in chain {
            let item = match prepared {
                Ok(item) => item,
                Err(failure) => {
                    context = context.reset();
                    outcomes.push((index, ItemOutcome::Failed(failure)));
                    continue;
                }
            };

            if self.shutdown.is_cancelled() {
                outcomes.push((index, ItemOutcome::Skipped(item.sequence_key)));
                continue;
            }

            let permit = tokio::select! {
                biased;
                _ = self.shutdown.cancelled() => None,
                permit = self.limiter.acquire() => permit,
            };
            let Some(_permit) = permit else {
                debug!(sequence_key = %item.sequence_key, "Shutdown before submission, skipping");
                outcomes.push((index, ItemOutcome::Skipped(item.sequence_key)));
                continue;
            };

            match self.process(&item, &context).await {
                Ok(record) => {
                    context = context.advance(&record);
                    outcomes.push((index, ItemOutcome::Succeeded(record)));
                }
                Err(error) => {
                    warn!(
                        sequence_key = %item.sequence_key,
                        error_kind = error.kind().label(),
                        "Item failed, resetting continuity"
                    );
                    context = context.reset();
                    outcomes.push((
                        index,
                        ItemOutcome::Failed(ItemFailure::new(item.sequence_key, error)),
                    ));
                }
            }
        }

        outcomes
    }

    #[instrument(skip(self, item, context), fields(sequence_key = %item.sequence_key))]
    async fn process(
        &self,
        item: &WorkItem,
        context: &ContinuityContext,
    ) -> GenerationResult<ResultRecord> {
        let request = self.strategy.build(item, context, &self.settings);
        let submitted = self.client.submit(&request).await?;
        info!(job_id = %submitted.id, "Submitted");

        let job = await_terminal(&self.client, &submitted.id, &self.poll_policy).await?;
        let artifact_ref = job.result_ref.ok_or_else(|| {
            GenerationError::provider(format!("job {} completed without an artifact", job.id))
        })?;
        info!(job_id = %job.id, artifact_ref = %artifact_ref, "Completed");

        Ok(ResultRecord {
            sequence_key: item.sequence_key,
            original_prompt: item.prompt.clone(),
            request,
            job_id: job.id,
            artifact_ref,
            continuity_link: context.previous_sequence_key(),
            completed_at: Utc::now(),
        })
    }
}
