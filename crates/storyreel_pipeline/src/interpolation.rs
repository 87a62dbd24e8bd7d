//! Transition clips between consecutive scenes.
//!
//! Each transition is generated from two finished scene jobs, chained by
//! reference: the provider receives both generation ids as keyframes instead
//! of image URLs.

use crate::{ItemFailure, PreparedItem};
use async_trait::async_trait;
use storyreel_core::{Keyframes, Manifest, ResultRecord, SequenceKey, SourceRef, WorkItem};
use storyreel_error::{GenerationError, GenerationResult};
use storyreel_interface::TransitionScripter;
use tracing::{info, instrument, warn};

/// Deterministic transition prompt built from the two scene descriptions.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateTransitionScripter;

#[async_trait]
impl TransitionScripter for TemplateTransitionScripter {
    async fn script(&self, from: &ResultRecord, to: &ResultRecord) -> GenerationResult<String> {
        Ok(format!(
            "Seamless transition from {} to {}. Begin: {} End: {} \
             Continuous camera movement, consistent characters and lighting throughout.",
            from.sequence_key.label(),
            to.sequence_key.label(),
            from.original_prompt.trim(),
            to.original_prompt.trim(),
        ))
    }
}

/// Builds interpolation work items from a completed scene manifest.
///
/// # Example
///
/// ```rust,ignore
/// use storyreel_pipeline::{InterpolationPlanner, TemplateTransitionScripter};
///
/// let planner = InterpolationPlanner::new(TemplateTransitionScripter);
/// let items = planner.plan(&scene_manifest).await;
/// ```
#[derive(Debug, Clone)]
pub struct InterpolationPlanner<S: TransitionScripter> {
    scripter: S,
}

impl<S: TransitionScripter> InterpolationPlanner<S> {
    /// Create a planner that writes prompts with `scripter`.
    pub fn new(scripter: S) -> Self {
        Self { scripter }
    }

    /// One transition per consecutive pair of scene records, in record order.
    ///
    /// Fewer than two scene records yields an empty plan. A scripter failure
    /// becomes a failed item for that pair.
    #[instrument(skip(self, manifest), fields(records = manifest.records.len()))]
    pub async fn plan(&self, manifest: &Manifest) -> Vec<PreparedItem> {
        let scenes: Vec<(u32, &ResultRecord)> = manifest
            .records
            .iter()
            .filter_map(|record| match record.sequence_key.scene() {
                Some(scene) => Some((scene, record)),
                None => {
                    warn!(sequence_key = %record.sequence_key, "Ignoring non-scene record");
                    None
                }
            })
            .collect();

        if scenes.len() < 2 {
            info!(scenes = scenes.len(), "Need at least two scene videos to interpolate");
            return Vec::new();
        }

        let mut items = Vec::with_capacity(scenes.len() - 1);
        for pair in scenes.windows(2) {
            let (a, from) = pair[0];
            let (b, to) = pair[1];
            items.push(self.prepare(SequenceKey::Pair(a, b), from, to).await);
        }
        info!(pairs = items.len(), "Planned transitions");
        items
    }

    /// A single transition between scenes `from` and `to`.
    ///
    /// A scene missing from the manifest is a validation failure for the pair.
    #[instrument(skip(self, manifest))]
    pub async fn plan_pair(&self, manifest: &Manifest, from: u32, to: u32) -> PreparedItem {
        let key = SequenceKey::Pair(from, to);
        let lookup = |scene: u32| {
            manifest.record_for(scene).ok_or_else(|| {
                ItemFailure::new(
                    key,
                    GenerationError::validation(format!(
                        "scene {} not found in manifest",
                        scene
                    )),
                )
            })
        };
        let first = lookup(from)?;
        let second = lookup(to)?;
        self.prepare(key, first, second).await
    }

    async fn prepare(
        &self,
        key: SequenceKey,
        from: &ResultRecord,
        to: &ResultRecord,
    ) -> PreparedItem {
        let prompt = self
            .scripter
            .script(from, to)
            .await
            .map_err(|error| ItemFailure::new(key, error))?;

        Ok(WorkItem::new(
            key,
            prompt,
            Keyframes::between(
                SourceRef::generation(from.job_id.clone()),
                SourceRef::generation(to.job_id.clone()),
            ),
        ))
    }
}
