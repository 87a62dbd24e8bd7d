//! Tests for transition planning between finished scenes.

mod test_utils;

use async_trait::async_trait;
use storyreel_core::{Manifest, ManifestKind, ResultRecord, SequenceKey, SourceRef};
use storyreel_error::{GenerationError, GenerationResult};
use storyreel_interface::TransitionScripter;
use storyreel_pipeline::{
    BatchOrchestrator, InterpolationPlanner, JobClient, PassthroughPayload, PollPolicy,
    TemplateTransitionScripter,
};
use test_utils::{MockProvider, scenes};

struct RefusingScripter;

#[async_trait]
impl TransitionScripter for RefusingScripter {
    async fn script(&self, _from: &ResultRecord, _to: &ResultRecord) -> GenerationResult<String> {
        Err(GenerationError::provider("scripting service unavailable"))
    }
}

async fn scene_manifest(count: u32) -> Manifest {
    let provider = MockProvider::new();
    BatchOrchestrator::new(JobClient::new(provider))
        .with_poll_policy(PollPolicy::immediate(3))
        .run(scenes(count))
        .await
        .manifest
}

#[tokio::test]
async fn plans_one_transition_per_consecutive_pair() {
    let manifest = scene_manifest(3).await;
    let planner = InterpolationPlanner::new(TemplateTransitionScripter);

    let items: Vec<_> = planner
        .plan(&manifest)
        .await
        .into_iter()
        .map(|item| item.unwrap())
        .collect();

    let keys: Vec<SequenceKey> = items.iter().map(|i| i.sequence_key).collect();
    assert_eq!(keys, vec![SequenceKey::Pair(1, 2), SequenceKey::Pair(2, 3)]);

    let first = &items[0];
    assert_eq!(
        first.keyframes.get("frame0"),
        Some(&SourceRef::generation("job-1"))
    );
    assert_eq!(
        first.keyframes.get("frame120"),
        Some(&SourceRef::generation("job-2"))
    );
    assert!(first.prompt.contains("scene 1 description"));
    assert!(first.prompt.contains("scene 2 description"));
}

#[tokio::test]
async fn single_scene_has_nothing_to_interpolate() {
    let manifest = scene_manifest(1).await;
    let planner = InterpolationPlanner::new(TemplateTransitionScripter);

    assert!(planner.plan(&manifest).await.is_empty());
}

#[tokio::test]
async fn pair_with_missing_scene_fails_validation() {
    let manifest = scene_manifest(2).await;
    let planner = InterpolationPlanner::new(TemplateTransitionScripter);

    let failure = planner.plan_pair(&manifest, 2, 5).await.unwrap_err();

    assert_eq!(failure.sequence_key, SequenceKey::Pair(2, 5));
    assert_eq!(failure.error.kind().label(), "validation");
    assert!(failure.error.to_string().contains("scene 5"));
}

#[tokio::test]
async fn explicit_pair_need_not_be_adjacent() {
    let manifest = scene_manifest(3).await;
    let planner = InterpolationPlanner::new(TemplateTransitionScripter);

    let item = planner.plan_pair(&manifest, 1, 3).await.unwrap();

    assert_eq!(item.sequence_key, SequenceKey::Pair(1, 3));
    assert_eq!(
        item.keyframes.get("frame120"),
        Some(&SourceRef::generation("job-3"))
    );
}

#[tokio::test]
async fn scripter_failure_counts_as_failed_item() {
    let manifest = scene_manifest(3).await;
    let planner = InterpolationPlanner::new(RefusingScripter);
    let provider = MockProvider::new();

    let items = planner.plan(&manifest).await;
    assert!(items.iter().all(Result::is_err));

    let outcome = BatchOrchestrator::new(JobClient::new(provider.clone()))
        .with_poll_policy(PollPolicy::immediate(3))
        .with_continuity(false)
        .with_kind(ManifestKind::Interpolation)
        .run_prepared(items)
        .await;

    assert_eq!(outcome.failed(), 2);
    assert_eq!(outcome.manifest.metadata.total_items, 2);
    assert_eq!(provider.submit_count(), 0);
}

#[tokio::test]
async fn transitions_submit_generation_references() {
    let manifest = scene_manifest(3).await;
    let planner = InterpolationPlanner::new(TemplateTransitionScripter);
    let provider = MockProvider::new();

    let items = planner.plan(&manifest).await;
    let outcome = BatchOrchestrator::new(JobClient::new(provider.clone()))
        .with_strategy(PassthroughPayload)
        .with_poll_policy(PollPolicy::immediate(3))
        .with_continuity(false)
        .with_kind(ManifestKind::Interpolation)
        .run_prepared(items)
        .await;

    assert_eq!(outcome.succeeded(), 2);
    assert_eq!(outcome.manifest.metadata.kind, ManifestKind::Interpolation);

    let bodies = provider.submitted();
    assert!(bodies.iter().all(|body| body["keyframes"]["frame0"]["type"] == "generation"));
    assert!(
        bodies
            .iter()
            .all(|body| body["keyframes"]["frame120"]["type"] == "generation")
    );
}
