//! Transition generation command handler.

use super::setup::connect;
use super::summary::print_summary;
use std::path::Path;
use storyreel::{
    BatchOrchestrator, FileSystemManifestStore, InterpolationPlanner, ManifestKind,
    ManifestStore, PassthroughPayload, StoryreelConfig, StoryreelResult,
    TemplateTransitionScripter,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

/// Generate transitions between the scenes in `videos` and write the
/// transition manifest to `out`.
///
/// With `pair` set, only that one transition is generated. Transitions use the
/// aspect ratio and duration the scenes were generated with.
#[instrument(skip_all, fields(videos = %videos.display(), out = %out.display()))]
pub async fn run_interpolate(
    config: &StoryreelConfig,
    videos: &Path,
    out: &Path,
    pair: Option<(u32, u32)>,
    shutdown: CancellationToken,
) -> StoryreelResult<()> {
    let store = FileSystemManifestStore::new();
    let scenes = store.load(videos).await?;
    info!(records = scenes.records.len(), "Loaded scene manifest");

    let planner = InterpolationPlanner::new(TemplateTransitionScripter);
    let items = match pair {
        Some((from, to)) => vec![planner.plan_pair(&scenes, from, to).await],
        None => planner.plan(&scenes).await,
    };

    let mut settings = config.generation.settings.clone();
    settings.aspect_ratio = scenes.metadata.aspect_ratio.clone();
    settings.duration = scenes.metadata.duration.clone();

    let (client, limiter, poll_policy) = connect(config)?;
    let orchestrator = BatchOrchestrator::new(client)
        .with_strategy(PassthroughPayload)
        .with_settings(settings)
        .with_poll_policy(poll_policy)
        .with_continuity(false)
        .with_kind(ManifestKind::Interpolation)
        .with_limiter(limiter)
        .with_shutdown(shutdown);

    let outcome = orchestrator.run_prepared(items).await;
    outcome.persist(&store, out).await?;

    print_summary(&outcome);
    println!("Manifest written to {}", out.display());
    Ok(())
}
