//! Scene generation command handler.

use super::setup::connect;
use super::summary::print_summary;
use std::path::Path;
use storyreel::{
    BatchOrchestrator, FileSystemManifestStore, SceneCatalog, StoryreelConfig, StoryreelResult,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument};

/// Generate one video per scene and write the scene manifest to `out`.
///
/// Per-scene failures are reported in the summary and the manifest; only
/// configuration, catalog and manifest-write errors are returned.
#[instrument(skip_all, fields(scenes = %scenes.display(), out = %out.display()))]
pub async fn run_generate(
    config: &StoryreelConfig,
    scenes: &Path,
    story: &Path,
    out: &Path,
    continuity: bool,
    shutdown: CancellationToken,
) -> StoryreelResult<()> {
    let catalog = SceneCatalog::from_files(scenes, story).await?;
    if catalog.is_empty() {
        info!("Scene catalog is empty, writing an empty manifest");
    }

    let (client, limiter, poll_policy) = connect(config)?;
    let orchestrator = BatchOrchestrator::new(client)
        .with_settings(config.generation.settings.clone())
        .with_poll_policy(poll_policy)
        .with_continuity(continuity)
        .with_limiter(limiter)
        .with_shutdown(shutdown);

    let outcome = orchestrator
        .run_and_persist(catalog.work_items(), &FileSystemManifestStore::new(), out)
        .await?;

    print_summary(&outcome);
    println!("Manifest written to {}", out.display());
    Ok(())
}
