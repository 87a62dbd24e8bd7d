//! End-to-end scene and transition batches through the facade.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::sync::{Arc, Mutex};
use storyreel::{
    BatchOrchestrator, FileSystemManifestStore, GenerationProvider, GenerationResult,
    InterpolationPlanner, JobClient, ManifestKind, ManifestStore, PassthroughPayload, PollPolicy,
    SceneCatalog, SequenceKey, TemplateTransitionScripter,
};

/// Accepts everything and completes every job on its first poll.
#[derive(Clone, Default)]
struct InstantProvider {
    submitted: Arc<Mutex<Vec<Value>>>,
}

#[async_trait]
impl GenerationProvider for InstantProvider {
    async fn submit(&self, body: &Value) -> GenerationResult<Value> {
        let mut submitted = self.submitted.lock().unwrap();
        submitted.push(body.clone());
        Ok(json!({"id": format!("gen-{}", submitted.len()), "state": "queued"}))
    }

    async fn fetch(&self, job_id: &str) -> GenerationResult<Value> {
        Ok(json!({
            "id": job_id,
            "state": "completed",
            "assets": {"video": format!("https://cdn.example.com/{}.mp4", job_id)}
        }))
    }

    fn provider_name(&self) -> &'static str {
        "instant"
    }
}

const SCENE_URLS: &str = r#"{"scenes": [
  {"scene_number": 1, "cloudinary_url": "https://res.example.com/1.png"},
  {"scene_number": 2, "cloudinary_url": "https://res.example.com/2.png"},
  {"scene_number": 3, "cloudinary_url": "https://res.example.com/3.png"}
]}"#;

const STORY: &str = r#"{"Scenes": [
  {"Scene": 1, "Description": "A lighthouse at dusk"},
  {"Scene": 2, "Description": "The keeper climbs the stairs"},
  {"Scene": 3, "Description": "The lamp flares to life"}
]}"#;

#[tokio::test]
async fn scenes_then_transitions() {
    let dir = tempfile::tempdir().unwrap();
    let scene_manifest = dir.path().join("scene_videos.json");
    let transition_manifest = dir.path().join("interpolated.json");
    let store = FileSystemManifestStore::new();

    let catalog = SceneCatalog::parse(SCENE_URLS, STORY).unwrap();
    let scenes = BatchOrchestrator::new(JobClient::new(InstantProvider::default()))
        .with_poll_policy(PollPolicy::immediate(3))
        .run_and_persist(catalog.work_items(), &store, &scene_manifest)
        .await
        .unwrap();
    assert_eq!(scenes.succeeded(), 3);

    let loaded = store.load(&scene_manifest).await.unwrap();
    assert_eq!(
        loaded.artifact_refs(),
        vec![
            "https://cdn.example.com/gen-1.mp4",
            "https://cdn.example.com/gen-2.mp4",
            "https://cdn.example.com/gen-3.mp4",
        ]
    );

    let provider = InstantProvider::default();
    let items = InterpolationPlanner::new(TemplateTransitionScripter)
        .plan(&loaded)
        .await;
    let transitions = BatchOrchestrator::new(JobClient::new(provider.clone()))
        .with_strategy(PassthroughPayload)
        .with_poll_policy(PollPolicy::immediate(3))
        .with_continuity(false)
        .with_kind(ManifestKind::Interpolation)
        .run_prepared(items)
        .await;
    transitions.persist(&store, &transition_manifest).await.unwrap();

    let written = store.load(&transition_manifest).await.unwrap();
    assert_eq!(written.metadata.kind, ManifestKind::Interpolation);
    assert!(!written.metadata.continuity_enabled);
    let keys: Vec<SequenceKey> = written.records.iter().map(|r| r.sequence_key).collect();
    assert_eq!(keys, vec![SequenceKey::Pair(1, 2), SequenceKey::Pair(2, 3)]);

    let submitted = provider.submitted.lock().unwrap();
    let first = &submitted[0];
    assert_eq!(first["keyframes"]["frame0"], json!({"type": "generation", "id": "gen-1"}));
    assert_eq!(first["keyframes"]["frame120"], json!({"type": "generation", "id": "gen-2"}));
}

#[tokio::test]
async fn missing_scene_manifest_is_persistence_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = FileSystemManifestStore::new()
        .load(&dir.path().join("absent.json"))
        .await
        .unwrap_err();
    assert!(matches!(err.kind(), storyreel::PersistenceErrorKind::NotFound(_)));
}
