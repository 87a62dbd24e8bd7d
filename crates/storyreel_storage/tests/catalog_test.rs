//! Tests for scene input loading.

use storyreel_core::{SequenceKey, SourceRef};
use storyreel_error::PersistenceErrorKind;
use storyreel_storage::SceneCatalog;
use tempfile::TempDir;

const SCENE_URLS: &str = r#"{
  "scenes": [
    {"scene_number": 2, "cloudinary_url": "https://res.example.com/2.png"},
    {"scene_number": 1, "cloudinary_url": "https://res.example.com/1.png"},
    {"scene_number": "3", "cloudinary_url": "https://res.example.com/3.png"}
  ]
}"#;

const STORY: &str = r#"{
  "Scenes": [
    {"Scene": 1, "Description": "The fox wakes"},
    {"Scene": 2, "Description": "The fox runs"}
  ]
}"#;

#[test]
fn keeps_scene_url_order() {
    let catalog = SceneCatalog::parse(SCENE_URLS, STORY).unwrap();
    let keys: Vec<_> = catalog
        .work_items()
        .iter()
        .map(|item| item.sequence_key)
        .collect();
    assert_eq!(
        keys,
        vec![
            SequenceKey::Single(2),
            SequenceKey::Single(1),
            SequenceKey::Single(3)
        ]
    );
}

#[test]
fn missing_description_yields_empty_prompt() {
    let catalog = SceneCatalog::parse(SCENE_URLS, STORY).unwrap();
    let items = catalog.work_items();
    assert_eq!(items[0].prompt, "The fox runs");
    assert_eq!(items[2].prompt, "");
    assert_eq!(catalog.scenes()[2].description, None);
}

#[test]
fn items_reference_scene_images() {
    let catalog = SceneCatalog::parse(SCENE_URLS, STORY).unwrap();
    let items = catalog.work_items();
    assert_eq!(
        items[1].keyframes.first(),
        Some(&SourceRef::image("https://res.example.com/1.png"))
    );
}

#[test]
fn malformed_document_is_rejected() {
    let err = SceneCatalog::parse("{}", STORY).unwrap_err();
    assert!(matches!(err.kind(), PersistenceErrorKind::Deserialization(_)));
}

#[test]
fn duplicate_scene_number_is_rejected() {
    let urls = r#"{
  "scenes": [
    {"scene_number": 2, "cloudinary_url": "https://res.example.com/2a.png"},
    {"scene_number": "2", "cloudinary_url": "https://res.example.com/2b.png"}
  ]
}"#;

    let err = SceneCatalog::parse(urls, STORY).unwrap_err();
    match err.kind() {
        PersistenceErrorKind::Deserialization(message) => {
            assert!(message.contains("duplicate scene number 2"), "{message}")
        }
        other => panic!("unexpected kind: {:?}", other),
    }
}

#[tokio::test]
async fn from_files_reads_both_inputs() {
    let temp_dir = TempDir::new().unwrap();
    let urls = temp_dir.path().join("scene_urls.json");
    let story = temp_dir.path().join("story_elements.json");
    std::fs::write(&urls, SCENE_URLS).unwrap();
    std::fs::write(&story, STORY).unwrap();

    let catalog = SceneCatalog::from_files(&urls, &story).await.unwrap();
    assert_eq!(catalog.len(), 3);
}

#[tokio::test]
async fn from_files_reports_missing_input() {
    let temp_dir = TempDir::new().unwrap();
    let err = SceneCatalog::from_files(
        &temp_dir.path().join("scene_urls.json"),
        &temp_dir.path().join("story_elements.json"),
    )
    .await
    .unwrap_err();
    assert!(matches!(err.kind(), PersistenceErrorKind::NotFound(_)));
}
