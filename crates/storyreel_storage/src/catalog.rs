//! Upstream scene inputs.
//!
//! Two files feed a scene batch:
//!
//! ```text
//! scene_urls.json      {"scenes": [{"scene_number": 1, "cloudinary_url": "https://..."}]}
//! story_elements.json  {"Scenes": [{"Scene": 1, "Description": "..."}]}
//! ```

use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use storyreel_core::WorkItem;
use storyreel_error::{PersistenceError, PersistenceErrorKind, PersistenceResult};

#[derive(Debug, Deserialize)]
struct SceneUrls {
    scenes: Vec<SceneUrl>,
}

#[derive(Debug, Deserialize)]
struct SceneUrl {
    scene_number: SceneNumber,
    cloudinary_url: String,
}

#[derive(Debug, Deserialize)]
struct StoryElements {
    #[serde(rename = "Scenes", default)]
    scenes: Vec<StoryScene>,
}

#[derive(Debug, Deserialize)]
struct StoryScene {
    #[serde(rename = "Scene")]
    scene: SceneNumber,
    #[serde(rename = "Description", default)]
    description: Option<String>,
}

/// Scene numbers arrive as integers or numeric strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SceneNumber {
    Number(u32),
    Text(String),
}

impl SceneNumber {
    fn value(&self) -> Option<u32> {
        match self {
            SceneNumber::Number(n) => Some(*n),
            SceneNumber::Text(text) => text.trim().parse().ok(),
        }
    }
}

/// One scene with its source image and description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneEntry {
    /// Scene number
    pub number: u32,
    /// Generated scene image
    pub image_url: String,
    /// Story text for the scene, if the story file has one
    pub description: Option<String>,
}

/// Ordered scenes ready to become work items.
///
/// # Examples
///
/// ```
/// use storyreel_storage::SceneCatalog;
///
/// let catalog = SceneCatalog::parse(
///     r#"{"scenes": [{"scene_number": 1, "cloudinary_url": "https://x/1.png"}]}"#,
///     r#"{"Scenes": [{"Scene": 1, "Description": "A fox wakes"}]}"#,
/// )
/// .unwrap();
///
/// let items = catalog.work_items();
/// assert_eq!(items.len(), 1);
/// assert_eq!(items[0].prompt, "A fox wakes");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SceneCatalog {
    scenes: Vec<SceneEntry>,
}

impl SceneCatalog {
    /// Read both input files.
    ///
    /// # Errors
    ///
    /// Returns an error if either file is missing, unreadable or malformed.
    #[tracing::instrument(skip(scene_urls, story_elements), fields(scenes = %scene_urls.display(), story = %story_elements.display()))]
    pub async fn from_files(scene_urls: &Path, story_elements: &Path) -> PersistenceResult<Self> {
        let urls = read_text(scene_urls).await?;
        let story = read_text(story_elements).await?;
        let catalog = Self::parse(&urls, &story)?;
        tracing::info!(scenes = catalog.len(), "Loaded scene catalog");
        Ok(catalog)
    }

    /// Build a catalog from the two documents' contents.
    ///
    /// Scenes keep the order of `scene_urls`. A scene with no matching
    /// description keeps an empty prompt and fails validation on its own.
    ///
    /// # Errors
    ///
    /// Returns an error if either document is malformed, a scene number is
    /// not a non-negative integer, or a scene number appears twice.
    pub fn parse(scene_urls: &str, story_elements: &str) -> PersistenceResult<Self> {
        let urls: SceneUrls = serde_json::from_str(scene_urls).map_err(|e| {
            PersistenceError::new(PersistenceErrorKind::Deserialization(format!(
                "scene urls: {}",
                e
            )))
        })?;
        let story: StoryElements = serde_json::from_str(story_elements).map_err(|e| {
            PersistenceError::new(PersistenceErrorKind::Deserialization(format!(
                "story elements: {}",
                e
            )))
        })?;

        let descriptions: HashMap<u32, String> = story
            .scenes
            .into_iter()
            .filter_map(|scene| Some((scene.scene.value()?, scene.description?)))
            .collect();

        let mut seen = HashSet::new();
        let scenes = urls
            .scenes
            .into_iter()
            .map(|scene| {
                let number = scene.scene_number.value().ok_or_else(|| {
                    PersistenceError::new(PersistenceErrorKind::Deserialization(format!(
                        "scene urls: invalid scene number {:?}",
                        scene.scene_number
                    )))
                })?;
                if !seen.insert(number) {
                    return Err(PersistenceError::new(PersistenceErrorKind::Deserialization(
                        format!("scene urls: duplicate scene number {}", number),
                    )));
                }
                if !descriptions.contains_key(&number) {
                    tracing::warn!(scene = number, "No description found for scene");
                }
                Ok(SceneEntry {
                    number,
                    image_url: scene.cloudinary_url,
                    description: descriptions.get(&number).cloned(),
                })
            })
            .collect::<PersistenceResult<Vec<_>>>()?;

        Ok(Self { scenes })
    }

    /// The scenes, in input order.
    pub fn scenes(&self) -> &[SceneEntry] {
        &self.scenes
    }

    /// Number of scenes.
    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    /// True when there are no scenes.
    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// One work item per scene, in input order.
    pub fn work_items(&self) -> Vec<WorkItem> {
        self.scenes
            .iter()
            .map(|scene| {
                WorkItem::scene(
                    scene.number,
                    scene.description.clone().unwrap_or_default(),
                    scene.image_url.clone(),
                )
            })
            .collect()
    }
}

async fn read_text(path: &Path) -> PersistenceResult<String> {
    tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            PersistenceError::new(PersistenceErrorKind::NotFound(path.display().to_string()))
        } else {
            PersistenceError::new(PersistenceErrorKind::FileRead(format!(
                "{}: {}",
                path.display(),
                e
            )))
        }
    })
}
