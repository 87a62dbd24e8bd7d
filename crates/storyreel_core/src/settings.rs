//! Batch-wide generation parameters.

use serde::{Deserialize, Serialize};

/// Parameters applied to every request in a batch.
///
/// # Examples
///
/// ```
/// use storyreel_core::GenerationSettings;
///
/// let settings = GenerationSettings::default();
/// assert_eq!(settings.model, "ray-2");
/// assert_eq!(settings.aspect_ratio, "16:9");
/// assert_eq!(settings.duration, "5s");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Provider model identifier
    #[serde(default = "default_model")]
    pub model: String,
    /// Output aspect ratio, e.g. `16:9`
    #[serde(default = "default_aspect_ratio")]
    pub aspect_ratio: String,
    /// Clip duration, e.g. `5s`
    #[serde(default = "default_duration")]
    pub duration: String,
    /// Output resolution, omitted from requests when unset
    #[serde(default = "default_resolution")]
    pub resolution: Option<String>,
    /// Whether the clip should loop, omitted from requests when unset
    #[serde(default = "default_loop")]
    pub loop_video: Option<bool>,
}

fn default_model() -> String {
    "ray-2".to_string()
}

fn default_aspect_ratio() -> String {
    "16:9".to_string()
}

fn default_duration() -> String {
    "5s".to_string()
}

fn default_resolution() -> Option<String> {
    Some("720p".to_string())
}

fn default_loop() -> Option<bool> {
    Some(false)
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            aspect_ratio: default_aspect_ratio(),
            duration: default_duration(),
            resolution: default_resolution(),
            loop_video: default_loop(),
        }
    }
}
