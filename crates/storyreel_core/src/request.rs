//! Provider request payloads.

use crate::{GenerationSettings, Keyframes};
use serde::{Deserialize, Serialize};
use storyreel_error::{BuilderError, BuilderErrorKind, GenerationError, GenerationResult};

/// Body of a `POST /generations` call.
///
/// # Examples
///
/// ```
/// use storyreel_core::{GenerationRequest, Keyframes, SourceRef};
///
/// let request = GenerationRequest::builder()
///     .prompt("Scene 1: a lighthouse at dusk")
///     .model("ray-2")
///     .aspect_ratio("16:9")
///     .duration("5s")
///     .keyframes(Keyframes::start(SourceRef::image("https://cdn.example.com/1.png")))
///     .build()
///     .unwrap();
///
/// assert!(request.validate().is_ok());
/// let body = serde_json::to_value(&request).unwrap();
/// assert_eq!(body["keyframes"]["frame0"]["type"], "image");
/// assert!(body.get("loop").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, derive_builder::Builder)]
#[builder(setter(into), build_fn(private, name = "build_internal"))]
pub struct GenerationRequest {
    /// Text prompt sent to the provider
    pub prompt: String,
    /// Provider model identifier
    pub model: String,
    /// Output aspect ratio
    pub aspect_ratio: String,
    /// Clip duration
    pub duration: String,
    /// Output resolution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub resolution: Option<String>,
    /// Loop flag
    #[serde(rename = "loop", default, skip_serializing_if = "Option::is_none")]
    #[builder(default, setter(into, strip_option))]
    pub loop_video: Option<bool>,
    /// Source keyframes
    pub keyframes: Keyframes,
}

impl GenerationRequestBuilder {
    /// Build the request.
    ///
    /// # Errors
    ///
    /// Returns an error if a required field was never set.
    pub fn build(&self) -> Result<GenerationRequest, BuilderError> {
        self.build_internal().map_err(|e| match e {
            GenerationRequestBuilderError::UninitializedField(field) => {
                BuilderError::new(BuilderErrorKind::MissingField(field.to_string()))
            }
            GenerationRequestBuilderError::ValidationError(reason) => BuilderError::from(reason),
        })
    }
}

impl GenerationRequest {
    /// Start building a request.
    pub fn builder() -> GenerationRequestBuilder {
        GenerationRequestBuilder::default()
    }

    /// Assemble a request from batch settings plus per-item prompt and frames.
    pub fn from_settings(
        settings: &GenerationSettings,
        prompt: impl Into<String>,
        keyframes: Keyframes,
    ) -> Self {
        Self {
            prompt: prompt.into(),
            model: settings.model.clone(),
            aspect_ratio: settings.aspect_ratio.clone(),
            duration: settings.duration.clone(),
            resolution: settings.resolution.clone(),
            loop_video: settings.loop_video,
            keyframes,
        }
    }

    /// Check the request before it is sent anywhere.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the prompt or model is blank, the opening
    /// keyframe is missing, or any keyframe is malformed for its kind.
    pub fn validate(&self) -> GenerationResult<()> {
        if self.prompt.trim().is_empty() {
            return Err(GenerationError::validation("prompt is empty"));
        }
        if self.model.trim().is_empty() {
            return Err(GenerationError::validation("model is empty"));
        }
        if self.keyframes.first().is_none() {
            return Err(GenerationError::validation(format!(
                "missing source reference ({})",
                Keyframes::START
            )));
        }
        for (name, source) in self.keyframes.iter() {
            source.validate(name)?;
        }
        Ok(())
    }
}
