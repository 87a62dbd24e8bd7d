//! Source artifact references and keyframe maps.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use storyreel_error::{GenerationError, GenerationResult};

/// A keyframe source: either an image by URL or a prior generation by id.
///
/// # Examples
///
/// ```
/// use storyreel_core::SourceRef;
///
/// let image = SourceRef::image("https://cdn.example.com/scene1.png");
/// let json = serde_json::to_value(&image).unwrap();
/// assert_eq!(json["type"], "image");
/// assert_eq!(json["url"], "https://cdn.example.com/scene1.png");
///
/// let chained = SourceRef::generation("6f0c2a");
/// assert_eq!(serde_json::to_value(&chained).unwrap()["type"], "generation");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SourceRef {
    /// An image reachable over HTTP(S)
    Image {
        /// Image URL
        url: String,
    },
    /// A previously completed provider generation
    Generation {
        /// Provider job id
        id: String,
    },
}

impl SourceRef {
    /// Reference an image by URL.
    pub fn image(url: impl Into<String>) -> Self {
        SourceRef::Image { url: url.into() }
    }

    /// Reference a prior generation by job id.
    pub fn generation(id: impl Into<String>) -> Self {
        SourceRef::Generation { id: id.into() }
    }

    /// Check that the reference is well-formed for its declared kind.
    ///
    /// An image must carry an `http(s)://` URL; a generation must carry a
    /// bare id, never a URL.
    ///
    /// # Errors
    ///
    /// Returns a validation error naming `frame` when the reference is malformed.
    pub fn validate(&self, frame: &str) -> GenerationResult<()> {
        match self {
            SourceRef::Image { url } => {
                let url = url.trim();
                let rest = url
                    .strip_prefix("https://")
                    .or_else(|| url.strip_prefix("http://"));
                match rest {
                    Some(host) if !host.is_empty() => Ok(()),
                    _ => Err(GenerationError::validation(format!(
                        "{} image reference is not an http(s) URL: '{}'",
                        frame, url
                    ))),
                }
            }
            SourceRef::Generation { id } => {
                let id = id.trim();
                if id.is_empty() {
                    Err(GenerationError::validation(format!(
                        "{} generation reference has an empty id",
                        frame
                    )))
                } else if id.contains("://") {
                    Err(GenerationError::validation(format!(
                        "{} generation reference holds a URL instead of a job id: '{}'",
                        frame, id
                    )))
                } else {
                    Ok(())
                }
            }
        }
    }
}

/// Named keyframes for a generation request.
///
/// Serialized as a JSON object keyed by frame name (`frame0`, `frame120`).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Keyframes(BTreeMap<String, SourceRef>);

impl Keyframes {
    /// Name of the opening keyframe.
    pub const START: &'static str = "frame0";
    /// Name of the closing keyframe for a five second clip.
    pub const END: &'static str = "frame120";

    /// Keyframes with only an opening frame.
    pub fn start(source: SourceRef) -> Self {
        Self::default().with_frame(Self::START, source)
    }

    /// Keyframes spanning from one source to another.
    pub fn between(from: SourceRef, to: SourceRef) -> Self {
        Self::start(from).with_frame(Self::END, to)
    }

    /// Add or replace a named frame.
    pub fn with_frame(mut self, name: impl Into<String>, source: SourceRef) -> Self {
        self.0.insert(name.into(), source);
        self
    }

    /// Look up a frame by name.
    pub fn get(&self, name: &str) -> Option<&SourceRef> {
        self.0.get(name)
    }

    /// The opening frame, if present.
    pub fn first(&self) -> Option<&SourceRef> {
        self.get(Self::START)
    }

    /// Iterate frames in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &SourceRef)> {
        self.0.iter()
    }

    /// Number of frames.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when no frames are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
