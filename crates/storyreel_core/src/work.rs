//! Units of submitted work.

use crate::{Keyframes, SequenceKey, SourceRef};
use serde::{Deserialize, Serialize};

/// One scene or scene pair to generate.
///
/// The prompt is the raw upstream text; a payload strategy turns it into the
/// submitted request.
///
/// # Examples
///
/// ```
/// use storyreel_core::{SequenceKey, SourceRef, WorkItem};
///
/// let item = WorkItem::scene(2, "The fox reaches the river", "https://cdn.example.com/2.png");
/// assert_eq!(item.sequence_key, SequenceKey::Single(2));
/// assert_eq!(
///     item.keyframes.first(),
///     Some(&SourceRef::image("https://cdn.example.com/2.png"))
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkItem {
    /// Ordering key, unique within a batch
    pub sequence_key: SequenceKey,
    /// Upstream description text
    pub prompt: String,
    /// Source artifacts for the clip
    pub keyframes: Keyframes,
}

impl WorkItem {
    /// Create a work item.
    pub fn new(sequence_key: SequenceKey, prompt: impl Into<String>, keyframes: Keyframes) -> Self {
        Self {
            sequence_key,
            prompt: prompt.into(),
            keyframes,
        }
    }

    /// A scene item animated from a single image.
    pub fn scene(number: u32, prompt: impl Into<String>, image_url: impl Into<String>) -> Self {
        Self::new(
            SequenceKey::Single(number),
            prompt,
            Keyframes::start(SourceRef::image(image_url)),
        )
    }
}
