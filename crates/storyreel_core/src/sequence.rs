//! Ordering keys for work items.

use serde::{Deserialize, Serialize};

/// Identifies a work item within a batch.
///
/// Scene batches use `Single(scene_number)`; interpolation batches use
/// `Pair(from, to)`. Serialized untagged, so a scene key is a bare integer and
/// a pair key is a two-element array.
///
/// # Examples
///
/// ```
/// use storyreel_core::SequenceKey;
///
/// assert_eq!(serde_json::to_string(&SequenceKey::Single(3)).unwrap(), "3");
/// assert_eq!(serde_json::to_string(&SequenceKey::Pair(1, 2)).unwrap(), "[1,2]");
/// assert_eq!(SequenceKey::Pair(1, 2).to_string(), "1-2");
/// ```
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(untagged)]
pub enum SequenceKey {
    /// A single scene
    #[display("{}", _0)]
    Single(u32),
    /// A transition between two scenes
    #[display("{}-{}", _0, _1)]
    Pair(u32, u32),
}

impl SequenceKey {
    /// Scene number for a single-scene key.
    pub fn scene(&self) -> Option<u32> {
        match self {
            SequenceKey::Single(n) => Some(*n),
            SequenceKey::Pair(..) => None,
        }
    }

    /// Human label used in summaries ("Scene 3", "Scenes 1-2").
    pub fn label(&self) -> String {
        match self {
            SequenceKey::Single(n) => format!("Scene {}", n),
            SequenceKey::Pair(a, b) => format!("Scenes {}-{}", a, b),
        }
    }
}

impl From<u32> for SequenceKey {
    fn from(scene: u32) -> Self {
        SequenceKey::Single(scene)
    }
}
