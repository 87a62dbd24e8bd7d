//! Durable batch output.

use crate::{ResultRecord, SequenceKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a manifest's records represent.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
)]
#[serde(rename_all = "lowercase")]
pub enum ManifestKind {
    /// One clip per scene
    #[display("scenes")]
    Scenes,
    /// Transition clips between scene pairs
    #[display("interpolation")]
    Interpolation,
}

/// Run-level facts recorded beside the results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestMetadata {
    /// Number of work items handed to the run
    pub total_items: usize,
    /// Items that produced a record
    pub succeeded: usize,
    /// Items that were attempted and failed
    pub failed: usize,
    /// Items never submitted because of shutdown
    pub skipped: usize,
    /// When the run finished
    pub processed_at: DateTime<Utc>,
    /// Provider model identifier
    pub provider_model: String,
    /// Whether continuity was threaded between items
    pub continuity_enabled: bool,
    /// Scenes or interpolation
    pub kind: ManifestKind,
    /// Aspect ratio used for every request
    pub aspect_ratio: String,
    /// Clip duration used for every request
    pub duration: String,
}

/// Metadata plus ordered result records for one batch run.
///
/// # Examples
///
/// ```
/// use chrono::Utc;
/// use storyreel_core::{Manifest, ManifestKind, ManifestMetadata};
///
/// let manifest = Manifest {
///     metadata: ManifestMetadata {
///         total_items: 0,
///         succeeded: 0,
///         failed: 0,
///         skipped: 0,
///         processed_at: Utc::now(),
///         provider_model: "ray-2".to_string(),
///         continuity_enabled: true,
///         kind: ManifestKind::Scenes,
///         aspect_ratio: "16:9".to_string(),
///         duration: "5s".to_string(),
///     },
///     records: vec![],
/// };
/// assert!(manifest.artifact_refs().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Run metadata
    pub metadata: ManifestMetadata,
    /// Successful outcomes in input order
    pub records: Vec<ResultRecord>,
}

impl Manifest {
    /// Artifact URLs in record order, ready for concatenation.
    pub fn artifact_refs(&self) -> Vec<&str> {
        self.records
            .iter()
            .map(|record| record.artifact_ref.as_str())
            .collect()
    }

    /// Find the record for a single scene.
    pub fn record_for(&self, scene: u32) -> Option<&ResultRecord> {
        self.records
            .iter()
            .find(|record| record.sequence_key == SequenceKey::Single(scene))
    }
}
