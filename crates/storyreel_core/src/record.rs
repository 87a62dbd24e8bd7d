//! Per-item outcomes.

use crate::{GenerationRequest, SequenceKey};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The outcome of one successful work item.
///
/// Failed items never produce a record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultRecord {
    /// Key of the work item that produced this record
    pub sequence_key: SequenceKey,
    /// Upstream text before enhancement
    pub original_prompt: String,
    /// Exact request submitted to the provider
    pub request: GenerationRequest,
    /// Provider job id
    pub job_id: String,
    /// Produced artifact URL
    pub artifact_ref: String,
    /// Item this one was made continuous with
    pub continuity_link: Option<SequenceKey>,
    /// When the job was observed complete
    pub completed_at: DateTime<Utc>,
}
