//! State carried from one successful item to the next.

use crate::{ResultRecord, SequenceKey};
use serde::{Deserialize, Serialize};

/// What the next request may borrow from the previous success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContinuityLink {
    /// Key of the previous item
    pub previous_sequence_key: SequenceKey,
    /// Artifact the previous item produced
    pub previous_result_ref: String,
    /// Prompt actually submitted for the previous item
    pub previous_enhanced_payload: String,
    /// Provider job id of the previous item
    pub previous_job_id: String,
}

/// Continuity between consecutive work items.
///
/// Holds a link only while the immediately preceding item succeeded. Every
/// transition returns a new value.
///
/// # Examples
///
/// ```
/// use storyreel_core::ContinuityContext;
///
/// let context = ContinuityContext::default();
/// assert!(context.is_empty());
/// assert!(context.reset().is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ContinuityContext {
    link: Option<ContinuityLink>,
}

impl ContinuityContext {
    /// The empty context.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Context referencing the just-completed item.
    pub fn advance(&self, record: &ResultRecord) -> Self {
        Self {
            link: Some(ContinuityLink {
                previous_sequence_key: record.sequence_key,
                previous_result_ref: record.artifact_ref.clone(),
                previous_enhanced_payload: record.request.prompt.clone(),
                previous_job_id: record.job_id.clone(),
            }),
        }
    }

    /// Sever the chain after a failure.
    pub fn reset(&self) -> Self {
        Self::empty()
    }

    /// The carried link, if the previous item succeeded.
    pub fn link(&self) -> Option<&ContinuityLink> {
        self.link.as_ref()
    }

    /// Key of the previous item, if any.
    pub fn previous_sequence_key(&self) -> Option<SequenceKey> {
        self.link.as_ref().map(|link| link.previous_sequence_key)
    }

    /// True when no link is carried.
    pub fn is_empty(&self) -> bool {
        self.link.is_none()
    }
}
