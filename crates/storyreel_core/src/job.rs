//! Provider job handles.

use serde::{Deserialize, Serialize};

/// Lifecycle state of a provider job.
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
pub enum JobState {
    /// Accepted but not started
    #[display("pending")]
    Pending,
    /// Work in progress
    #[display("running")]
    Running,
    /// Finished with an artifact
    #[display("completed")]
    Completed,
    /// Abandoned by the provider
    #[display("failed")]
    Failed,
}

impl JobState {
    /// Completed or failed; no further polling is meaningful.
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }
}

/// Snapshot of an in-flight provider job.
///
/// Never mutated locally: each poll replaces the previous snapshot.
///
/// # Examples
///
/// ```
/// use storyreel_core::{Job, JobState};
///
/// let job = Job::completed("gen-1", "https://x/video.mp4");
/// assert_eq!(job.state, JobState::Completed);
/// assert!(job.state.is_terminal());
/// assert_eq!(job.result_ref.as_deref(), Some("https://x/video.mp4"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Provider-assigned id
    pub id: String,
    /// Current state
    pub state: JobState,
    /// Artifact URL, only when completed
    pub result_ref: Option<String>,
    /// Provider reason, only when failed
    pub failure_reason: Option<String>,
}

impl Job {
    fn with_state(id: impl Into<String>, state: JobState) -> Self {
        Self {
            id: id.into(),
            state,
            result_ref: None,
            failure_reason: None,
        }
    }

    /// A freshly submitted job.
    pub fn pending(id: impl Into<String>) -> Self {
        Self::with_state(id, JobState::Pending)
    }

    /// A job the provider is working on.
    pub fn running(id: impl Into<String>) -> Self {
        Self::with_state(id, JobState::Running)
    }

    /// A finished job with its artifact.
    pub fn completed(id: impl Into<String>, result_ref: impl Into<String>) -> Self {
        Self {
            result_ref: Some(result_ref.into()),
            ..Self::with_state(id, JobState::Completed)
        }
    }

    /// A job the provider gave up on.
    pub fn failed(id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            failure_reason: Some(reason.into()),
            ..Self::with_state(id, JobState::Failed)
        }
    }
}
