//! Per-item generation error types.
//!
//! Everything here is recoverable at batch level: the orchestrator logs the
//! error against the offending work item and moves on to the next one.

use crate::{HttpError, JsonError};

/// Specific error conditions for a single generation work item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, derive_more::Display)]
pub enum GenerationErrorKind {
    /// The work item or request payload is malformed
    #[display("Invalid request: {}", _0)]
    Validation(String),
    /// Transport failure or malformed provider response
    #[display("Provider error: {}", _0)]
    Provider(String),
    /// The provider reported the job as failed
    #[display("Job {} failed: {}", job_id, reason)]
    JobFailed {
        /// Provider-assigned job identifier
        job_id: String,
        /// Failure reason reported by the provider
        reason: String,
    },
    /// The local polling budget ran out before a terminal state
    #[display("Job {} did not finish after {} polls", job_id, attempts)]
    JobTimeout {
        /// Provider-assigned job identifier
        job_id: String,
        /// Number of status polls performed
        attempts: u32,
    },
}

impl GenerationErrorKind {
    /// Stable short tag for logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            GenerationErrorKind::Validation(_) => "validation",
            GenerationErrorKind::Provider(_) => "provider",
            GenerationErrorKind::JobFailed { .. } => "job_failed",
            GenerationErrorKind::JobTimeout { .. } => "job_timeout",
        }
    }
}

/// Generation error with location tracking.
///
/// # Examples
///
/// ```
/// use storyreel_error::{GenerationError, GenerationErrorKind};
///
/// let err = GenerationError::new(GenerationErrorKind::JobTimeout {
///     job_id: "abc".to_string(),
///     attempts: 60,
/// });
/// assert_eq!(err.kind().label(), "job_timeout");
/// assert!(format!("{}", err).contains("60 polls"));
/// ```
#[derive(Debug, Clone, derive_more::Display, derive_more::Error)]
#[display("Generation Error: {} at line {} in {}", kind, line, file)]
pub struct GenerationError {
    /// The specific error condition
    pub kind: GenerationErrorKind,
    /// Line number where the error occurred
    pub line: u32,
    /// Source file where the error occurred
    pub file: &'static str,
}

impl GenerationError {
    /// Create a new GenerationError with automatic location tracking.
    #[track_caller]
    pub fn new(kind: GenerationErrorKind) -> Self {
        let location = std::panic::Location::caller();
        Self {
            kind,
            line: location.line(),
            file: location.file(),
        }
    }

    /// Shorthand for a validation failure.
    #[track_caller]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::Validation(message.into()))
    }

    /// Shorthand for a provider failure.
    #[track_caller]
    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::Provider(message.into()))
    }

    /// Get the error kind.
    pub fn kind(&self) -> &GenerationErrorKind {
        &self.kind
    }
}

impl From<HttpError> for GenerationError {
    #[track_caller]
    fn from(err: HttpError) -> Self {
        Self::provider(err.message)
    }
}

impl From<JsonError> for GenerationError {
    #[track_caller]
    fn from(err: JsonError) -> Self {
        Self::provider(format!("malformed response: {}", err.message))
    }
}

/// Result type for per-item generation operations.
pub type GenerationResult<T> = std::result::Result<T, GenerationError>;
