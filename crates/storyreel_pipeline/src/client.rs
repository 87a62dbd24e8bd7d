//! Submit-and-poll client over a raw provider transport.

use serde::Serialize;
use serde_json::Value;
use storyreel_core::{GenerationRequest, Job, error_message};
use storyreel_error::{GenerationError, GenerationResult};
use storyreel_interface::GenerationProvider;
use storyreel_rate_limit::JobLimiter;
use tracing::{debug, instrument};

/// Submits generation jobs and fetches their status.
///
/// Holds no state between calls beyond its provider and optional pacing
/// limiter.
#[derive(Debug, Clone)]
pub struct JobClient<P: GenerationProvider> {
    provider: P,
    limiter: Option<JobLimiter>,
}

impl<P: GenerationProvider> JobClient<P> {
    /// Create a client over `provider`.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            limiter: None,
        }
    }

    /// Pace every HTTP call through `limiter`'s request quota.
    pub fn with_limiter(mut self, limiter: JobLimiter) -> Self {
        self.limiter = Some(limiter);
        self
    }

    /// The underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    async fn pace(&self) {
        if let Some(limiter) = &self.limiter {
            limiter.pace().await;
        }
    }

    /// Submit a request and return the pending job.
    ///
    /// The request is validated first; an invalid request never reaches the
    /// provider.
    ///
    /// # Errors
    ///
    /// - Validation error if the request is malformed or cannot be encoded
    /// - Provider error on transport failure, or when the response carries no
    ///   job id (the provider's own message is kept)
    #[instrument(skip(self, request), fields(provider = self.provider.provider_name()))]
    pub async fn submit(&self, request: &GenerationRequest) -> GenerationResult<Job> {
        request.validate()?;

        let body = encode_body(request)?;

        self.pace().await;
        let response = self.provider.submit(&body).await?;
        let job = parse_submission(&response)?;

        debug!(job_id = %job.id, "Job accepted");
        Ok(job)
    }

    /// Fetch the current state of `job_id`.
    ///
    /// A well-formed response without a state is an ordinary pending job.
    ///
    /// # Errors
    ///
    /// Provider error on transport failure or a malformed response.
    #[instrument(skip(self), fields(provider = self.provider.provider_name()))]
    pub async fn poll(&self, job_id: &str) -> GenerationResult<Job> {
        self.pace().await;
        let response = self.provider.fetch(job_id).await?;
        parse_status(job_id, &response)
    }
}

/// Encode an outgoing payload as the JSON body sent to the provider.
///
/// Nothing has reached the provider yet, so a failure here is the caller's.
pub(crate) fn encode_body<T: Serialize>(payload: &T) -> GenerationResult<Value> {
    serde_json::to_value(payload).map_err(|e| {
        GenerationError::validation(format!("request could not be encoded as JSON: {}", e))
    })
}

/// Read a submission response: `{id}` or `{error}`.
pub(crate) fn parse_submission(body: &Value) -> GenerationResult<Job> {
    match body
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.trim().is_empty())
    {
        Some(id) => Ok(Job::pending(id)),
        None => Err(GenerationError::provider(
            error_message(body).unwrap_or_else(|| "response missing id".to_string()),
        )),
    }
}

/// Read a status response into a fresh job snapshot.
pub(crate) fn parse_status(job_id: &str, body: &Value) -> GenerationResult<Job> {
    let object = body.as_object().ok_or_else(|| {
        GenerationError::provider(format!(
            "malformed status response for job {}: expected an object",
            job_id
        ))
    })?;

    let id = object
        .get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .unwrap_or(job_id);

    let state = match object.get("state") {
        None | Some(Value::Null) => return Ok(Job::pending(id)),
        Some(Value::String(state)) => state.to_ascii_lowercase(),
        Some(other) => {
            return Err(GenerationError::provider(format!(
                "malformed status response for job {}: state is {}",
                job_id, other
            )));
        }
    };

    match state.as_str() {
        "pending" | "queued" => Ok(Job::pending(id)),
        "completed" => body
            .pointer("/assets/video")
            .and_then(Value::as_str)
            .filter(|url| !url.is_empty())
            .map(|url| Job::completed(id, url))
            .ok_or_else(|| {
                GenerationError::provider(format!(
                    "job {} completed but no video URL was returned",
                    id
                ))
            }),
        "failed" => {
            let reason = object
                .get("failure_reason")
                .and_then(Value::as_str)
                .filter(|reason| !reason.trim().is_empty())
                .unwrap_or("Unknown reason");
            Ok(Job::failed(id, reason))
        }
        _ => Ok(Job::running(id)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use storyreel_core::JobState;
    use storyreel_error::GenerationErrorKind;

    #[test]
    fn unencodable_request_is_validation_error() {
        let mut frames = std::collections::HashMap::new();
        frames.insert((0u8, 120u8), "frame");

        let err = encode_body(&frames).unwrap_err();
        match err.kind() {
            GenerationErrorKind::Validation(message) => {
                assert!(message.starts_with("request could not be encoded as JSON"))
            }
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn submission_with_id_is_pending() {
        let job = parse_submission(&json!({"id": "abc", "state": "queued"})).unwrap();
        assert_eq!(job.id, "abc");
        assert_eq!(job.state, JobState::Pending);
    }

    #[test]
    fn submission_error_text_is_surfaced() {
        let err = parse_submission(&json!({"error": "quota exceeded"})).unwrap_err();
        match err.kind() {
            GenerationErrorKind::Provider(message) => assert_eq!(message, "quota exceeded"),
            other => panic!("unexpected kind: {:?}", other),
        }
    }

    #[test]
    fn submission_without_id_or_error() {
        let err = parse_submission(&json!({})).unwrap_err();
        assert!(err.to_string().contains("response missing id"));
    }

    #[test]
    fn absent_state_is_pending_not_error() {
        assert_eq!(parse_status("j", &json!({})).unwrap().state, JobState::Pending);
        assert_eq!(
            parse_status("j", &json!({"state": null})).unwrap().state,
            JobState::Pending
        );
        assert_eq!(
            parse_status("j", &json!({"state": "queued"})).unwrap().state,
            JobState::Pending
        );
    }

    #[test]
    fn unknown_progress_states_are_running() {
        for state in ["running", "dreaming", "processing"] {
            let job = parse_status("j", &json!({"state": state})).unwrap();
            assert_eq!(job.state, JobState::Running);
        }
    }

    #[test]
    fn completed_requires_video_url() {
        let job = parse_status(
            "j",
            &json!({"state": "completed", "assets": {"video": "https://x/v.mp4"}}),
        )
        .unwrap();
        assert_eq!(job.result_ref.as_deref(), Some("https://x/v.mp4"));

        let err = parse_status("j", &json!({"state": "completed", "assets": {}})).unwrap_err();
        assert_eq!(err.kind().label(), "provider");
    }

    #[test]
    fn failed_defaults_reason() {
        let job = parse_status("j", &json!({"state": "failed"})).unwrap();
        assert_eq!(job.failure_reason.as_deref(), Some("Unknown reason"));

        let job = parse_status("j", &json!({"state": "failed", "failure_reason": "nsfw"})).unwrap();
        assert_eq!(job.failure_reason.as_deref(), Some("nsfw"));
    }

    #[test]
    fn malformed_bodies_are_provider_errors() {
        assert!(parse_status("j", &json!("completed")).is_err());
        assert!(parse_status("j", &json!({"state": 3})).is_err());
    }
}
