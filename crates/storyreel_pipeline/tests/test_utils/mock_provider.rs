//! Scripted generation provider for testing.

use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use storyreel_error::{GenerationError, GenerationResult};
use storyreel_interface::GenerationProvider;
use tokio_util::sync::CancellationToken;

#[derive(Default)]
struct State {
    submits: usize,
    accepted: usize,
    fetches: usize,
    submitted: Vec<Value>,
    rejections: Vec<(String, Value)>,
    statuses: HashMap<String, Vec<Value>>,
    prompt_statuses: Vec<(String, Vec<Value>)>,
    job_prompts: HashMap<String, String>,
    polls_per_job: HashMap<String, usize>,
    in_flight: usize,
    max_in_flight: usize,
    cancel_after: Option<(usize, CancellationToken)>,
    submit_transport_error: bool,
}

/// Mock provider with scripted responses.
///
/// By default every submission is accepted as `job-<n>` (1-based, in
/// submission order) and every job completes on its first poll with
/// `https://videos.example.com/<job id>.mp4`. Clones share state.
#[derive(Clone, Default)]
pub struct MockProvider {
    state: Arc<Mutex<State>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Submissions whose prompt contains `needle` get `body` back instead of an id.
    pub fn reject_when_prompt_contains(self, needle: &str, body: Value) -> Self {
        self.state
            .lock()
            .unwrap()
            .rejections
            .push((needle.to_string(), body));
        self
    }

    /// Poll responses for `job_id`, in order; the last one repeats.
    pub fn script_job(self, job_id: &str, statuses: Vec<Value>) -> Self {
        self.state
            .lock()
            .unwrap()
            .statuses
            .insert(job_id.to_string(), statuses);
        self
    }

    /// Poll responses for any job whose prompt contains `needle`.
    pub fn script_prompt(self, needle: &str, statuses: Vec<Value>) -> Self {
        self.state
            .lock()
            .unwrap()
            .prompt_statuses
            .push((needle.to_string(), statuses));
        self
    }

    /// Cancel `token` once `submits` submissions have been accepted.
    pub fn cancel_after_submits(self, submits: usize, token: CancellationToken) -> Self {
        self.state.lock().unwrap().cancel_after = Some((submits, token));
        self
    }

    /// Every submission fails at the transport level.
    pub fn failing_transport(self) -> Self {
        self.state.lock().unwrap().submit_transport_error = true;
        self
    }

    pub fn submit_count(&self) -> usize {
        self.state.lock().unwrap().submits
    }

    pub fn fetch_count(&self) -> usize {
        self.state.lock().unwrap().fetches
    }

    pub fn submitted(&self) -> Vec<Value> {
        self.state.lock().unwrap().submitted.clone()
    }

    pub fn submitted_prompts(&self) -> Vec<String> {
        self.submitted()
            .iter()
            .map(|body| body["prompt"].as_str().unwrap_or_default().to_string())
            .collect()
    }

    pub fn max_in_flight(&self) -> usize {
        self.state.lock().unwrap().max_in_flight
    }

    pub fn completed(job_id: &str) -> Value {
        json!({
            "id": job_id,
            "state": "completed",
            "assets": {"video": format!("https://videos.example.com/{}.mp4", job_id)}
        })
    }
}

#[async_trait]
impl GenerationProvider for MockProvider {
    async fn submit(&self, body: &Value) -> GenerationResult<Value> {
        let mut state = self.state.lock().unwrap();
        state.submits += 1;
        state.submitted.push(body.clone());

        if state.submit_transport_error {
            return Err(GenerationError::provider("connection refused"));
        }

        let prompt = body["prompt"].as_str().unwrap_or_default().to_string();
        if let Some((_, rejection)) = state
            .rejections
            .iter()
            .find(|(needle, _)| prompt.contains(needle.as_str()))
        {
            return Ok(rejection.clone());
        }

        state.accepted += 1;
        let accepted = state.accepted;
        let job_id = format!("job-{}", accepted);
        state.job_prompts.insert(job_id.clone(), prompt);
        state.in_flight += 1;
        state.max_in_flight = state.max_in_flight.max(state.in_flight);

        if let Some((after, token)) = &state.cancel_after {
            if accepted >= *after {
                token.cancel();
            }
        }

        Ok(json!({"id": job_id, "state": "queued"}))
    }

    async fn fetch(&self, job_id: &str) -> GenerationResult<Value> {
        tokio::task::yield_now().await;

        let mut state = self.state.lock().unwrap();
        state.fetches += 1;
        let poll = {
            let count = state.polls_per_job.entry(job_id.to_string()).or_insert(0);
            *count += 1;
            *count
        };

        let prompt = state.job_prompts.get(job_id).cloned().unwrap_or_default();
        let script = state.statuses.get(job_id).cloned().or_else(|| {
            state
                .prompt_statuses
                .iter()
                .find(|(needle, _)| prompt.contains(needle.as_str()))
                .map(|(_, statuses)| statuses.clone())
        });

        let response = match script {
            Some(statuses) if !statuses.is_empty() => {
                statuses[(poll - 1).min(statuses.len() - 1)].clone()
            }
            _ => Self::completed(job_id),
        };

        if matches!(response["state"].as_str(), Some("completed") | Some("failed")) {
            state.in_flight = state.in_flight.saturating_sub(1);
        }
        Ok(response)
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }
}
