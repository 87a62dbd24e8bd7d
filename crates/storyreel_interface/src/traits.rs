//! Trait definitions for providers and pluggable pipeline behavior.

use async_trait::async_trait;
use serde_json::Value;
use std::path::Path;
use std::time::Duration;
use storyreel_core::{
    ContinuityContext, GenerationRequest, GenerationSettings, Manifest, ResultRecord, WorkItem,
};
use storyreel_error::{GenerationResult, PersistenceResult};

/// Raw transport to an asynchronous generation provider.
///
/// Implementations move JSON to and from the provider and report transport
/// trouble as provider errors. Interpreting the bodies is the job client's
/// concern, so a mock only has to script responses.
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Submit a generation job (`POST /generations`) and return the response body.
    async fn submit(&self, body: &Value) -> GenerationResult<Value>;

    /// Fetch a job's status (`GET /generations/{id}`) and return the response body.
    async fn fetch(&self, job_id: &str) -> GenerationResult<Value>;

    /// Provider name (e.g., "luma").
    fn provider_name(&self) -> &'static str;
}

/// Turns a work item into the request actually submitted.
///
/// Strategies are pure: the same item, context and settings always yield
/// the same request.
pub trait PayloadStrategy: Send + Sync {
    /// Build the request for `item`, drawing on `context` when it carries a link.
    fn build(
        &self,
        item: &WorkItem,
        context: &ContinuityContext,
        settings: &GenerationSettings,
    ) -> GenerationRequest;
}

/// Writes the prompt for a transition between two finished clips.
#[async_trait]
pub trait TransitionScripter: Send + Sync {
    /// Describe the motion that carries `from` into `to`.
    async fn script(&self, from: &ResultRecord, to: &ResultRecord) -> GenerationResult<String>;
}

/// How long to wait before each status poll, and how many polls to make.
pub trait PollSchedule: Send + Sync {
    /// Upper bound on status polls for one job.
    fn max_attempts(&self) -> u32;

    /// Delay before poll number `attempt` (1-based).
    fn delay(&self, attempt: u32) -> Duration;
}

/// Durable storage for batch manifests.
#[async_trait]
pub trait ManifestStore: Send + Sync {
    /// Replace whatever is at `destination` with `manifest`.
    async fn write(&self, manifest: &Manifest, destination: &Path) -> PersistenceResult<()>;

    /// Read a manifest previously written to `source`.
    async fn load(&self, source: &Path) -> PersistenceResult<Manifest>;
}
