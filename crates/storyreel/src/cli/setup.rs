//! Shared wiring for the command handlers.

use std::path::Path;
use storyreel::{
    JobClient, JobLimiter, LumaProvider, PollPolicy, StoryreelConfig, StoryreelResult,
};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

/// Load configuration from `path` over the bundled defaults, or from the
/// standard locations when no path is given.
pub fn load_config(path: Option<&Path>) -> StoryreelResult<StoryreelConfig> {
    match path {
        Some(path) => StoryreelConfig::from_file(path),
        None => StoryreelConfig::load(),
    }
}

/// A token cancelled on the first Ctrl-C.
pub fn shutdown_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                warn!("Interrupt received, finishing in-flight jobs and skipping the rest");
                trigger.cancel();
            }
            Err(e) => warn!(error = %e, "Could not listen for Ctrl-C"),
        }
    });
    token
}

/// Provider-backed client and the limiter it shares with the orchestrator.
pub(super) fn connect(
    config: &StoryreelConfig,
) -> StoryreelResult<(JobClient<LumaProvider>, JobLimiter, PollPolicy)> {
    let provider = LumaProvider::from_config(config)?;
    let limiter = JobLimiter::from_config(&config.limits);
    info!(
        base_url = provider.base_url(),
        max_concurrent_jobs = limiter.max_jobs(),
        "Connected provider"
    );

    let client = JobClient::new(provider).with_limiter(limiter.clone());
    Ok((client, limiter, PollPolicy::from_config(&config.polling)))
}
