//! Bounded polling until a job reaches a terminal state.

use crate::JobClient;
use std::time::Duration;
use storyreel_core::{Job, JobState};
use storyreel_error::{GenerationError, GenerationErrorKind, GenerationResult};
use storyreel_interface::{GenerationProvider, PollSchedule};
use storyreel_rate_limit::{Backoff, PollingConfig};
use tracing::{debug, info, instrument};

/// Poll budget and pacing for one job.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use storyreel_interface::PollSchedule;
/// use storyreel_pipeline::{Backoff, PollPolicy};
///
/// let policy = PollPolicy::default();
/// assert_eq!(policy.max_attempts(), 60);
/// assert_eq!(policy.delay(1), Duration::from_secs(5));
///
/// let fast = PollPolicy::immediate(3);
/// assert_eq!(fast.delay(2), Duration::ZERO);
///
/// let growing = PollPolicy::new(10, Duration::from_secs(2), Backoff::Exponential, Duration::from_secs(10));
/// assert_eq!(growing.delay(3), Duration::from_secs(8));
/// assert_eq!(growing.delay(4), Duration::from_secs(10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    max_attempts: u32,
    interval: Duration,
    backoff: Backoff,
    max_interval: Duration,
}

impl PollPolicy {
    /// Create a policy.
    pub fn new(max_attempts: u32, interval: Duration, backoff: Backoff, max_interval: Duration) -> Self {
        Self {
            max_attempts,
            interval,
            backoff,
            max_interval,
        }
    }

    /// A policy that never sleeps.
    pub fn immediate(max_attempts: u32) -> Self {
        Self::new(max_attempts, Duration::ZERO, Backoff::Constant, Duration::ZERO)
    }

    /// Build from the `[polling]` section.
    pub fn from_config(config: &PollingConfig) -> Self {
        Self::new(
            config.max_attempts,
            config.interval(),
            config.backoff,
            config.max_interval(),
        )
    }
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self::from_config(&PollingConfig::default())
    }
}

impl PollSchedule for PollPolicy {
    fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    fn delay(&self, attempt: u32) -> Duration {
        self.backoff.delay(self.interval, attempt, self.max_interval)
    }
}

/// Poll `job_id` until it completes, fails, or the schedule runs out.
///
/// Each attempt waits first, then polls, so the provider gets one interval
/// before the first check. Dropping the returned future stops polling.
///
/// # Errors
///
/// - `JobFailed` as soon as the provider reports failure
/// - `JobTimeout` when every attempt saw a non-terminal state
/// - Provider error if a poll itself fails
#[instrument(skip(client, schedule), fields(max_attempts = schedule.max_attempts()))]
pub async fn await_terminal<P: GenerationProvider>(
    client: &JobClient<P>,
    job_id: &str,
    schedule: &dyn PollSchedule,
) -> GenerationResult<Job> {
    let max_attempts = schedule.max_attempts();

    for attempt in 1..=max_attempts {
        let delay = schedule.delay(attempt);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        let job = client.poll(job_id).await?;
        debug!(attempt, state = %job.state, "Polled job");

        match job.state {
            JobState::Completed => {
                info!(attempt, "Job completed");
                return Ok(job);
            }
            JobState::Failed => {
                let reason = job
                    .failure_reason
                    .unwrap_or_else(|| "Unknown reason".to_string());
                return Err(GenerationError::new(GenerationErrorKind::JobFailed {
                    job_id: job.id,
                    reason,
                }));
            }
            JobState::Pending | JobState::Running => {}
        }
    }

    Err(GenerationError::new(GenerationErrorKind::JobTimeout {
        job_id: job_id.to_string(),
        attempts: max_attempts,
    }))
}
