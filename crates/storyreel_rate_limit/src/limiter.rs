//! Job concurrency bound and request pacing.
//!
//! A Tokio semaphore caps how many provider jobs are in flight; an optional
//! governor quota caps outgoing HTTP requests per minute.

use crate::LimitsConfig;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter as GovernorRateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};
use tracing::trace;

type DirectRateLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, DefaultClock>;

/// Shared limiter for a batch run. Clones share the same budget.
///
/// # Example
///
/// ```
/// use storyreel_rate_limit::JobLimiter;
///
/// # #[tokio::main]
/// # async fn main() {
/// let limiter = JobLimiter::new(2, None);
/// let permit = limiter.acquire().await.unwrap();
/// assert_eq!(limiter.available(), 1);
/// drop(permit);
/// assert_eq!(limiter.available(), 2);
/// # }
/// ```
#[derive(Clone)]
pub struct JobLimiter {
    jobs: Arc<Semaphore>,
    max_jobs: usize,
    requests: Option<Arc<DirectRateLimiter>>,
}

impl JobLimiter {
    /// Create a limiter; `max_concurrent_jobs` of zero is treated as one.
    pub fn new(max_concurrent_jobs: u32, requests_per_minute: Option<u32>) -> Self {
        let max_jobs = max_concurrent_jobs.max(1) as usize;
        let requests = requests_per_minute
            .and_then(NonZeroU32::new)
            .map(|n| Arc::new(GovernorRateLimiter::direct(Quota::per_minute(n))));

        Self {
            jobs: Arc::new(Semaphore::new(max_jobs)),
            max_jobs,
            requests,
        }
    }

    /// Create a limiter from the `[limits]` section.
    pub fn from_config(config: &LimitsConfig) -> Self {
        Self::new(config.max_concurrent_jobs, config.requests_per_minute)
    }

    /// Wait for a job slot. Returns `None` once the limiter is closed.
    pub async fn acquire(&self) -> Option<JobPermit> {
        let permit = self.jobs.clone().acquire_owned().await.ok()?;
        trace!(available = self.jobs.available_permits(), "Job slot acquired");
        Some(JobPermit { _permit: permit })
    }

    /// Take a job slot only if one is free right now.
    pub fn try_acquire(&self) -> Option<JobPermit> {
        let permit = self.jobs.clone().try_acquire_owned().ok()?;
        Some(JobPermit { _permit: permit })
    }

    /// Wait until the request quota allows another HTTP call.
    pub async fn pace(&self) {
        if let Some(limiter) = &self.requests {
            limiter.until_ready().await;
        }
    }

    /// Stop handing out job slots; pending and future `acquire` calls return `None`.
    pub fn close(&self) {
        self.jobs.close();
    }

    /// Free job slots.
    pub fn available(&self) -> usize {
        self.jobs.available_permits()
    }

    /// Configured job bound.
    pub fn max_jobs(&self) -> usize {
        self.max_jobs
    }
}

impl std::fmt::Debug for JobLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobLimiter")
            .field("max_jobs", &self.max_jobs)
            .field("available", &self.jobs.available_permits())
            .field("paced", &self.requests.is_some())
            .finish()
    }
}

impl Default for JobLimiter {
    fn default() -> Self {
        Self::from_config(&LimitsConfig::default())
    }
}

/// Held for the submit-and-poll lifetime of one job; releases its slot on drop.
#[derive(Debug)]
pub struct JobPermit {
    _permit: OwnedSemaphorePermit,
}
