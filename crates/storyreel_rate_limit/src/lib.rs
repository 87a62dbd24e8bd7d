//! Configuration and pacing for Storyreel batch runs.
//!
//! [`StoryreelConfig`] is layered from bundled defaults and optional user
//! files. [`JobLimiter`] bounds how many provider jobs are in flight at once
//! and, optionally, how many HTTP requests go out per minute.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod limiter;

pub use config::{
    Backoff, GenerationConfig, LimitsConfig, PollingConfig, ProviderSettings, RetryConfig,
    StoryreelConfig,
};
pub use limiter::{JobLimiter, JobPermit};
