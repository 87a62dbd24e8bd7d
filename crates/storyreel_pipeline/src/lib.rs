//! Job submission, polling and batch orchestration for Storyreel.
//!
//! The pieces, leaves first:
//!
//! - [`JobClient`] validates a request, submits it through a
//!   [`GenerationProvider`](storyreel_interface::GenerationProvider) and reads
//!   job status back.
//! - [`await_terminal`] polls one job until it completes, fails, or runs out
//!   of attempts under a [`PollPolicy`].
//! - [`BatchOrchestrator`] drives an ordered list of work items through both,
//!   threading continuity between successes and isolating failures.
//! - [`InterpolationPlanner`] turns a finished scene manifest into transition
//!   work items.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod client;
mod interpolation;
mod orchestrator;
mod poll;
mod strategy;

pub use client::JobClient;
pub use interpolation::{InterpolationPlanner, TemplateTransitionScripter};
pub use orchestrator::{BatchOrchestrator, BatchOutcome, ItemFailure, PreparedItem};
pub use poll::{PollPolicy, await_terminal};
pub use storyreel_rate_limit::Backoff;
pub use strategy::{CinematicPayload, PassthroughPayload};
