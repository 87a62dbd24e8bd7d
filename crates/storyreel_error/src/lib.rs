//! Error types for the Storyreel pipeline.
//!
//! This crate provides the foundation error types used throughout the Storyreel workspace.
//!
//! # Error Hierarchy
//!
//! All errors follow the `ErrorKind` + wrapper struct pattern:
//! - `*ErrorKind` enum defines specific error conditions
//! - `*Error` struct wraps the kind with source location tracking
//! - All errors use `#[track_caller]` for automatic location capture
//!
//! Errors fall into two tiers. [`GenerationError`] covers everything that can go
//! wrong with a single work item (bad payload, provider trouble, a failed or
//! timed-out job) and is absorbed by the batch orchestrator. [`PersistenceError`]
//! means the run could not record its results and is the only error that
//! reaches the caller of a batch run.
//!
//! # Examples
//!
//! ```
//! use storyreel_error::{StoryreelResult, HttpError};
//!
//! fn fetch_data() -> StoryreelResult<String> {
//!     Err(HttpError::new("Connection refused"))?
//! }
//!
//! match fetch_data() {
//!     Ok(data) => println!("Got: {}", data),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod builder;
mod config;
mod error;
mod generation;
mod http;
mod json;
mod persistence;
mod retry;

pub use builder::{BuilderError, BuilderErrorKind};
pub use config::ConfigError;
pub use error::{StoryreelError, StoryreelErrorKind, StoryreelResult};
pub use generation::{GenerationError, GenerationErrorKind, GenerationResult};
pub use http::HttpError;
pub use json::JsonError;
pub use persistence::{PersistenceError, PersistenceErrorKind, PersistenceResult};
pub use retry::RetryableError;
