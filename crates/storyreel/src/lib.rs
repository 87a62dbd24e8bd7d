//! Storyreel - batch video generation from storyboard scenes
//!
//! Storyreel turns an ordered list of storyboard scenes into generated video
//! clips through an asynchronous job API. Each scene is submitted as a job,
//! polled until it finishes, and recorded in a JSON manifest. Successful
//! scenes carry continuity into the next one; a failed scene is logged and
//! the batch moves on.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use storyreel::{
//!     BatchOrchestrator, FileSystemManifestStore, JobClient, LumaProvider, PollPolicy,
//!     SceneCatalog, StoryreelConfig,
//! };
//! use std::path::Path;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = StoryreelConfig::load()?;
//!     let catalog = SceneCatalog::from_files(
//!         Path::new("scene_urls.json"),
//!         Path::new("story_elements.json"),
//!     )
//!     .await?;
//!
//!     let orchestrator = BatchOrchestrator::new(JobClient::new(LumaProvider::from_config(&config)?))
//!         .with_settings(config.generation.settings.clone())
//!         .with_poll_policy(PollPolicy::from_config(&config.polling));
//!
//!     let outcome = orchestrator
//!         .run_and_persist(
//!             catalog.work_items(),
//!             &FileSystemManifestStore::new(),
//!             Path::new("scene_videos.json"),
//!         )
//!         .await?;
//!     println!("{} scenes generated", outcome.succeeded());
//!     Ok(())
//! }
//! ```
//!
//! # Cargo Features
//!
//! - `observability` - OpenTelemetry span export to stdout
//!
//! # Architecture
//!
//! - `storyreel_error` - Error types
//! - `storyreel_core` - Data model (requests, jobs, records, manifests)
//! - `storyreel_interface` - Traits at the seams (provider, payload, store)
//! - `storyreel_rate_limit` - Configuration and job limits
//! - `storyreel_models` - Luma provider over HTTP
//! - `storyreel_storage` - Manifest files and scene catalogs
//! - `storyreel_pipeline` - Submission, polling and batch orchestration
//!
//! This crate (`storyreel`) re-exports everything for convenience.

pub use storyreel_core::*;
pub use storyreel_error::*;
pub use storyreel_interface::*;
pub use storyreel_models::*;
pub use storyreel_pipeline::*;
pub use storyreel_rate_limit::*;
pub use storyreel_storage::*;

mod logging;

pub use logging::{LoggingConfig, init_logging};

#[cfg(feature = "observability")]
pub mod observability;
