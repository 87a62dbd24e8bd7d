//! Core data types for the Storyreel video generation pipeline.
//!
//! This crate holds the plain data that flows through a batch run: work items
//! going in, provider job handles in flight, result records and the manifest
//! coming out, and the continuity context carried between consecutive items.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod continuity;
mod job;
mod manifest;
mod record;
mod request;
mod response;
mod sequence;
mod settings;
mod source;
mod work;

pub use continuity::{ContinuityContext, ContinuityLink};
pub use job::{Job, JobState};
pub use manifest::{Manifest, ManifestKind, ManifestMetadata};
pub use record::ResultRecord;
pub use request::{GenerationRequest, GenerationRequestBuilder};
pub use response::error_message;
pub use sequence::SequenceKey;
pub use settings::GenerationSettings;
pub use source::{Keyframes, SourceRef};
pub use work::WorkItem;
