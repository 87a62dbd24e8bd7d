//! Trait definitions for the Storyreel video generation pipeline.
//!
//! These are the seams between the orchestration core and everything it
//! treats as an external collaborator: the generation provider, the prompt
//! strategy, the transition scripter, the poll schedule and the manifest store.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod traits;

pub use traits::{GenerationProvider, ManifestStore, PayloadStrategy, PollSchedule, TransitionScripter};
