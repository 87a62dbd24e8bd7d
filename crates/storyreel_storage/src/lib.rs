//! Manifest persistence and scene input loading for Storyreel.
//!
//! [`FileSystemManifestStore`] is the manifest writer: it replaces the
//! destination file atomically so a reader never sees a half-written
//! manifest. [`SceneCatalog`] reads the upstream scene image and story
//! description files and turns them into ordered work items.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod catalog;
mod filesystem;

pub use catalog::{SceneCatalog, SceneEntry};
pub use filesystem::FileSystemManifestStore;
