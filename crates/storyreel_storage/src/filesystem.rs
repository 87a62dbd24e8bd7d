//! Filesystem-backed manifest store.

use std::path::{Path, PathBuf};
use storyreel_core::Manifest;
use storyreel_error::{PersistenceError, PersistenceErrorKind, PersistenceResult};
use storyreel_interface::ManifestStore;

/// Writes manifests as pretty-printed JSON files.
///
/// # Features
///
/// - **Atomic writes**: temp file in the destination directory, then rename
/// - **Parent creation**: missing directories are created on write
/// - **Wholesale replacement**: a re-run overwrites, never merges
#[derive(Debug, Clone, Copy, Default)]
pub struct FileSystemManifestStore;

impl FileSystemManifestStore {
    /// Create a store.
    pub fn new() -> Self {
        Self
    }

    fn temp_path(destination: &Path) -> PathBuf {
        let mut name = destination
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        destination.with_file_name(name)
    }
}

#[async_trait::async_trait]
impl ManifestStore for FileSystemManifestStore {
    #[tracing::instrument(skip(self, manifest), fields(path = %destination.display(), records = manifest.records.len()))]
    async fn write(&self, manifest: &Manifest, destination: &Path) -> PersistenceResult<()> {
        let json = serde_json::to_vec_pretty(manifest).map_err(|e| {
            PersistenceError::new(PersistenceErrorKind::Serialization(e.to_string()))
        })?;

        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await.map_err(|e| {
                PersistenceError::new(PersistenceErrorKind::DirectoryCreation(format!(
                    "{}: {}",
                    parent.display(),
                    e
                )))
            })?;
        }

        let temp_path = Self::temp_path(destination);
        tokio::fs::write(&temp_path, &json).await.map_err(|e| {
            PersistenceError::new(PersistenceErrorKind::FileWrite(format!(
                "{}: {}",
                temp_path.display(),
                e
            )))
        })?;

        if let Err(e) = tokio::fs::rename(&temp_path, destination).await {
            let _ = tokio::fs::remove_file(&temp_path).await;
            return Err(PersistenceError::new(PersistenceErrorKind::FileWrite(
                format!(
                    "rename {} to {}: {}",
                    temp_path.display(),
                    destination.display(),
                    e
                ),
            )));
        }

        tracing::info!(
            path = %destination.display(),
            size = json.len(),
            "Wrote manifest"
        );
        Ok(())
    }

    #[tracing::instrument(skip(self), fields(path = %source.display()))]
    async fn load(&self, source: &Path) -> PersistenceResult<Manifest> {
        let data = tokio::fs::read(source).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                PersistenceError::new(PersistenceErrorKind::NotFound(
                    source.display().to_string(),
                ))
            } else {
                PersistenceError::new(PersistenceErrorKind::FileRead(format!(
                    "{}: {}",
                    source.display(),
                    e
                )))
            }
        })?;

        let manifest: Manifest = serde_json::from_slice(&data).map_err(|e| {
            PersistenceError::new(PersistenceErrorKind::Deserialization(format!(
                "{}: {}",
                source.display(),
                e
            )))
        })?;

        tracing::debug!(records = manifest.records.len(), "Loaded manifest");
        Ok(manifest)
    }
}
