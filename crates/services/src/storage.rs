use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Invalid project id: {0:?}")]
    InvalidProjectId(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Local media directory, one subdirectory per project.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

/// A file being written under a private `.part` name. It only appears
/// under its final name after [`PartialFile::commit`].
pub struct PartialFile {
    file: File,
    partial: PathBuf,
    path: PathBuf,
    written: u64,
}

impl PartialFile {
    pub async fn write(&mut self, chunk: &[u8]) -> Result<(), StorageError> {
        self.file.write_all(chunk).await?;
        self.written += chunk.len() as u64;
        Ok(())
    }

    pub fn written(&self) -> u64 {
        self.written
    }

    pub async fn commit(mut self) -> Result<PathBuf, StorageError> {
        self.file.flush().await?;
        drop(self.file);
        tokio::fs::rename(&self.partial, &self.path).await?;
        debug!(path = %self.path.display(), size = self.written, "Media file stored");
        Ok(self.path)
    }

    /// Removes the part file. Errors are ignored, nothing points at it yet.
    pub async fn discard(self) {
        drop(self.file);
        let _ = tokio::fs::remove_file(&self.partial).await;
    }
}

impl MediaStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Opens `{root}/{project_id}/{filename}` for writing. Each call gets
    /// its own part file, so concurrent writers never share one.
    pub async fn create(&self, project_id: &str, filename: &str) -> Result<PartialFile, StorageError> {
        let dir = self.project_dir(project_id)?;
        tokio::fs::create_dir_all(&dir).await?;

        let path = dir.join(filename);
        let partial = dir.join(format!("{filename}.{}.part", Uuid::new_v4().simple()));
        let file = File::create(&partial).await?;
        Ok(PartialFile {
            file,
            partial,
            path,
            written: 0,
        })
    }

    /// Writes `bytes` to `{root}/{project_id}/{filename}` in one go.
    pub async fn save(
        &self,
        project_id: &str,
        filename: &str,
        bytes: &[u8],
    ) -> Result<PathBuf, StorageError> {
        let mut file = self.create(project_id, filename).await?;
        if let Err(error) = file.write(bytes).await {
            file.discard().await;
            return Err(error);
        }
        file.commit().await
    }

    fn project_dir(&self, project_id: &str) -> Result<PathBuf, StorageError> {
        let valid = !project_id.is_empty()
            && project_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(StorageError::InvalidProjectId(project_id.to_string()));
        }
        Ok(self.root.join(project_id))
    }
}
