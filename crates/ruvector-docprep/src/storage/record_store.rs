//! Filesystem store for rendered document records

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::DocumentRecord;

/// Writes records into one category directory as `<identifier>.<ext>`
#[derive(Debug, Clone)]
pub struct RecordStore {
    /// Directory holding the record files
    dir: PathBuf,
    /// Record file extension, without the dot
    extension: String,
}

impl RecordStore {
    /// Create a store rooted at `dir`
    ///
    /// The directory is created on the first write.
    pub fn new(dir: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.into(),
        }
    }

    /// Directory holding the record files
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the record file for `identifier`
    pub fn record_path(&self, identifier: &str) -> PathBuf {
        self.dir.join(format!("{}.{}", identifier, self.extension))
    }

    /// Create the directory if needed
    pub async fn ensure_dir(&self) -> Result<()> {
        if !tokio::fs::try_exists(&self.dir).await.unwrap_or(false) {
            tokio::fs::create_dir_all(&self.dir)
                .await
                .map_err(|e| Error::write(&self.dir, e))?;
            tracing::info!("Created output directory: {}", self.dir.display());
        }
        Ok(())
    }

    /// Render and persist `record`, replacing any earlier version
    pub async fn write(&self, record: &DocumentRecord) -> Result<PathBuf> {
        self.ensure_dir().await?;
        let path = self.record_path(&record.identifier);
        write_atomic(&path, &record.render()).await?;
        Ok(path)
    }
}

/// Write `contents` to `path` through a sibling temporary file
///
/// Readers see either the previous file or the complete new one.
pub async fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::internal(format!("not a file path: {}", path.display())))?;
    let tmp = path.with_file_name(format!(".{}.tmp", file_name));

    if let Err(e) = tokio::fs::write(&tmp, contents).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(Error::write(path, e));
    }

    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(Error::write(path, e));
    }

    Ok(())
}
