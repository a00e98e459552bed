//! Blob storage for uploaded files.
//!
//! Blobs get random names and are sharded by the first two characters:
//! ```text
//! {base_path}/
//! ├── 3f/
//! │   └── 3f9a0c...e1.pdf
//! └── a7/
//!     └── a7b21d...04
//! ```

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use uuid::Uuid;

use crate::{DriveError, Result};

/// What was written for one upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    /// Name inside storage.
    pub stored_name: String,
    /// Lower-cased extension of the original filename, if any.
    pub file_type: Option<String>,
    /// Bytes written.
    pub size: u64,
}

/// Filesystem-backed blob storage.
#[derive(Debug, Clone)]
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    /// Open storage rooted at `base_path`, creating the directory if needed.
    pub fn new(base_path: impl Into<PathBuf>) -> Result<Self> {
        let base_path = base_path.into();
        std::fs::create_dir_all(&base_path)?;
        Ok(Self { base_path })
    }

    /// Write `content` under a fresh random name derived from `original_name`.
    pub async fn save(&self, content: &[u8], original_name: &str) -> Result<StoredBlob> {
        let file_type = extract_extension(original_name);
        let stored_name = generate_stored_name(file_type.as_deref());
        let path = self.blob_path(&stored_name)?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        write_blob(&path, content).await?;

        Ok(StoredBlob {
            stored_name,
            file_type,
            size: content.len() as u64,
        })
    }

    /// Read a blob. A missing blob is reported as not found.
    pub async fn load(&self, stored_name: &str) -> Result<Vec<u8>> {
        let path = self.blob_path(stored_name)?;
        match fs::read(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(DriveError::NotFound("Stored file".to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Remove a blob. Returns false if it was already gone.
    pub async fn delete(&self, stored_name: &str) -> Result<bool> {
        let path = self.blob_path(stored_name)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Full path for a stored name: `{base}/{shard}/{stored_name}`.
    fn blob_path(&self, stored_name: &str) -> Result<PathBuf> {
        if stored_name.is_empty()
            || stored_name.contains(['/', '\\'])
            || stored_name.starts_with('.')
        {
            return Err(DriveError::Storage(format!(
                "invalid stored name: {stored_name}"
            )));
        }
        let shard = stored_name.get(..2).unwrap_or(stored_name);
        Ok(self.base_path.join(shard).join(stored_name))
    }
}

/// Write a blob, removing whatever was left behind if the write fails.
async fn write_blob(path: &Path, content: &[u8]) -> Result<()> {
    if let Err(e) = fs::write(path, content).await {
        match fs::remove_file(path).await {
            Ok(()) => {}
            Err(cleanup) if cleanup.kind() == io::ErrorKind::NotFound => {}
            Err(cleanup) => {
                tracing::warn!("Failed to remove partial blob {}: {}", path.display(), cleanup);
            }
        }
        return Err(e.into());
    }
    Ok(())
}

/// Lower-cased extension after the last dot, None when absent or empty.
fn extract_extension(filename: &str) -> Option<String> {
    let (_, ext) = filename.rsplit_once('.')?;
    if ext.is_empty() || ext.contains(['/', '\\']) {
        return None;
    }
    Some(ext.to_lowercase())
}

fn generate_stored_name(ext: Option<&str>) -> String {
    let id = Uuid::new_v4().simple();
    match ext {
        Some(ext) => format!("{id}.{ext}"),
        None => id.to_string(),
    }
}
