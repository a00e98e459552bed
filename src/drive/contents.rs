//! One-level listing of a folder.

use sqlx::SqlitePool;

use super::file::{DriveFile, FileRepository};
use super::folder::{Folder, FolderRepository};
use crate::{DriveError, Result};

/// A child of a folder.
#[derive(Debug, Clone)]
pub enum FolderEntry {
    Folder(Folder),
    File(DriveFile),
}

impl FolderEntry {
    /// Tag used in API output.
    pub fn kind(&self) -> &'static str {
        match self {
            FolderEntry::Folder(_) => "folder",
            FolderEntry::File(_) => "file",
        }
    }
}

/// A folder together with its direct children.
#[derive(Debug, Clone)]
pub struct FolderContents {
    pub folder: Folder,
    /// Subfolders first, then files; each group ordered by id.
    pub entries: Vec<FolderEntry>,
}

/// List the direct children of a folder owned by `user_id`.
pub async fn folder_contents(
    pool: &SqlitePool,
    folder_id: i64,
    user_id: i64,
) -> Result<FolderContents> {
    let folders = FolderRepository::new(pool);
    let folder = folders
        .get_owned(folder_id, user_id)
        .await?
        .ok_or_else(|| DriveError::NotFound("Folder".to_string()))?;

    let subfolders = folders.list_by_parent(user_id, folder.id).await?;
    let files = FileRepository::new(pool).list_by_folder(folder.id).await?;

    let entries = subfolders
        .into_iter()
        .map(FolderEntry::Folder)
        .chain(files.into_iter().map(FolderEntry::File))
        .collect();

    Ok(FolderContents { folder, entries })
}
