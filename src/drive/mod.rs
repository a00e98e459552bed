//! Drive module for SkyDrive.
//!
//! Folders, file metadata, blob storage and sharing. Every lookup that
//! depends on who is asking reports foreign resources as not found.

mod access;
mod contents;
mod file;
mod folder;
mod share;
mod storage;

pub use access::{resolve_access, Access, AccessVia};
pub use contents::{folder_contents, FolderContents, FolderEntry};
pub use file::{DriveFile, FileRepository, FileUpdate, NewFile};
pub use folder::{Folder, FolderRepository, NewFolder, DEFAULT_FOLDER_NAME, ROOT_FOLDER_NAME};
pub use share::{
    generate_share_token, share_file, IncomingShare, OutgoingShare, ShareOutcome,
    ShareRepository, SharedFile, SHARE_TOKEN_BYTES,
};
pub use storage::{FileStorage, StoredBlob};
