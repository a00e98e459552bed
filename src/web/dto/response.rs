//! Response DTOs for the Web API.

use serde::Serialize;

use crate::datetime::to_rfc3339;
use crate::db::User;
use crate::drive::{DriveFile, Folder, FolderEntry, IncomingShare, OutgoingShare};

/// Success envelope: `{"data": ...}`.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Public view of a user account.
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub avatar: String,
    pub created_at: String,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            avatar: user.avatar,
            created_at: to_rfc3339(&user.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: UserInfo,
    /// ID of the "My Drive" folder created with the account.
    pub root_folder_id: i64,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub token_type: &'static str,
    /// Seconds until the token expires.
    pub expires_in: u64,
    pub user: UserInfo,
}

/// Full file metadata.
#[derive(Debug, Serialize)]
pub struct FileResponse {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
    pub file_type: Option<String>,
    pub file_size: i64,
    pub is_starred: bool,
    pub folder_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<DriveFile> for FileResponse {
    fn from(file: DriveFile) -> Self {
        Self {
            id: file.id,
            title: file.title,
            content: file.content,
            file_type: file.file_type,
            file_size: file.file_size,
            is_starred: file.is_starred,
            folder_id: file.parent_folder_id,
            created_at: to_rfc3339(&file.created_at),
            updated_at: to_rfc3339(&file.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StarResponse {
    pub id: i64,
    pub is_starred: bool,
}

#[derive(Debug, Serialize)]
pub struct FolderResponse {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Folder> for FolderResponse {
    fn from(folder: Folder) -> Self {
        Self {
            id: folder.id,
            name: folder.name,
            parent_id: folder.parent_id,
            created_at: to_rfc3339(&folder.created_at),
            updated_at: to_rfc3339(&folder.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FolderSummary {
    pub id: i64,
    pub name: String,
    pub parent_id: Option<i64>,
}

/// File as shown inside a folder listing (no content).
#[derive(Debug, Serialize)]
pub struct FileEntry {
    pub id: i64,
    pub title: String,
    pub file_type: Option<String>,
    pub file_size: i64,
    pub is_starred: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// One child in a folder listing, tagged `"type": "folder" | "file"`.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ContentEntry {
    Folder(FolderResponse),
    File(FileEntry),
}

impl From<FolderEntry> for ContentEntry {
    fn from(entry: FolderEntry) -> Self {
        match entry {
            FolderEntry::Folder(folder) => ContentEntry::Folder(folder.into()),
            FolderEntry::File(file) => ContentEntry::File(FileEntry {
                id: file.id,
                title: file.title,
                file_type: file.file_type,
                file_size: file.file_size,
                is_starred: file.is_starred,
                created_at: to_rfc3339(&file.created_at),
                updated_at: to_rfc3339(&file.updated_at),
            }),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FolderContentsResponse {
    pub folder: FolderSummary,
    pub contents: Vec<ContentEntry>,
}

#[derive(Debug, Serialize)]
pub struct ShareResponse {
    pub share_token: String,
    pub share_url: String,
    pub shared_with: Option<String>,
    pub can_edit: bool,
    /// True when an existing grant was updated.
    pub updated: bool,
}

#[derive(Debug, Serialize)]
pub struct SharedByMeEntry {
    /// File ID.
    pub id: i64,
    pub title: String,
    pub file_type: Option<String>,
    pub shared_with: Option<String>,
    pub can_edit: bool,
    pub share_url: String,
    pub shared_at: String,
}

impl SharedByMeEntry {
    pub fn new(share: OutgoingShare, share_url: String) -> Self {
        Self {
            id: share.file_id,
            title: share.title,
            file_type: share.file_type,
            shared_with: share.shared_with,
            can_edit: share.can_edit,
            share_url,
            shared_at: to_rfc3339(&share.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SharedWithMeEntry {
    /// File ID.
    pub id: i64,
    pub title: String,
    pub file_type: Option<String>,
    pub owner: String,
    pub can_edit: bool,
    pub shared_at: String,
}

impl From<IncomingShare> for SharedWithMeEntry {
    fn from(share: IncomingShare) -> Self {
        Self {
            id: share.file_id,
            title: share.title,
            file_type: share.file_type,
            owner: share.owner,
            can_edit: share.can_edit,
            shared_at: to_rfc3339(&share.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SharedListResponse {
    pub shared_by_me: Vec<SharedByMeEntry>,
    pub shared_with_me: Vec<SharedWithMeEntry>,
}

/// File reached through a public share token.
#[derive(Debug, Serialize)]
pub struct SharedFileResponse {
    pub id: i64,
    pub title: String,
    pub content: Option<String>,
    pub file_type: Option<String>,
    pub file_size: i64,
    /// Owner's username.
    pub owner: String,
    pub can_edit: bool,
}
