//! Share grants: user-to-user and public link.

use std::fmt::Write as _;

use sqlx::SqlitePool;
use tracing::info;

use super::file::FileRepository;
use crate::db::UserRepository;
use crate::{DriveError, Result};

/// Number of random bytes in a share token (hex encoded, so twice as many chars).
pub const SHARE_TOKEN_BYTES: usize = 32;

const SHARE_COLUMNS: &str = "id, file_id, owner_id, shared_with_id, share_token, can_edit, created_at";

/// One access grant on a file.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SharedFile {
    pub id: i64,
    pub file_id: i64,
    pub owner_id: i64,
    /// Recipient, or None for "anyone with the link".
    pub shared_with_id: Option<i64>,
    pub share_token: String,
    pub can_edit: bool,
    pub created_at: String,
}

/// A grant made by the listing user, joined with file and recipient names.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct OutgoingShare {
    pub file_id: i64,
    pub title: String,
    pub file_type: Option<String>,
    /// Recipient username, None for public links.
    pub shared_with: Option<String>,
    pub can_edit: bool,
    pub share_token: String,
    pub created_at: String,
}

/// A grant addressed to the listing user, joined with file and owner names.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct IncomingShare {
    pub file_id: i64,
    pub title: String,
    pub file_type: Option<String>,
    pub owner: String,
    pub can_edit: bool,
    pub created_at: String,
}

/// Result of a share action.
#[derive(Debug, Clone)]
pub struct ShareOutcome {
    pub grant: SharedFile,
    /// True when an existing grant was updated instead of a new one inserted.
    pub updated: bool,
}

fn map_unique_violation(e: sqlx::Error) -> DriveError {
    let unique = e
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false);
    if unique {
        DriveError::Duplicate("File is already shared with this user".to_string())
    } else {
        e.into()
    }
}

/// Generate a fresh share token.
pub fn generate_share_token() -> String {
    let bytes: [u8; SHARE_TOKEN_BYTES] = rand::random();
    bytes
        .iter()
        .fold(String::with_capacity(SHARE_TOKEN_BYTES * 2), |mut s, b| {
            let _ = write!(s, "{b:02x}");
            s
        })
}

/// Repository for share grants.
pub struct ShareRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> ShareRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a grant with a new token.
    ///
    /// A second grant for the same file and recipient fails with
    /// [`DriveError::Duplicate`].
    pub async fn create(
        &self,
        file_id: i64,
        owner_id: i64,
        shared_with_id: Option<i64>,
        can_edit: bool,
    ) -> Result<SharedFile> {
        let token = generate_share_token();
        let result = sqlx::query(
            "INSERT INTO shared_files (file_id, owner_id, shared_with_id, share_token, can_edit)
             VALUES (?, ?, ?, ?, ?)",
        )
        .bind(file_id)
        .bind(owner_id)
        .bind(shared_with_id)
        .bind(&token)
        .bind(can_edit)
        .execute(self.pool)
        .await
        .map_err(map_unique_violation)?;

        self.get_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| DriveError::NotFound("Share".to_string()))
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<SharedFile>> {
        let share = sqlx::query_as::<_, SharedFile>(&format!(
            "SELECT {SHARE_COLUMNS} FROM shared_files WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;
        Ok(share)
    }

    /// Look up a grant by its token alone.
    pub async fn get_by_token(&self, token: &str) -> Result<Option<SharedFile>> {
        let share = sqlx::query_as::<_, SharedFile>(&format!(
            "SELECT {SHARE_COLUMNS} FROM shared_files WHERE share_token = ?"
        ))
        .bind(token)
        .fetch_optional(self.pool)
        .await?;
        Ok(share)
    }

    /// Grant on `file_id` carrying `token`.
    pub async fn get_by_file_and_token(&self, file_id: i64, token: &str) -> Result<Option<SharedFile>> {
        let share = sqlx::query_as::<_, SharedFile>(&format!(
            "SELECT {SHARE_COLUMNS} FROM shared_files WHERE file_id = ? AND share_token = ?"
        ))
        .bind(file_id)
        .bind(token)
        .fetch_optional(self.pool)
        .await?;
        Ok(share)
    }

    /// Grant on `file_id` addressed to `user_id`.
    pub async fn get_for_recipient(&self, file_id: i64, user_id: i64) -> Result<Option<SharedFile>> {
        let share = sqlx::query_as::<_, SharedFile>(&format!(
            "SELECT {SHARE_COLUMNS} FROM shared_files WHERE file_id = ? AND shared_with_id = ?"
        ))
        .bind(file_id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(share)
    }

    pub async fn set_can_edit(&self, id: i64, can_edit: bool) -> Result<Option<SharedFile>> {
        let result = sqlx::query("UPDATE shared_files SET can_edit = ? WHERE id = ?")
            .bind(can_edit)
            .bind(id)
            .execute(self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }

    /// Grants created by `owner_id`, oldest first.
    pub async fn list_shared_by(&self, owner_id: i64) -> Result<Vec<OutgoingShare>> {
        let shares = sqlx::query_as::<_, OutgoingShare>(
            "SELECT s.file_id, f.title, f.file_type, u.username AS shared_with,
                    s.can_edit, s.share_token, s.created_at
             FROM shared_files s
             JOIN files f ON f.id = s.file_id
             LEFT JOIN users u ON u.id = s.shared_with_id
             WHERE s.owner_id = ?
             ORDER BY s.id",
        )
        .bind(owner_id)
        .fetch_all(self.pool)
        .await?;
        Ok(shares)
    }

    /// Grants addressed to `user_id`, oldest first.
    pub async fn list_shared_with(&self, user_id: i64) -> Result<Vec<IncomingShare>> {
        let shares = sqlx::query_as::<_, IncomingShare>(
            "SELECT s.file_id, f.title, f.file_type, o.username AS owner,
                    s.can_edit, s.created_at
             FROM shared_files s
             JOIN files f ON f.id = s.file_id
             JOIN users o ON o.id = s.owner_id
             WHERE s.shared_with_id = ?
             ORDER BY s.id",
        )
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        Ok(shares)
    }
}

/// Share a file owned by `owner_id`.
///
/// With a recipient username, an existing grant to that user has its
/// `can_edit` updated and keeps its token; otherwise a grant is inserted.
/// Without a recipient a new public link is always issued.
pub async fn share_file(
    pool: &SqlitePool,
    file_id: i64,
    owner_id: i64,
    recipient: Option<&str>,
    can_edit: bool,
) -> Result<ShareOutcome> {
    let file = FileRepository::new(pool)
        .get_owned(file_id, owner_id)
        .await?
        .ok_or_else(|| DriveError::NotFound("File".to_string()))?;

    let shares = ShareRepository::new(pool);

    let recipient_id = match recipient.map(str::trim).filter(|name| !name.is_empty()) {
        Some(username) => {
            let user = UserRepository::new(pool)
                .get_by_username(username)
                .await?
                .ok_or_else(|| DriveError::NotFound("User".to_string()))?;
            if user.id == owner_id {
                return Err(DriveError::Validation(
                    "Cannot share a file with yourself".to_string(),
                ));
            }
            Some(user.id)
        }
        None => None,
    };

    // Insert first; the unique index keeps one grant per recipient.
    let inserted = shares.create(file.id, owner_id, recipient_id, can_edit).await;
    let grant = match (inserted, recipient_id) {
        (Ok(grant), _) => grant,
        (Err(DriveError::Duplicate(_)), Some(user_id)) => {
            let existing = shares
                .get_for_recipient(file.id, user_id)
                .await?
                .ok_or_else(|| DriveError::NotFound("Share".to_string()))?;
            let grant = shares
                .set_can_edit(existing.id, can_edit)
                .await?
                .ok_or_else(|| DriveError::NotFound("Share".to_string()))?;
            info!(file_id = file.id, recipient_id = user_id, can_edit, "Share updated");
            return Ok(ShareOutcome {
                grant,
                updated: true,
            });
        }
        (Err(e), _) => return Err(e),
    };
    info!(
        file_id = file.id,
        recipient_id = ?recipient_id,
        can_edit,
        "File shared"
    );
    Ok(ShareOutcome {
        grant,
        updated: false,
    })
}
