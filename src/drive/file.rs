//! File metadata model and repository.
//!
//! Rows here describe uploaded blobs; the bytes themselves are held by
//! [`super::FileStorage`] under `stored_name`.

use sqlx::{QueryBuilder, SqlitePool};

use crate::{DriveError, Result};

const FILE_COLUMNS: &str = "id, title, content, stored_name, file_type, file_size, user_id, \
                            parent_folder_id, is_starred, created_at, updated_at";

/// Metadata for one uploaded file.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DriveFile {
    pub id: i64,
    /// Display title; also the suggested download filename.
    pub title: String,
    /// Optional text content attached to the file.
    pub content: Option<String>,
    /// Blob name inside storage.
    pub stored_name: String,
    /// Lower-cased extension, None when the upload had none.
    pub file_type: Option<String>,
    /// Size in bytes.
    pub file_size: i64,
    /// Owning user.
    pub user_id: i64,
    pub parent_folder_id: Option<i64>,
    pub is_starred: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for inserting file metadata.
#[derive(Debug, Clone)]
pub struct NewFile {
    pub title: String,
    pub content: Option<String>,
    pub stored_name: String,
    pub file_type: Option<String>,
    pub file_size: i64,
    pub user_id: i64,
    pub parent_folder_id: Option<i64>,
}

impl NewFile {
    pub fn new(
        user_id: i64,
        title: impl Into<String>,
        stored_name: impl Into<String>,
        file_size: i64,
    ) -> Self {
        Self {
            title: title.into(),
            content: None,
            stored_name: stored_name.into(),
            file_type: None,
            file_size,
            user_id,
            parent_folder_id: None,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn with_file_type(mut self, file_type: impl Into<String>) -> Self {
        self.file_type = Some(file_type.into());
        self
    }

    pub fn with_folder(mut self, folder_id: i64) -> Self {
        self.parent_folder_id = Some(folder_id);
        self
    }
}

/// Editable fields. Unset fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct FileUpdate {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl FileUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

/// Repository for file metadata.
pub struct FileRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FileRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert file metadata.
    ///
    /// A target folder must belong to the uploader; otherwise it is reported
    /// as not found.
    pub async fn create(&self, new_file: &NewFile) -> Result<DriveFile> {
        if let Some(folder_id) = new_file.parent_folder_id {
            let owned: bool = sqlx::query_scalar(
                "SELECT EXISTS(SELECT 1 FROM folders WHERE id = ? AND user_id = ?)",
            )
            .bind(folder_id)
            .bind(new_file.user_id)
            .fetch_one(self.pool)
            .await?;
            if !owned {
                return Err(DriveError::NotFound("Folder".to_string()));
            }
        }

        let result = sqlx::query(
            "INSERT INTO files (title, content, stored_name, file_type, file_size, user_id, parent_folder_id)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&new_file.title)
        .bind(&new_file.content)
        .bind(&new_file.stored_name)
        .bind(&new_file.file_type)
        .bind(new_file.file_size)
        .bind(new_file.user_id)
        .bind(new_file.parent_folder_id)
        .execute(self.pool)
        .await?;

        self.get_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| DriveError::NotFound("File".to_string()))
    }

    /// Get a file by ID regardless of owner.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<DriveFile>> {
        let file =
            sqlx::query_as::<_, DriveFile>(&format!("SELECT {FILE_COLUMNS} FROM files WHERE id = ?"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;
        Ok(file)
    }

    /// Get a file only if `user_id` owns it.
    pub async fn get_owned(&self, id: i64, user_id: i64) -> Result<Option<DriveFile>> {
        let file = sqlx::query_as::<_, DriveFile>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE id = ? AND user_id = ?"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(file)
    }

    /// List a user's files, optionally restricted to one folder.
    pub async fn list_by_owner(
        &self,
        user_id: i64,
        folder_id: Option<i64>,
    ) -> Result<Vec<DriveFile>> {
        let mut query: QueryBuilder<sqlx::Sqlite> =
            QueryBuilder::new(format!("SELECT {FILE_COLUMNS} FROM files WHERE user_id = "));
        query.push_bind(user_id);
        if let Some(folder_id) = folder_id {
            query.push(" AND parent_folder_id = ");
            query.push_bind(folder_id);
        }
        query.push(" ORDER BY id");

        let files = query
            .build_query_as::<DriveFile>()
            .fetch_all(self.pool)
            .await?;
        Ok(files)
    }

    /// List files directly inside a folder.
    pub async fn list_by_folder(&self, folder_id: i64) -> Result<Vec<DriveFile>> {
        let files = sqlx::query_as::<_, DriveFile>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE parent_folder_id = ? ORDER BY id"
        ))
        .bind(folder_id)
        .fetch_all(self.pool)
        .await?;
        Ok(files)
    }

    /// List a user's starred files.
    pub async fn list_starred(&self, user_id: i64) -> Result<Vec<DriveFile>> {
        let files = sqlx::query_as::<_, DriveFile>(&format!(
            "SELECT {FILE_COLUMNS} FROM files WHERE user_id = ? AND is_starred = 1 ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        Ok(files)
    }

    /// Flip the starred flag on a file owned by `user_id`.
    ///
    /// Returns the new state, or None if the caller does not own the file.
    pub async fn toggle_star(&self, id: i64, user_id: i64) -> Result<Option<bool>> {
        let starred: Option<bool> = sqlx::query_scalar(
            "UPDATE files SET is_starred = NOT is_starred WHERE id = ? AND user_id = ?
             RETURNING is_starred",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(starred)
    }

    /// Apply an update and bump `updated_at`.
    ///
    /// Authorization is the caller's job; see [`super::resolve_access`].
    pub async fn update(&self, id: i64, update: &FileUpdate) -> Result<Option<DriveFile>> {
        let mut query: QueryBuilder<sqlx::Sqlite> = QueryBuilder::new("UPDATE files SET ");
        let mut separated = query.separated(", ");

        if let Some(ref title) = update.title {
            separated.push("title = ");
            separated.push_bind_unseparated(title);
        }
        if let Some(ref content) = update.content {
            separated.push("content = ");
            separated.push_bind_unseparated(content);
        }
        separated.push("updated_at = datetime('now')");

        query.push(" WHERE id = ");
        query.push_bind(id);

        let result = query.build().execute(self.pool).await?;
        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }
}
