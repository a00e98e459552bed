//! Folder model and repository.

use sqlx::SqlitePool;

use crate::{DriveError, Result};

/// Name of the root folder created for every new account.
pub const ROOT_FOLDER_NAME: &str = "My Drive";

/// Name used when a folder is created without one.
pub const DEFAULT_FOLDER_NAME: &str = "New Folder";

const FOLDER_COLUMNS: &str = "id, name, user_id, parent_id, created_at, updated_at";

/// A folder in a user's drive.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Folder {
    pub id: i64,
    pub name: String,
    /// Owning user.
    pub user_id: i64,
    /// Parent folder (None for top-level folders such as "My Drive").
    pub parent_id: Option<i64>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a folder.
#[derive(Debug, Clone)]
pub struct NewFolder {
    pub name: String,
    pub user_id: i64,
    pub parent_id: Option<i64>,
}

impl NewFolder {
    pub fn new(user_id: i64, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            user_id,
            parent_id: None,
        }
    }

    /// Set the parent folder.
    pub fn with_parent(mut self, parent_id: i64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

/// Repository for folder operations.
pub struct FolderRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> FolderRepository<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a folder.
    ///
    /// When a parent is given it must belong to the same user; otherwise the
    /// parent is reported as not found.
    pub async fn create(&self, new_folder: &NewFolder) -> Result<Folder> {
        if let Some(parent_id) = new_folder.parent_id {
            self.get_owned(parent_id, new_folder.user_id)
                .await?
                .ok_or_else(|| DriveError::NotFound("Parent folder".to_string()))?;
        }

        let result = sqlx::query("INSERT INTO folders (name, user_id, parent_id) VALUES (?, ?, ?)")
            .bind(&new_folder.name)
            .bind(new_folder.user_id)
            .bind(new_folder.parent_id)
            .execute(self.pool)
            .await?;

        self.get_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| DriveError::NotFound("Folder".to_string()))
    }

    /// Get a folder by ID regardless of owner.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Folder>> {
        let folder =
            sqlx::query_as::<_, Folder>(&format!("SELECT {FOLDER_COLUMNS} FROM folders WHERE id = ?"))
                .bind(id)
                .fetch_optional(self.pool)
                .await?;
        Ok(folder)
    }

    /// Get a folder only if `user_id` owns it.
    pub async fn get_owned(&self, id: i64, user_id: i64) -> Result<Option<Folder>> {
        let folder = sqlx::query_as::<_, Folder>(&format!(
            "SELECT {FOLDER_COLUMNS} FROM folders WHERE id = ? AND user_id = ?"
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?;
        Ok(folder)
    }

    /// List every folder owned by a user.
    pub async fn list_by_owner(&self, user_id: i64) -> Result<Vec<Folder>> {
        let folders = sqlx::query_as::<_, Folder>(&format!(
            "SELECT {FOLDER_COLUMNS} FROM folders WHERE user_id = ? ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(self.pool)
        .await?;
        Ok(folders)
    }

    /// List a user's folders directly under `parent_id`.
    pub async fn list_by_parent(&self, user_id: i64, parent_id: i64) -> Result<Vec<Folder>> {
        let folders = sqlx::query_as::<_, Folder>(&format!(
            "SELECT {FOLDER_COLUMNS} FROM folders WHERE user_id = ? AND parent_id = ? ORDER BY id"
        ))
        .bind(user_id)
        .bind(parent_id)
        .fetch_all(self.pool)
        .await?;
        Ok(folders)
    }

    /// Rename a folder owned by `user_id`.
    ///
    /// Returns None when the folder does not exist or belongs to someone else.
    pub async fn rename(&self, id: i64, user_id: i64, name: &str) -> Result<Option<Folder>> {
        let result = sqlx::query(
            "UPDATE folders SET name = ?, updated_at = datetime('now') WHERE id = ? AND user_id = ?",
        )
        .bind(name)
        .bind(id)
        .bind(user_id)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(None);
        }
        self.get_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{NewUser, UserRepository};
    use crate::Database;

    async fn setup() -> (Database, i64, i64) {
        let db = Database::open_in_memory().await.unwrap();
        let users = UserRepository::new(db.pool());
        let alice = users
            .create(&NewUser::new("alice", "alice@example.com", "hash"))
            .await
            .unwrap();
        let bob = users
            .create(&NewUser::new("bob", "bob@example.com", "hash"))
            .await
            .unwrap();
        (db, alice.id, bob.id)
    }

    #[tokio::test]
    async fn test_create_root_and_child() {
        let (db, alice, _) = setup().await;
        let repo = FolderRepository::new(db.pool());

        let root = repo.create(&NewFolder::new(alice, "Projects")).await.unwrap();
        assert_eq!(root.name, "Projects");
        assert_eq!(root.user_id, alice);
        assert!(root.parent_id.is_none());

        let child = repo
            .create(&NewFolder::new(alice, "2024").with_parent(root.id))
            .await
            .unwrap();
        assert_eq!(child.parent_id, Some(root.id));
    }

    #[tokio::test]
    async fn test_create_under_foreign_parent_is_not_found() {
        let (db, alice, bob) = setup().await;
        let repo = FolderRepository::new(db.pool());
        let alices = repo.create(&NewFolder::new(alice, "Private")).await.unwrap();

        let result = repo
            .create(&NewFolder::new(bob, "Sneaky").with_parent(alices.id))
            .await;
        assert!(matches!(result, Err(DriveError::NotFound(_))));

        let result = repo
            .create(&NewFolder::new(alice, "Orphan").with_parent(9999))
            .await;
        assert!(matches!(result, Err(DriveError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_get_owned() {
        let (db, alice, bob) = setup().await;
        let repo = FolderRepository::new(db.pool());
        let folder = repo.create(&NewFolder::new(alice, "Docs")).await.unwrap();

        assert!(repo.get_owned(folder.id, alice).await.unwrap().is_some());
        assert!(repo.get_owned(folder.id, bob).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_by_owner_and_parent() {
        let (db, alice, bob) = setup().await;
        let repo = FolderRepository::new(db.pool());
        let root = repo.create(&NewFolder::new(alice, "Root")).await.unwrap();
        repo.create(&NewFolder::new(alice, "A").with_parent(root.id))
            .await
            .unwrap();
        repo.create(&NewFolder::new(alice, "B").with_parent(root.id))
            .await
            .unwrap();
        repo.create(&NewFolder::new(bob, "Bob's")).await.unwrap();

        assert_eq!(repo.list_by_owner(alice).await.unwrap().len(), 3);
        assert_eq!(repo.list_by_owner(bob).await.unwrap().len(), 1);

        let children = repo.list_by_parent(alice, root.id).await.unwrap();
        let names: Vec<_> = children.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["A", "B"]);

        assert!(repo.list_by_parent(bob, root.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_rename() {
        let (db, alice, bob) = setup().await;
        let repo = FolderRepository::new(db.pool());
        let folder = repo.create(&NewFolder::new(alice, "Old")).await.unwrap();

        let renamed = repo.rename(folder.id, alice, "New").await.unwrap().unwrap();
        assert_eq!(renamed.name, "New");

        assert!(repo.rename(folder.id, bob, "Hijack").await.unwrap().is_none());
        let unchanged = repo.get_by_id(folder.id).await.unwrap().unwrap();
        assert_eq!(unchanged.name, "New");
    }
}
