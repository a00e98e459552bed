//! User repository for SkyDrive.

use sqlx::SqlitePool;

use super::user::{NewUser, User};
use crate::{DriveError, Result};

const USER_COLUMNS: &str = "id, username, email, password, avatar, created_at";

/// Repository for user lookups and inserts.
pub struct UserRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepository<'a> {
    /// Create a new UserRepository with the given pool reference.
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a user and return the stored row.
    ///
    /// Account registration goes through [`crate::auth::register`], which
    /// also creates the root folder; this is the bare insert.
    pub async fn create(&self, new_user: &NewUser) -> Result<User> {
        let result = sqlx::query("INSERT INTO users (username, email, password) VALUES (?, ?, ?)")
            .bind(&new_user.username)
            .bind(&new_user.email)
            .bind(&new_user.password)
            .execute(self.pool)
            .await?;

        self.get_by_id(result.last_insert_rowid())
            .await?
            .ok_or_else(|| DriveError::NotFound("User".to_string()))
    }

    /// Get a user by ID.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?;
        Ok(user)
    }

    /// Get a user by username (case-insensitive).
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE username = ? COLLATE NOCASE"
        ))
        .bind(username)
        .fetch_optional(self.pool)
        .await?;
        Ok(user)
    }

    /// Check whether a username is taken (case-insensitive).
    pub async fn username_exists(&self, username: &str) -> Result<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM users WHERE username = ? COLLATE NOCASE)",
        )
        .bind(username)
        .fetch_one(self.pool)
        .await?;
        Ok(exists)
    }

    /// Check whether an email is taken (case-insensitive).
    pub async fn email_exists(&self, email: &str) -> Result<bool> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM users WHERE email = ? COLLATE NOCASE)")
                .bind(email)
                .fetch_one(self.pool)
                .await?;
        Ok(exists)
    }
}
