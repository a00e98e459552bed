//! User model for SkyDrive.

use sqlx::FromRow;

/// Avatar assigned to new accounts.
pub const DEFAULT_AVATAR: &str = "default-avatar.png";

/// A registered user.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    /// Unique user ID.
    pub id: i64,
    /// Login name (unique, case-insensitive).
    pub username: String,
    /// Email address (unique, case-insensitive).
    pub email: String,
    /// Argon2 password hash.
    pub password: String,
    /// Avatar path.
    pub avatar: String,
    /// Account creation time (SQLite UTC format).
    pub created_at: String,
}

/// Data for inserting a new user.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    /// Already-hashed password.
    pub password: String,
}

impl NewUser {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password_hash.into(),
        }
    }
}
