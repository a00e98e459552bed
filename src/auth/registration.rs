//! Account registration and credential checks.

use tracing::{info, warn};

use crate::auth::{hash_password, validate_password, verify_password};
use crate::db::{Database, User, UserRepository};
use crate::drive::{Folder, FolderRepository, ROOT_FOLDER_NAME};
use crate::{DriveError, Result};

/// Registration request data.
#[derive(Debug, Clone)]
pub struct RegistrationRequest {
    pub username: String,
    pub email: String,
    /// Plain-text password; hashed before storage.
    pub password: String,
}

impl RegistrationRequest {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

/// A freshly registered account and its root folder.
#[derive(Debug, Clone)]
pub struct Registration {
    pub user: User,
    pub root_folder: Folder,
}

/// Register a new user.
///
/// The user row and its "My Drive" root folder are written in a single
/// transaction. Username is checked before email, so a request colliding
/// on both reports the username.
pub async fn register(db: &Database, request: RegistrationRequest) -> Result<Registration> {
    let username = request.username.trim();
    let email = request.email.trim();
    if username.is_empty() {
        return Err(DriveError::Validation("username is required".to_string()));
    }
    if email.is_empty() {
        return Err(DriveError::Validation("email is required".to_string()));
    }
    validate_password(&request.password).map_err(|e| DriveError::Validation(e.to_string()))?;

    let users = UserRepository::new(db.pool());
    if users.username_exists(username).await? {
        return Err(DriveError::Duplicate("Username already exists".to_string()));
    }
    if users.email_exists(email).await? {
        return Err(DriveError::Duplicate("Email already exists".to_string()));
    }

    let password_hash =
        hash_password(&request.password).map_err(|e| DriveError::Internal(e.to_string()))?;

    let mut tx = db.pool().begin().await?;

    let user_id = sqlx::query("INSERT INTO users (username, email, password) VALUES (?, ?, ?)")
        .bind(username)
        .bind(email)
        .bind(&password_hash)
        .execute(&mut *tx)
        .await
        .map_err(map_unique_violation)?
        .last_insert_rowid();

    let folder_id = sqlx::query("INSERT INTO folders (name, user_id) VALUES (?, ?)")
        .bind(ROOT_FOLDER_NAME)
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

    tx.commit().await?;

    let user = users
        .get_by_id(user_id)
        .await?
        .ok_or_else(|| DriveError::NotFound("User".to_string()))?;
    let root_folder = FolderRepository::new(db.pool())
        .get_by_id(folder_id)
        .await?
        .ok_or_else(|| DriveError::NotFound("Folder".to_string()))?;

    info!(
        username = %user.username,
        user_id = user.id,
        root_folder_id = root_folder.id,
        "New user registered"
    );

    Ok(Registration { user, root_folder })
}

/// A concurrent registration can slip past the existence checks; the unique
/// indexes still reject it.
fn map_unique_violation(e: sqlx::Error) -> DriveError {
    let unique = e
        .as_database_error()
        .map(|db| db.is_unique_violation())
        .unwrap_or(false);
    if !unique {
        return e.into();
    }
    if e.to_string().contains("email") {
        DriveError::Duplicate("Email already exists".to_string())
    } else {
        DriveError::Duplicate("Username already exists".to_string())
    }
}

/// Check a username/password pair.
///
/// Unknown user and wrong password produce the same error.
pub async fn authenticate(db: &Database, username: &str, password: &str) -> Result<User> {
    let invalid = || DriveError::Auth("Invalid username or password".to_string());

    let Some(user) = UserRepository::new(db.pool())
        .get_by_username(username.trim())
        .await?
    else {
        warn!(username = %username, "Login attempt for unknown user");
        return Err(invalid());
    };

    if verify_password(password, &user.password).is_err() {
        warn!(username = %user.username, "Login failed: wrong password");
        return Err(invalid());
    }

    Ok(user)
}
