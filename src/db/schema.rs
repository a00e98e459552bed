//! Database schema and migrations for SkyDrive.
//!
//! Migrations are applied in order; `schema_version` records how many have run.

/// Database migrations.
pub const MIGRATIONS: &[&str] = &[
    // v1: users
    r#"
CREATE TABLE users (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    username    TEXT NOT NULL,
    email       TEXT NOT NULL,
    password    TEXT NOT NULL,           -- Argon2 hash
    avatar      TEXT NOT NULL DEFAULT 'default-avatar.png',
    created_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE UNIQUE INDEX idx_users_username_nocase ON users(username COLLATE NOCASE);
CREATE UNIQUE INDEX idx_users_email_nocase ON users(email COLLATE NOCASE);
"#,
    // v2: folders (per-user forest linked by parent_id)
    r#"
CREATE TABLE folders (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    name        TEXT NOT NULL,
    user_id     INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    parent_id   INTEGER REFERENCES folders(id) ON DELETE CASCADE,
    created_at  TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at  TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_folders_user_id ON folders(user_id);
CREATE INDEX idx_folders_parent_id ON folders(parent_id);
"#,
    // v3: files (metadata; bytes live in blob storage)
    r#"
CREATE TABLE files (
    id                INTEGER PRIMARY KEY AUTOINCREMENT,
    title             TEXT NOT NULL,
    content           TEXT,
    stored_name       TEXT NOT NULL,
    file_type         TEXT,              -- lower-cased extension, NULL when none
    file_size         INTEGER NOT NULL DEFAULT 0,
    user_id           INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    parent_folder_id  INTEGER REFERENCES folders(id) ON DELETE SET NULL,
    is_starred        INTEGER NOT NULL DEFAULT 0,
    created_at        TEXT NOT NULL DEFAULT (datetime('now')),
    updated_at        TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE INDEX idx_files_user_id ON files(user_id);
CREATE INDEX idx_files_parent_folder_id ON files(parent_folder_id);
CREATE INDEX idx_files_starred ON files(user_id, is_starred);
"#,
    // v4: share grants
    r#"
CREATE TABLE shared_files (
    id              INTEGER PRIMARY KEY AUTOINCREMENT,
    file_id         INTEGER NOT NULL REFERENCES files(id) ON DELETE CASCADE,
    owner_id        INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    shared_with_id  INTEGER REFERENCES users(id) ON DELETE CASCADE,  -- NULL: anyone with the link
    share_token     TEXT NOT NULL UNIQUE,
    can_edit        INTEGER NOT NULL DEFAULT 0,
    created_at      TEXT NOT NULL DEFAULT (datetime('now'))
);

CREATE UNIQUE INDEX idx_shared_files_recipient ON shared_files(file_id, shared_with_id);
CREATE INDEX idx_shared_files_owner_id ON shared_files(owner_id);
CREATE INDEX idx_shared_files_shared_with_id ON shared_files(shared_with_id);
"#,
];
