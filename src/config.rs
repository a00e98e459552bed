//! Configuration for SkyDrive.
//!
//! Read from a TOML file; every key is optional and falls back to the
//! value in the section's `Default` impl.

use serde::Deserialize;
use std::path::Path;

use crate::{DriveError, Result};

/// Environment variable that overrides `web.jwt_secret`.
pub const JWT_SECRET_ENV: &str = "SKYDRIVE_JWT_SECRET";

const MEGABYTE: u64 = 1024 * 1024;

/// `[database]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    /// SQLite file, created on first start.
    pub path: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: "data/skydrive.db".into(),
        }
    }
}

/// `[files]` section: where blobs live and how big they may be.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FilesConfig {
    pub storage_path: String,
    pub max_upload_size_mb: u64,
}

impl FilesConfig {
    /// Upload limit in bytes.
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_size_mb.saturating_mul(MEGABYTE)
    }
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            storage_path: "uploads".into(),
            max_upload_size_mb: 50,
        }
    }
}

/// `[logging]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter level; `RUST_LOG` takes precedence.
    pub level: String,
    /// Log file, appended to.
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".into(),
            file: "logs/skydrive.log".into(),
        }
    }
}

/// `[web]` section.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub host: String,
    pub port: u16,
    /// Externally visible base URL, used in share links.
    pub public_url: String,
    /// Allowed CORS origins; empty allows any.
    pub cors_origins: Vec<String>,
    /// HS256 signing secret. Must be set before serving.
    pub jwt_secret: String,
    pub jwt_access_token_expiry_secs: u64,
    /// Login attempts per minute per client IP.
    pub login_rate_limit: u32,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            public_url: "http://localhost:8080".into(),
            cors_origins: Vec::new(),
            jwt_secret: String::new(),
            jwt_access_token_expiry_secs: 24 * 60 * 60,
            login_rate_limit: 10,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub web: WebConfig,
    pub database: DatabaseConfig,
    pub files: FilesConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Read and parse a TOML file. A missing file is an I/O error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| DriveError::Config(format!("config parse error: {e}")))
    }

    /// A non-empty `SKYDRIVE_JWT_SECRET` replaces `web.jwt_secret`.
    pub fn apply_env_overrides(&mut self) {
        match std::env::var(JWT_SECRET_ENV) {
            Ok(secret) if !secret.is_empty() => self.web.jwt_secret = secret,
            _ => {}
        }
    }

    /// Reject settings the server cannot start with.
    pub fn validate(&self) -> Result<()> {
        if self.web.jwt_secret.is_empty() {
            return Err(DriveError::Config(format!(
                "jwt_secret is empty; set web.jwt_secret or {JWT_SECRET_ENV}"
            )));
        }
        if self.files.max_upload_size_mb == 0 {
            return Err(DriveError::Config(
                "files.max_upload_size_mb must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
