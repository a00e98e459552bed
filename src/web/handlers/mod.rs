//! API handlers.

pub mod auth;
pub mod file;
pub mod folder;
pub mod share;

pub use auth::*;
pub use file::*;
pub use folder::*;
pub use share::*;

use std::sync::Arc;

use crate::drive::FileStorage;
use crate::web::middleware::JwtState;
use crate::Database;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub storage: FileStorage,
    pub jwt: Arc<JwtState>,
    /// Base URL used when building share links.
    pub public_url: String,
}

impl AppState {
    pub fn new(
        db: Database,
        storage: FileStorage,
        jwt: Arc<JwtState>,
        public_url: impl Into<String>,
    ) -> Self {
        Self {
            db,
            storage,
            jwt,
            public_url: public_url.into(),
        }
    }

    /// Full URL for a share token.
    pub fn share_url(&self, token: &str) -> String {
        format!("{}/api/shared/{}", self.public_url.trim_end_matches('/'), token)
    }
}
