//! SkyDrive - a self-hosted cloud drive backend.
//!
//! Users own a tree of folders holding uploaded files. Files can be starred,
//! edited, and shared with other users or through public links.

pub mod auth;
pub mod config;
pub mod datetime;
pub mod db;
pub mod drive;
pub mod error;
pub mod logging;
pub mod web;

pub use auth::{
    authenticate, hash_password, register, validate_password, verify_password, PasswordError,
    Registration, RegistrationRequest,
};
pub use config::Config;
pub use db::{Database, NewUser, User, UserRepository};
pub use drive::{DriveFile, FileStorage, Folder};
pub use error::{DriveError, Result};
