//! Authentication module for SkyDrive.
//!
//! Password hashing, registration and credential checks. Token issuance
//! lives in `web::middleware::auth`.

mod password;
mod registration;

pub use password::{
    hash_password, validate_password, verify_password, PasswordError, MAX_PASSWORD_LENGTH,
    MIN_PASSWORD_LENGTH,
};
pub use registration::{authenticate, register, Registration, RegistrationRequest};
