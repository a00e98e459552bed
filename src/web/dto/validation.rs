//! Validated JSON extraction and shared field validators.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::web::error::ApiError;

/// A JSON extractor that runs `validator` rules after deserializing.
///
/// Malformed JSON is a 400; rule violations are a 422 with per-field details.
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON: {}", e.body_text())))?;

        value.validate().map_err(ApiError::from_validation_errors)?;

        Ok(ValidatedJson(value))
    }
}

/// Reject control characters other than newline, carriage return and tab.
pub fn no_control_chars(value: &str) -> Result<(), validator::ValidationError> {
    if value
        .chars()
        .any(|c| c.is_control() && c != '\n' && c != '\r' && c != '\t')
    {
        return Err(validator::ValidationError::new("no_control_chars")
            .with_message("Must not contain control characters".into()));
    }
    Ok(())
}

/// Reject blank strings.
pub fn not_empty_trimmed(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        return Err(validator::ValidationError::new("not_empty_trimmed")
            .with_message("Must not be empty".into()));
    }
    Ok(())
}

/// Reject names that cannot be a single path component.
pub fn no_path_separators(value: &str) -> Result<(), validator::ValidationError> {
    if value.contains(['/', '\\']) {
        return Err(validator::ValidationError::new("no_path_separators")
            .with_message("Must not contain '/' or '\\'".into()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_control_chars() {
        assert!(no_control_chars("hello\nworld\t!").is_ok());
        assert!(no_control_chars("bad\0byte").is_err());
        assert!(no_control_chars("bell\x07").is_err());
    }

    #[test]
    fn test_not_empty_trimmed() {
        assert!(not_empty_trimmed("x").is_ok());
        assert!(not_empty_trimmed("   ").is_err());
        assert!(not_empty_trimmed("").is_err());
    }

    #[test]
    fn test_no_path_separators() {
        assert!(no_path_separators("Holiday photos").is_ok());
        assert!(no_path_separators("a/b").is_err());
        assert!(no_path_separators("a\\b").is_err());
    }
}
