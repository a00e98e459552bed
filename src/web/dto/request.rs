//! Request DTOs for the Web API.

use serde::{Deserialize, Deserializer};
use validator::Validate;

use super::validation::{no_control_chars, no_path_separators, not_empty_trimmed};

/// User registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(
        length(min = 1, max = 50, message = "Username must be 1-50 characters"),
        custom(function = "not_empty_trimmed"),
        custom(function = "no_control_chars")
    )]
    pub username: String,
    #[validate(
        email(message = "Invalid email address"),
        length(max = 100, message = "Email must be at most 100 characters")
    )]
    pub email: String,
    #[validate(length(min = 8, max = 128, message = "Password must be 8-128 characters"))]
    pub password: String,
}

/// Login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Folder creation request. `name` defaults to "New Folder".
#[derive(Debug, Default, Deserialize, Validate)]
pub struct CreateFolderRequest {
    #[validate(
        length(min = 1, max = 100, message = "Folder name must be 1-100 characters"),
        custom(function = "not_empty_trimmed"),
        custom(function = "no_control_chars"),
        custom(function = "no_path_separators")
    )]
    pub name: Option<String>,
    pub parent_id: Option<i64>,
}

/// Folder rename request. A missing name leaves the folder unchanged.
#[derive(Debug, Deserialize, Validate)]
pub struct RenameFolderRequest {
    #[validate(
        length(min = 1, max = 100, message = "Folder name must be 1-100 characters"),
        custom(function = "not_empty_trimmed"),
        custom(function = "no_control_chars"),
        custom(function = "no_path_separators")
    )]
    pub name: Option<String>,
}

/// File edit request. Missing fields keep their current values.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateFileRequest {
    #[validate(
        length(min = 1, max = 100, message = "Title must be 1-100 characters"),
        custom(function = "not_empty_trimmed"),
        custom(function = "no_control_chars")
    )]
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Text fields of a multipart upload, checked with the same title rules as
/// an edit. A blank title falls back to the filename before validation.
#[derive(Debug, Default, Validate)]
pub struct UploadFileFields {
    #[validate(
        length(min = 1, max = 100, message = "Title must be 1-100 characters"),
        custom(function = "not_empty_trimmed"),
        custom(function = "no_control_chars")
    )]
    pub title: Option<String>,
}

/// Share request. Without a username a public link is issued.
#[derive(Debug, Deserialize, Validate)]
pub struct ShareRequest {
    #[validate(length(max = 50, message = "Username must be at most 50 characters"))]
    pub shared_with_username: Option<String>,
    #[serde(default)]
    pub can_edit: bool,
}

/// `?folder_id=` filter for file listings. An empty value means no filter.
#[derive(Debug, Default, Deserialize)]
pub struct FileListQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub folder_id: Option<i64>,
}

/// `?parent_id=` filter for folder listings. An empty value means no filter.
#[derive(Debug, Default, Deserialize)]
pub struct FolderListQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    pub parent_id: Option<i64>,
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => value.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

/// `?share_link=` token accepted by view, edit and download.
#[derive(Debug, Default, Deserialize)]
pub struct ShareLinkQuery {
    pub share_link: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_request_validation() {
        let ok = RegisterRequest {
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            password: "password123".to_string(),
        };
        assert!(ok.validate().is_ok());

        let bad = RegisterRequest {
            username: "   ".to_string(),
            email: "not-an-email".to_string(),
            password: "short".to_string(),
        };
        let errors = bad.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn test_create_folder_request_defaults() {
        let req: CreateFolderRequest = serde_json::from_str("{}").unwrap();
        assert!(req.name.is_none());
        assert!(req.parent_id.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_folder_name_rules() {
        let req = CreateFolderRequest {
            name: Some("a/b".to_string()),
            parent_id: None,
        };
        assert!(req.validate().is_err());

        let req = RenameFolderRequest {
            name: Some("x".repeat(101)),
        };
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_upload_title_rules() {
        assert!(UploadFileFields { title: None }.validate().is_ok());
        assert!(UploadFileFields {
            title: Some("notes.txt".to_string())
        }
        .validate()
        .is_ok());

        let errors = UploadFileFields {
            title: Some("t".repeat(101)),
        }
        .validate()
        .unwrap_err();
        assert!(errors.field_errors().contains_key("title"));

        assert!(UploadFileFields {
            title: Some("bell\x07".to_string())
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_list_query_empty_value_is_no_filter() {
        use axum::extract::Query;

        fn parse<T: serde::de::DeserializeOwned>(uri: &str) -> Option<T> {
            Query::<T>::try_from_uri(&uri.parse().unwrap())
                .ok()
                .map(|Query(q)| q)
        }

        let query: FileListQuery = parse("/api/files?folder_id=").unwrap();
        assert!(query.folder_id.is_none());

        let query: FileListQuery = parse("/api/files?folder_id=7").unwrap();
        assert_eq!(query.folder_id, Some(7));

        let query: FolderListQuery = parse("/api/folders").unwrap();
        assert!(query.parent_id.is_none());

        assert!(parse::<FolderListQuery>("/api/folders?parent_id=abc").is_none());
    }

    #[test]
    fn test_share_request_defaults() {
        let req: ShareRequest = serde_json::from_str("{}").unwrap();
        assert!(req.shared_with_username.is_none());
        assert!(!req.can_edit);
    }
}
