//! Sharing handlers.

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::db::UserRepository;
use crate::drive::{share_file, FileRepository, ShareRepository};
use crate::web::dto::{
    ApiResponse, ShareRequest, ShareResponse, SharedByMeEntry, SharedFileResponse,
    SharedListResponse, SharedWithMeEntry, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// POST /api/files/:id/share - Share with a user, or publicly when no
/// username is given.
pub async fn create_share(
    State(state): State<Arc<AppState>>,
    claims: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<ShareRequest>,
) -> Result<Json<ApiResponse<ShareResponse>>, ApiError> {
    let recipient = req
        .shared_with_username
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty());

    let outcome = share_file(state.db.pool(), id, claims.user_id(), recipient, req.can_edit)
        .await
        .map_err(|e| match e {
            crate::DriveError::NotFound(what) if what == "File" => {
                ApiError::not_found("File not found or you don't have permission to share")
            }
            other => other.into(),
        })?;

    let share_url = state.share_url(&outcome.grant.share_token);
    Ok(Json(ApiResponse::new(ShareResponse {
        share_token: outcome.grant.share_token,
        share_url,
        shared_with: recipient.map(str::to_string),
        can_edit: outcome.grant.can_edit,
        updated: outcome.updated,
    })))
}

/// GET /api/shared - Files shared by and with the current user.
pub async fn list_shared(
    State(state): State<Arc<AppState>>,
    claims: AuthUser,
) -> Result<Json<ApiResponse<SharedListResponse>>, ApiError> {
    let repo = ShareRepository::new(state.db.pool());

    let shared_by_me = repo
        .list_shared_by(claims.user_id())
        .await?
        .into_iter()
        .map(|share| {
            let url = state.share_url(&share.share_token);
            SharedByMeEntry::new(share, url)
        })
        .collect();

    let shared_with_me = repo
        .list_shared_with(claims.user_id())
        .await?
        .into_iter()
        .map(SharedWithMeEntry::from)
        .collect();

    Ok(Json(ApiResponse::new(SharedListResponse {
        shared_by_me,
        shared_with_me,
    })))
}

/// GET /api/shared/:token - Fetch a file through its share token.
pub async fn access_shared(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<Json<ApiResponse<SharedFileResponse>>, ApiError> {
    let invalid = || ApiError::not_found("Invalid share link");

    let grant = ShareRepository::new(state.db.pool())
        .get_by_token(&token)
        .await?
        .ok_or_else(invalid)?;

    let file = FileRepository::new(state.db.pool())
        .get_by_id(grant.file_id)
        .await?
        .ok_or_else(invalid)?;

    let owner = UserRepository::new(state.db.pool())
        .get_by_id(file.user_id)
        .await?
        .ok_or_else(invalid)?;

    tracing::debug!(file_id = file.id, "Share link accessed");

    Ok(Json(ApiResponse::new(SharedFileResponse {
        id: file.id,
        title: file.title,
        content: file.content,
        file_type: file.file_type,
        file_size: file.file_size,
        owner: owner.username,
        can_edit: grant.can_edit,
    })))
}
