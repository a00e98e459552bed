//! Folder handlers.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;
use std::sync::Arc;

use crate::drive::{folder_contents, FolderRepository, NewFolder, DEFAULT_FOLDER_NAME};
use crate::web::dto::{
    ApiResponse, ContentEntry, CreateFolderRequest, FolderContentsResponse, FolderListQuery,
    FolderResponse, FolderSummary, RenameFolderRequest, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// POST /api/folders - Create a folder, optionally under a parent.
pub async fn create_folder(
    State(state): State<Arc<AppState>>,
    claims: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateFolderRequest>,
) -> Result<(StatusCode, Json<ApiResponse<FolderResponse>>), ApiError> {
    let name = req
        .name
        .as_deref()
        .map(str::trim)
        .unwrap_or(DEFAULT_FOLDER_NAME);

    let mut new_folder = NewFolder::new(claims.user_id(), name);
    if let Some(parent_id) = req.parent_id {
        new_folder = new_folder.with_parent(parent_id);
    }

    let folder = FolderRepository::new(state.db.pool())
        .create(&new_folder)
        .await?;

    tracing::info!(folder_id = folder.id, user_id = claims.user_id(), "Folder created");

    Ok((StatusCode::CREATED, Json(ApiResponse::new(folder.into()))))
}

/// GET /api/folders - List own folders, optionally by parent.
pub async fn list_folders(
    State(state): State<Arc<AppState>>,
    claims: AuthUser,
    WithRejection(Query(query), _): WithRejection<Query<FolderListQuery>, ApiError>,
) -> Result<Json<ApiResponse<Vec<FolderResponse>>>, ApiError> {
    let repo = FolderRepository::new(state.db.pool());
    let folders = match query.parent_id {
        Some(parent_id) => repo.list_by_parent(claims.user_id(), parent_id).await?,
        None => repo.list_by_owner(claims.user_id()).await?,
    };

    Ok(Json(ApiResponse::new(
        folders.into_iter().map(FolderResponse::from).collect(),
    )))
}

/// PUT /api/folders/:id - Rename a folder.
pub async fn rename_folder(
    State(state): State<Arc<AppState>>,
    claims: AuthUser,
    Path(id): Path<i64>,
    ValidatedJson(req): ValidatedJson<RenameFolderRequest>,
) -> Result<Json<ApiResponse<FolderResponse>>, ApiError> {
    let repo = FolderRepository::new(state.db.pool());
    let not_found = || ApiError::not_found("Folder not found");

    let folder = match req.name.as_deref().map(str::trim) {
        Some(name) => repo.rename(id, claims.user_id(), name).await?,
        None => repo.get_owned(id, claims.user_id()).await?,
    }
    .ok_or_else(not_found)?;

    Ok(Json(ApiResponse::new(folder.into())))
}

/// GET /api/folders/:id/contents - Subfolders and files of a folder.
pub async fn list_folder_contents(
    State(state): State<Arc<AppState>>,
    claims: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<FolderContentsResponse>>, ApiError> {
    let contents = folder_contents(state.db.pool(), id, claims.user_id()).await?;

    let response = FolderContentsResponse {
        folder: FolderSummary {
            id: contents.folder.id,
            name: contents.folder.name,
            parent_id: contents.folder.parent_id,
        },
        contents: contents
            .entries
            .into_iter()
            .map(ContentEntry::from)
            .collect(),
    };

    Ok(Json(ApiResponse::new(response)))
}
