//! File handlers: upload, listing, starring, edit, view and download.

use axum::{
    body::Body,
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::Response,
    Json,
};
use axum_extra::extract::WithRejection;
use std::sync::Arc;
use validator::Validate;

use crate::drive::{resolve_access, FileRepository, FileUpdate, FolderRepository, NewFile};
use crate::web::dto::{
    ApiResponse, FileListQuery, FileResponse, ShareLinkQuery, StarResponse, UpdateFileRequest,
    UploadFileFields, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::{AuthUser, OptionalAuthUser};

const MAX_TITLE_CHARS: usize = 100;

/// Build a Content-Disposition value that is safe to put in a header.
///
/// Control characters are dropped, quotes and backslashes replaced, and a
/// UTF-8 `filename*` (RFC 5987) added whenever the plain form had to change.
pub fn content_disposition_header(filename: &str) -> String {
    let sanitized: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            '"' | '\\' => '_',
            c if !c.is_ascii() => '_',
            c => c,
        })
        .collect();

    if sanitized == filename {
        return format!("attachment; filename=\"{sanitized}\"");
    }

    let clean: String = filename.chars().filter(|c| !c.is_control()).collect();
    format!(
        "attachment; filename=\"{}\"; filename*=UTF-8''{}",
        sanitized,
        urlencoding::encode(&clean)
    )
}

/// Default title for an upload without one: the filename without control
/// characters, cut to the title length limit.
fn title_from_filename(filename: &str) -> String {
    let title: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .take(MAX_TITLE_CHARS)
        .collect();
    match title.trim() {
        "" => "Untitled".to_string(),
        trimmed => trimmed.to_string(),
    }
}

fn multipart_error(e: MultipartError) -> ApiError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return ApiError::payload_too_large("File exceeds the upload size limit");
    }
    tracing::warn!("Failed to read multipart data: {}", e);
    ApiError::bad_request("Invalid multipart data")
}

/// POST /api/files - Upload a file.
///
/// Multipart fields: `file` (required), `title`, `content`, `folder_id`.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    claims: AuthUser,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<FileResponse>>), ApiError> {
    let user_id = claims.user_id();

    let mut upload: Option<(String, Vec<u8>)> = None;
    let mut title: Option<String> = None;
    let mut content: Option<String> = None;
    let mut folder_id: Option<String> = None;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        match field.name().unwrap_or("") {
            "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let bytes = field.bytes().await.map_err(multipart_error)?;
                upload = Some((filename, bytes.to_vec()));
            }
            "title" => title = Some(field.text().await.map_err(multipart_error)?),
            "content" => content = Some(field.text().await.map_err(multipart_error)?),
            "folder_id" => folder_id = Some(field.text().await.map_err(multipart_error)?),
            _ => {}
        }
    }

    let (filename, bytes) = upload.ok_or_else(|| ApiError::bad_request("No file part"))?;
    if filename.trim().is_empty() {
        return Err(ApiError::bad_request("No file selected"));
    }

    let folder_id = match folder_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => Some(
            raw.parse::<i64>()
                .map_err(|_| ApiError::bad_request("folder_id must be an integer"))?,
        ),
        None => None,
    };

    // Check the target before any bytes hit the disk.
    if let Some(folder_id) = folder_id {
        FolderRepository::new(state.db.pool())
            .get_owned(folder_id, user_id)
            .await?
            .ok_or_else(|| ApiError::not_found("Folder not found"))?;
    }

    let fields = UploadFileFields {
        title: title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty()),
    };
    fields.validate().map_err(ApiError::from_validation_errors)?;
    let title = fields.title.unwrap_or_else(|| title_from_filename(&filename));

    let blob = state.storage.save(&bytes, &filename).await.map_err(|e| {
        tracing::error!("Failed to save upload: {}", e);
        ApiError::internal(format!("Error saving file: {e}"))
    })?;

    let mut new_file = NewFile::new(user_id, title, &blob.stored_name, blob.size as i64);
    if let Some(ext) = &blob.file_type {
        new_file = new_file.with_file_type(ext);
    }
    if let Some(content) = content {
        new_file = new_file.with_content(content);
    }
    if let Some(folder_id) = folder_id {
        new_file = new_file.with_folder(folder_id);
    }

    let file = match FileRepository::new(state.db.pool()).create(&new_file).await {
        Ok(file) => file,
        Err(e) => {
            if let Err(cleanup) = state.storage.delete(&blob.stored_name).await {
                tracing::warn!("Failed to remove orphaned blob {}: {}", blob.stored_name, cleanup);
            }
            return Err(e.into());
        }
    };

    tracing::info!(
        file_id = file.id,
        user_id,
        size = file.file_size,
        "File uploaded"
    );

    Ok((StatusCode::CREATED, Json(ApiResponse::new(file.into()))))
}

/// GET /api/files - List own files, optionally filtered by folder.
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    claims: AuthUser,
    WithRejection(Query(query), _): WithRejection<Query<FileListQuery>, ApiError>,
) -> Result<Json<ApiResponse<Vec<FileResponse>>>, ApiError> {
    let files = FileRepository::new(state.db.pool())
        .list_by_owner(claims.user_id(), query.folder_id)
        .await?;

    Ok(Json(ApiResponse::new(
        files.into_iter().map(FileResponse::from).collect(),
    )))
}

/// GET /api/files/starred - List own starred files.
pub async fn list_starred(
    State(state): State<Arc<AppState>>,
    claims: AuthUser,
) -> Result<Json<ApiResponse<Vec<FileResponse>>>, ApiError> {
    let files = FileRepository::new(state.db.pool())
        .list_starred(claims.user_id())
        .await?;

    Ok(Json(ApiResponse::new(
        files.into_iter().map(FileResponse::from).collect(),
    )))
}

/// POST /api/files/:id/star - Toggle the starred flag (owner only).
pub async fn toggle_star(
    State(state): State<Arc<AppState>>,
    claims: AuthUser,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<StarResponse>>, ApiError> {
    let is_starred = FileRepository::new(state.db.pool())
        .toggle_star(id, claims.user_id())
        .await?
        .ok_or_else(|| ApiError::not_found("File not found"))?;

    Ok(Json(ApiResponse::new(StarResponse { id, is_starred })))
}

/// PUT /api/files/:id - Edit title and/or content.
pub async fn update_file(
    State(state): State<Arc<AppState>>,
    claims: AuthUser,
    Path(id): Path<i64>,
    Query(query): Query<ShareLinkQuery>,
    ValidatedJson(req): ValidatedJson<UpdateFileRequest>,
) -> Result<Json<ApiResponse<FileResponse>>, ApiError> {
    let denied = || ApiError::not_found("File not found or you don't have permission to edit");

    let access = resolve_access(
        state.db.pool(),
        id,
        Some(claims.user_id()),
        query.share_link.as_deref(),
    )
    .await?
    .filter(|a| a.can_edit)
    .ok_or_else(denied)?;

    let mut update = FileUpdate::new();
    if let Some(title) = req.title {
        update = update.title(title.trim());
    }
    if let Some(content) = req.content {
        update = update.content(content);
    }

    // Nothing to change: keep updated_at as is.
    if update.is_empty() {
        return Ok(Json(ApiResponse::new(access.file.into())));
    }

    let file = FileRepository::new(state.db.pool())
        .update(access.file.id, &update)
        .await?
        .ok_or_else(denied)?;

    tracing::info!(file_id = file.id, user_id = claims.user_id(), via = ?access.via, "File updated");

    Ok(Json(ApiResponse::new(file.into())))
}

/// GET /api/files/:id - File metadata for the owner, a recipient or a link holder.
pub async fn view_file(
    State(state): State<Arc<AppState>>,
    claims: OptionalAuthUser,
    Path(id): Path<i64>,
    Query(query): Query<ShareLinkQuery>,
) -> Result<Json<ApiResponse<FileResponse>>, ApiError> {
    let access = resolve_access(
        state.db.pool(),
        id,
        claims.user_id(),
        query.share_link.as_deref(),
    )
    .await?
    .ok_or_else(|| ApiError::not_found("File not found or you don't have permission to view"))?;

    Ok(Json(ApiResponse::new(access.file.into())))
}

/// GET /api/files/:id/download - Stored bytes, named after the file title.
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    claims: OptionalAuthUser,
    Path(id): Path<i64>,
    Query(query): Query<ShareLinkQuery>,
) -> Result<Response, ApiError> {
    let access = resolve_access(
        state.db.pool(),
        id,
        claims.user_id(),
        query.share_link.as_deref(),
    )
    .await?
    .ok_or_else(|| {
        ApiError::not_found("File not found or you don't have permission to download")
    })?;

    let file = access.file;
    let content = state.storage.load(&file.stored_name).await?;

    let mime_type = mime_guess::from_path(&file.stored_name)
        .first_or_octet_stream()
        .to_string();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime_type)
        .header(header::CONTENT_LENGTH, content.len())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_header(&file.title),
        )
        .body(Body::from(content))
        .map_err(|e| {
            tracing::error!("Failed to build download response: {}", e);
            ApiError::internal("Failed to build response")
        })
}
