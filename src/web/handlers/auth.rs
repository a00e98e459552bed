//! Authentication handlers.

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::auth::{authenticate, register as register_account, RegistrationRequest};
use crate::db::UserRepository;
use crate::web::dto::{
    ApiResponse, LoginRequest, LoginResponse, RegisterRequest, RegisterResponse, UserInfo,
    ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::handlers::AppState;
use crate::web::middleware::AuthUser;

/// POST /api/auth/register - Create an account and its "My Drive" folder.
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<RegisterResponse>>), ApiError> {
    let registration = register_account(
        &state.db,
        RegistrationRequest::new(req.username, req.email, req.password),
    )
    .await?;

    let response = RegisterResponse {
        root_folder_id: registration.root_folder.id,
        user: registration.user.into(),
    };
    Ok((StatusCode::CREATED, Json(ApiResponse::new(response))))
}

/// POST /api/auth/login - Exchange credentials for an access token.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>, ApiError> {
    let user = authenticate(&state.db, &req.username, &req.password).await?;
    let access_token = state.jwt.issue(user.id, &user.username)?;

    tracing::info!(user_id = user.id, username = %user.username, "User logged in");

    Ok(Json(ApiResponse::new(LoginResponse {
        access_token,
        token_type: "Bearer",
        expires_in: state.jwt.access_token_expiry,
        user: user.into(),
    })))
}

/// GET /api/auth/me - Current user.
pub async fn me(
    State(state): State<Arc<AppState>>,
    claims: AuthUser,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let user = UserRepository::new(state.db.pool())
        .get_by_id(claims.user_id())
        .await?
        .ok_or_else(|| ApiError::not_found("User not found"))?;

    Ok(Json(ApiResponse::new(user.into())))
}
