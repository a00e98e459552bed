//! Router configuration for the Web API.

use axum::{
    extract::DefaultBodyLimit,
    middleware,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use super::handlers::{
    access_shared, create_folder, create_share, download_file, list_files, list_folder_contents,
    list_folders, list_shared, list_starred, login, me, register, rename_folder, toggle_star,
    update_file, upload_file, view_file, AppState,
};
use super::middleware::{create_cors_layer, jwt_auth, login_rate_limit, RateLimitState};

/// Create the main API router.
///
/// `max_upload_bytes` caps every request body, uploads included.
pub fn create_router(
    app_state: Arc<AppState>,
    rate_limit: Arc<RateLimitState>,
    cors_origins: &[String],
    max_upload_bytes: usize,
) -> Router {
    let login_route = Router::new()
        .route("/login", post(login))
        .route_layer(middleware::from_fn(move |req, next| {
            let state = rate_limit.clone();
            login_rate_limit(state, req, next)
        }));

    let auth_routes = Router::new()
        .route("/register", post(register))
        .route("/me", get(me))
        .merge(login_route);

    let file_routes = Router::new()
        .route("/", post(upload_file).get(list_files))
        .route("/starred", get(list_starred))
        .route("/:id", get(view_file).put(update_file))
        .route("/:id/star", post(toggle_star))
        .route("/:id/download", get(download_file))
        .route("/:id/share", post(create_share));

    let folder_routes = Router::new()
        .route("/", post(create_folder).get(list_folders))
        .route("/:id", put(rename_folder))
        .route("/:id/contents", get(list_folder_contents));

    let shared_routes = Router::new()
        .route("/", get(list_shared))
        .route("/:token", get(access_shared));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/files", file_routes)
        .nest("/folders", folder_routes)
        .nest("/shared", shared_routes);

    let jwt_state = app_state.jwt.clone();

    Router::new()
        .nest("/api", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins))
                .layer(CompressionLayer::new())
                .layer(DefaultBodyLimit::max(max_upload_bytes))
                .layer(middleware::from_fn(move |req, next| {
                    let state = jwt_state.clone();
                    jwt_auth(state, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

async fn health_check() -> &'static str {
    "OK"
}
