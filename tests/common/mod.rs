//! Shared helpers for the Web API integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use axum::http::header::AUTHORIZATION;
use axum_test::multipart::{MultipartForm, Part};
use axum_test::{TestResponse, TestServer};
use serde_json::{json, Value};
use tempfile::TempDir;

use skydrive::web::middleware::{JwtState, RateLimitState};
use skydrive::web::{create_health_router, create_router, AppState};
use skydrive::{Database, FileStorage};

pub const JWT_SECRET: &str = "test-secret-key-for-testing-only";
pub const PASSWORD: &str = "password123";

/// A router under test with its own database and upload directory.
pub struct TestApp {
    pub server: TestServer,
    pub db: Database,
    pub storage_dir: TempDir,
}

pub async fn spawn_app() -> TestApp {
    spawn_app_with(1000, 1024 * 1024).await
}

pub async fn spawn_app_with(login_rate_limit: u32, max_upload_bytes: usize) -> TestApp {
    let storage_dir = tempfile::tempdir().expect("Failed to create storage dir");
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");

    let app_state = Arc::new(AppState::new(
        db.clone(),
        FileStorage::new(storage_dir.path()).expect("Failed to open storage"),
        Arc::new(JwtState::new(JWT_SECRET, 900)),
        "http://drive.test",
    ));

    let router = create_router(
        app_state,
        Arc::new(RateLimitState::new(login_rate_limit)),
        &[],
        max_upload_bytes,
    )
    .merge(create_health_router());

    let server = TestServer::new(router).expect("Failed to create test server");

    TestApp {
        server,
        db,
        storage_dir,
    }
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {token}")
}

/// Register `username` and return the response `data`.
pub async fn register(server: &TestServer, username: &str) -> Value {
    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "username": username,
            "email": format!("{username}@example.com"),
            "password": PASSWORD
        }))
        .await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()["data"].clone()
}

pub async fn login(server: &TestServer, username: &str) -> String {
    let response = server
        .post("/api/auth/login")
        .json(&json!({ "username": username, "password": PASSWORD }))
        .await;
    response.assert_status_ok();
    response.json::<Value>()["data"]["access_token"]
        .as_str()
        .expect("access_token missing")
        .to_string()
}

/// A registered, logged-in user.
pub struct TestUser {
    pub id: i64,
    pub token: String,
    pub root_folder_id: i64,
}

pub async fn create_user(server: &TestServer, username: &str) -> TestUser {
    let data = register(server, username).await;
    let token = login(server, username).await;
    TestUser {
        id: data["user"]["id"].as_i64().expect("user id"),
        token,
        root_folder_id: data["root_folder_id"].as_i64().expect("root folder id"),
    }
}

pub async fn upload(
    server: &TestServer,
    token: &str,
    filename: &str,
    bytes: &[u8],
    folder_id: Option<i64>,
) -> TestResponse {
    let mut form = MultipartForm::new().add_part(
        "file",
        Part::bytes(bytes.to_vec())
            .file_name(filename)
            .mime_type("application/octet-stream"),
    );
    if let Some(folder_id) = folder_id {
        form = form.add_text("folder_id", folder_id.to_string());
    }

    server
        .post("/api/files")
        .add_header(AUTHORIZATION, bearer(token))
        .multipart(form)
        .await
}

/// Upload a file and return its id.
pub async fn upload_ok(server: &TestServer, token: &str, filename: &str, bytes: &[u8]) -> i64 {
    let response = upload(server, token, filename, bytes, None).await;
    response.assert_status(axum::http::StatusCode::CREATED);
    response.json::<Value>()["data"]["id"]
        .as_i64()
        .expect("file id")
}
