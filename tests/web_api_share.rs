//! Web API Sharing Tests

mod common;

use axum::http::{header::AUTHORIZATION, StatusCode};
use serde_json::{json, Value};

use common::{bearer, create_user, spawn_app, upload_ok};
use skydrive::drive::ShareRepository;

async fn share(
    server: &axum_test::TestServer,
    token: &str,
    file_id: i64,
    body: Value,
) -> axum_test::TestResponse {
    server
        .post(&format!("/api/files/{file_id}/share"))
        .add_header(AUTHORIZATION, bearer(token))
        .json(&body)
        .await
}

#[tokio::test]
async fn test_share_with_user_grants_view() {
    let app = spawn_app().await;
    let alice = create_user(&app.server, "alice").await;
    let bob = create_user(&app.server, "bob").await;
    let id = upload_ok(&app.server, &alice.token, "plan.txt", b"plan").await;

    app.server
        .get(&format!("/api/files/{id}"))
        .add_header(AUTHORIZATION, bearer(&bob.token))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let response = share(
        &app.server,
        &alice.token,
        id,
        json!({ "shared_with_username": "bob" }),
    )
    .await;
    response.assert_status_ok();
    let body: Value = response.json();
    let token = body["data"]["share_token"].as_str().unwrap();
    assert_eq!(token.len(), 64);
    assert_eq!(
        body["data"]["share_url"],
        format!("http://drive.test/api/shared/{token}")
    );
    assert_eq!(body["data"]["shared_with"], "bob");
    assert_eq!(body["data"]["can_edit"], false);
    assert_eq!(body["data"]["updated"], false);

    app.server
        .get(&format!("/api/files/{id}"))
        .add_header(AUTHORIZATION, bearer(&bob.token))
        .await
        .assert_status_ok();

    let download = app
        .server
        .get(&format!("/api/files/{id}/download"))
        .add_header(AUTHORIZATION, bearer(&bob.token))
        .await;
    download.assert_status_ok();
    assert_eq!(download.as_bytes().as_ref(), b"plan");

    // View-only grant
    app.server
        .put(&format!("/api/files/{id}"))
        .add_header(AUTHORIZATION, bearer(&bob.token))
        .json(&json!({ "content": "changed" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_reshare_updates_existing_grant() {
    let app = spawn_app().await;
    let alice = create_user(&app.server, "alice").await;
    let bob = create_user(&app.server, "bob").await;
    let id = upload_ok(&app.server, &alice.token, "doc.txt", b"v1").await;

    let first: Value = share(
        &app.server,
        &alice.token,
        id,
        json!({ "shared_with_username": "bob" }),
    )
    .await
    .json();
    let second: Value = share(
        &app.server,
        &alice.token,
        id,
        json!({ "shared_with_username": "bob", "can_edit": true }),
    )
    .await
    .json();

    assert_eq!(second["data"]["updated"], true);
    assert_eq!(second["data"]["can_edit"], true);
    assert_eq!(second["data"]["share_token"], first["data"]["share_token"]);

    let grants = ShareRepository::new(app.db.pool())
        .list_shared_by(alice.id)
        .await
        .unwrap();
    assert_eq!(grants.len(), 1);

    let response = app
        .server
        .put(&format!("/api/files/{id}"))
        .add_header(AUTHORIZATION, bearer(&bob.token))
        .json(&json!({ "content": "v2" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["content"], "v2");
}

#[tokio::test]
async fn test_share_errors() {
    let app = spawn_app().await;
    let alice = create_user(&app.server, "alice").await;
    let bob = create_user(&app.server, "bob").await;
    let id = upload_ok(&app.server, &alice.token, "doc.txt", b"x").await;

    share(
        &app.server,
        &alice.token,
        id,
        json!({ "shared_with_username": "nobody" }),
    )
    .await
    .assert_status(StatusCode::NOT_FOUND);

    let response = share(
        &app.server,
        &alice.token,
        id,
        json!({ "shared_with_username": "alice" }),
    )
    .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(
        response.json::<Value>()["error"]["message"],
        "Cannot share a file with yourself"
    );

    share(&app.server, &bob.token, id, json!({}))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_public_link_access() {
    let app = spawn_app().await;
    let alice = create_user(&app.server, "alice").await;
    let bob = create_user(&app.server, "bob").await;
    let id = upload_ok(&app.server, &alice.token, "public.txt", b"open").await;

    let body: Value = share(&app.server, &alice.token, id, json!({}))
        .await
        .json();
    assert!(body["data"]["shared_with"].is_null());
    let token = body["data"]["share_token"].as_str().unwrap().to_string();

    let response = app.server.get(&format!("/api/shared/{token}")).await;
    response.assert_status_ok();
    let shared: Value = response.json();
    assert_eq!(shared["data"]["id"], id);
    assert_eq!(shared["data"]["title"], "public.txt");
    assert_eq!(shared["data"]["owner"], "alice");
    assert_eq!(shared["data"]["can_edit"], false);

    // Anonymous view and download with the link
    app.server
        .get(&format!("/api/files/{id}"))
        .add_query_param("share_link", &token)
        .await
        .assert_status_ok();
    let download = app
        .server
        .get(&format!("/api/files/{id}/download"))
        .add_query_param("share_link", &token)
        .await;
    download.assert_status_ok();
    assert_eq!(download.as_bytes().as_ref(), b"open");

    // Read-only link does not allow edits
    app.server
        .put(&format!("/api/files/{id}"))
        .add_query_param("share_link", &token)
        .add_header(AUTHORIZATION, bearer(&bob.token))
        .json(&json!({ "content": "defaced" }))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    // A token for one file does not open another
    let other = upload_ok(&app.server, &alice.token, "other.txt", b"no").await;
    app.server
        .get(&format!("/api/files/{other}"))
        .add_query_param("share_link", &token)
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_editable_link_allows_edit() {
    let app = spawn_app().await;
    let alice = create_user(&app.server, "alice").await;
    let bob = create_user(&app.server, "bob").await;
    let id = upload_ok(&app.server, &alice.token, "wiki.txt", b"x").await;

    let body: Value = share(&app.server, &alice.token, id, json!({ "can_edit": true }))
        .await
        .json();
    let token = body["data"]["share_token"].as_str().unwrap().to_string();

    // Editing still needs a signed-in user
    app.server
        .put(&format!("/api/files/{id}"))
        .add_query_param("share_link", &token)
        .json(&json!({ "title": "wiki-2.txt" }))
        .await
        .assert_status(StatusCode::UNAUTHORIZED);

    let response = app
        .server
        .put(&format!("/api/files/{id}"))
        .add_query_param("share_link", &token)
        .add_header(AUTHORIZATION, bearer(&bob.token))
        .json(&json!({ "title": "wiki-2.txt" }))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>()["data"]["title"], "wiki-2.txt");
}

#[tokio::test]
async fn test_invalid_share_token() {
    let app = spawn_app().await;

    let response = app.server.get("/api/shared/not-a-real-token").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(
        response.json::<Value>()["error"]["message"],
        "Invalid share link"
    );
}

#[tokio::test]
async fn test_list_shared() {
    let app = spawn_app().await;
    let alice = create_user(&app.server, "alice").await;
    let bob = create_user(&app.server, "bob").await;
    let id = upload_ok(&app.server, &alice.token, "report.txt", b"x").await;

    share(
        &app.server,
        &alice.token,
        id,
        json!({ "shared_with_username": "bob", "can_edit": true }),
    )
    .await
    .assert_status_ok();

    let alices: Value = app
        .server
        .get("/api/shared")
        .add_header(AUTHORIZATION, bearer(&alice.token))
        .await
        .json();
    let by_me = alices["data"]["shared_by_me"].as_array().unwrap();
    assert_eq!(by_me.len(), 1);
    assert_eq!(by_me[0]["id"], id);
    assert_eq!(by_me[0]["shared_with"], "bob");
    assert!(by_me[0]["share_url"]
        .as_str()
        .unwrap()
        .starts_with("http://drive.test/api/shared/"));
    assert!(alices["data"]["shared_with_me"].as_array().unwrap().is_empty());

    let bobs: Value = app
        .server
        .get("/api/shared")
        .add_header(AUTHORIZATION, bearer(&bob.token))
        .await
        .json();
    let with_me = bobs["data"]["shared_with_me"].as_array().unwrap();
    assert_eq!(with_me.len(), 1);
    assert_eq!(with_me[0]["title"], "report.txt");
    assert_eq!(with_me[0]["owner"], "alice");
    assert_eq!(with_me[0]["can_edit"], true);
    assert!(bobs["data"]["shared_by_me"].as_array().unwrap().is_empty());
}
