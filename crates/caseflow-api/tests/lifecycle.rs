//! Router-level tests driving the full case lifecycle through the public
//! HTTP surface, against a real on-disk database and blob store.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use caseflow_api::{AppStateInner, router};

async fn test_app() -> (tempfile::TempDir, Router) {
    let dir = tempfile::tempdir().expect("tempdir");
    let db = caseflow_db::Database::open(&dir.path().join("caseflow.db")).expect("open db");
    let storage = caseflow_storage::Storage::new(dir.path().join("blobs"))
        .await
        .expect("storage");
    let state = Arc::new(AppStateInner {
        db,
        storage,
        jwt_secret: "integration-test-secret".into(),
        topics: vec!["Design".into(), "Web".into()],
    });
    (dir, router(state))
}

async fn request(
    app: &Router,
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let req = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    };

    let resp = app.clone().oneshot(req).await.expect("response");
    let status = resp.status();
    let bytes = resp.into_body().collect().await.expect("body").to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

/// Register a user, returning (user_id, token).
async fn register(app: &Router, email: &str) -> (String, String) {
    let (status, body) = request(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "email": email, "password": "correct-horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    (
        body["user_id"].as_str().expect("user_id").to_string(),
        body["token"].as_str().expect("token").to_string(),
    )
}

#[tokio::test]
async fn end_to_end_case_lifecycle() {
    let (_dir, app) = test_app().await;
    let (_owner_id, owner_token) = register(&app, "owner@example.com").await;
    let (executor_id, executor_token) = register(&app, "executor@example.com").await;

    // Create an open case.
    let (status, body) = request(
        &app,
        "POST",
        "/cases",
        Some(&owner_token),
        Some(json!({ "title": "Logo", "theme": "Design", "description": "a fresh logo" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let case_id = body["id"].as_str().expect("case id").to_string();

    // It shows up in the open listing.
    let (status, body) = request(&app, "GET", "/cases?status=open", Some(&owner_token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().expect("list").len(), 1);
    assert_eq!(body[0]["owner_email"], "owner@example.com");

    // Executor accepts; the losing second accept gets a state error.
    let (status, body) = request(
        &app,
        "PUT",
        &format!("/cases/{}/accept", case_id),
        Some(&executor_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let processed_id = body["processed_case_id"].as_str().expect("id").to_string();

    let (status, body) = request(
        &app,
        "PUT",
        &format!("/cases/{}/accept", case_id),
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "case already accepted");

    // The accepted case no longer lingers in the open view.
    let (_, body) = request(&app, "GET", "/cases?status=open", Some(&owner_token), None).await;
    assert!(body.as_array().expect("list").is_empty());

    // Exactly one in-process copy, carrying the executor email snapshot.
    let (_, body) = request(&app, "GET", "/processed-cases", Some(&owner_token), None).await;
    assert_eq!(body.as_array().expect("list").len(), 1);
    assert_eq!(body[0]["executor_email"], "executor@example.com");
    assert_eq!(body[0]["executor_id"], executor_id.as_str());
    assert_eq!(body[0]["status"], "in_process");

    // Executor appends a work file.
    let (status, body) = request(
        &app,
        "POST",
        &format!("/processed-cases/{}/upload-files", processed_id),
        Some(&executor_token),
        Some(json!({ "files": ["/files/f1"] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["files"], json!(["/files/f1"]));

    // The customer cannot complete someone else's assignment.
    let (status, body) = request(
        &app,
        "PUT",
        &format!("/processed-cases/{}/complete", processed_id),
        Some(&owner_token),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "case is not assigned to you");

    // The executor can.
    let (status, body) = request(
        &app,
        "PUT",
        &format!("/processed-cases/{}/complete", processed_id),
        Some(&executor_token),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let project_id = body["project_id"].as_str().expect("project id").to_string();

    // One closed project with the appended file; no in-process rows left.
    let (status, body) = request(
        &app,
        "GET",
        &format!("/projects/{}", project_id),
        Some(&owner_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "closed");
    assert_eq!(body["files"], json!(["/files/f1"]));
    assert_eq!(body["case_id"], case_id.as_str());
    assert_eq!(body["executor_email"], "executor@example.com");

    let (_, body) = request(&app, "GET", "/processed-cases", Some(&owner_token), None).await;
    assert!(body.as_array().expect("list").is_empty());

    // Appending to the completed case now fails cleanly.
    let (status, _) = request(
        &app,
        "POST",
        &format!("/processed-cases/{}/upload-files", processed_id),
        Some(&executor_token),
        Some(json!({ "files": ["/files/late"] })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_case_rejects_bad_input_without_writing() {
    let (_dir, app) = test_app().await;
    let (_id, token) = register(&app, "owner@example.com").await;

    let (status, body) = request(
        &app,
        "POST",
        "/cases",
        Some(&token),
        Some(json!({ "title": "   " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "title is required");

    let sixteen: Vec<String> = (0..16).map(|i| format!("/files/f{}", i)).collect();
    let (status, _) = request(
        &app,
        "POST",
        "/cases",
        Some(&token),
        Some(json!({ "title": "Logo", "files": sixteen })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Nothing was persisted by either rejection.
    let (_, body) = request(&app, "GET", "/cases", Some(&token), None).await;
    assert!(body.as_array().expect("list").is_empty());

    // Fifteen refs is still fine.
    let fifteen: Vec<String> = (0..15).map(|i| format!("/files/f{}", i)).collect();
    let (status, _) = request(
        &app,
        "POST",
        "/cases",
        Some(&token),
        Some(json!({ "title": "Logo", "files": fifteen })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn auth_boundaries() {
    let (_dir, app) = test_app().await;

    // Protected surface requires a token.
    let (status, _) = request(&app, "GET", "/cases", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Health stays public.
    let (status, body) = request(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (_id, _token) = register(&app, "someone@example.com").await;

    // Duplicate registration conflicts.
    let (status, body) = request(
        &app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "email": "someone@example.com", "password": "correct-horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "email already registered");

    // Wrong password is rejected without detail.
    let (status, _) = request(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "someone@example.com", "password": "wrong-horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = request(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "email": "someone@example.com", "password": "correct-horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "someone@example.com");
    assert!(body["token"].as_str().is_some());
}

#[tokio::test]
async fn review_flow_and_profile_aggregate() {
    let (_dir, app) = test_app().await;
    let (target_id, _target_token) = register(&app, "target@example.com").await;
    let (reviewer_id, reviewer_token) = register(&app, "reviewer@example.com").await;
    let (_other_id, other_token) = register(&app, "other@example.com").await;

    // Reviewer fills in their profile so the snapshot has a display name.
    let (status, _) = request(
        &app,
        "PUT",
        "/users/me",
        Some(&reviewer_token),
        Some(json!({ "first_name": "Rita", "last_name": "Reviewer", "description": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Self-review is forbidden.
    let (status, body) = request(
        &app,
        "POST",
        "/reviews",
        Some(&reviewer_token),
        Some(json!({ "user_id": reviewer_id, "text": "great", "rating": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "cannot review yourself");

    // Out-of-range ratings and blank text are validation errors.
    for bad_rating in [0, 6] {
        let (status, _) = request(
            &app,
            "POST",
            "/reviews",
            Some(&reviewer_token),
            Some(json!({ "user_id": target_id, "text": "fine", "rating": bad_rating })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
    let (status, body) = request(
        &app,
        "POST",
        "/reviews",
        Some(&reviewer_token),
        Some(json!({ "user_id": target_id, "text": "   ", "rating": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "review text required");

    // A valid review lands with the server-side snapshot.
    let (status, body) = request(
        &app,
        "POST",
        "/reviews",
        Some(&reviewer_token),
        Some(json!({ "user_id": target_id, "text": "solid work", "rating": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let reviews = body.as_array().expect("review list");
    assert_eq!(reviews.len(), 1);
    assert_eq!(reviews[0]["reviewer_name"], "Rita Reviewer");

    // A second reviewer without a profile name snapshots as Anonymous.
    let (status, body) = request(
        &app,
        "POST",
        "/reviews",
        Some(&other_token),
        Some(json!({ "user_id": target_id, "text": "flawless", "rating": 5 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().expect("review list").len(), 2);
    assert_eq!(body[1]["reviewer_name"], "Anonymous");

    // The profile view aggregates to one decimal.
    let (status, body) = request(
        &app,
        "GET",
        &format!("/users/{}", target_id),
        Some(&reviewer_token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["average_rating"], 4.5);
    assert_eq!(body["review_count"], 2);
}

#[tokio::test]
async fn upload_then_download_round_trips() {
    let (_dir, app) = test_app().await;
    let (_id, token) = register(&app, "uploader@example.com").await;

    let req = Request::builder()
        .method("POST")
        .uri("/files?name=logo.png")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(header::CONTENT_TYPE, "image/png")
        .body(Body::from(&b"png bytes"[..]))
        .expect("request");
    let resp = app.clone().oneshot(req).await.expect("response");
    assert_eq!(resp.status(), StatusCode::CREATED);
    let bytes = resp.into_body().collect().await.expect("body").to_bytes();
    let body: Value = serde_json::from_slice(&bytes).expect("json");
    let file_ref = body["file_ref"].as_str().expect("file_ref").to_string();
    assert!(file_ref.starts_with("/files/"));
    assert_eq!(body["size"], 9);

    // Download is public and echoes the stored content type.
    let req = Request::builder()
        .method("GET")
        .uri(&file_ref)
        .body(Body::empty())
        .expect("request");
    let resp = app.clone().oneshot(req).await.expect("response");
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).expect("content type"),
        "image/png"
    );
    let bytes = resp.into_body().collect().await.expect("body").to_bytes();
    assert_eq!(&bytes[..], b"png bytes");

    // Unknown blob is a clean 404.
    let (status, _) = request(
        &app,
        "GET",
        &format!("/files/{}", uuid::Uuid::new_v4()),
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Empty uploads are rejected.
    let req = Request::builder()
        .method("POST")
        .uri("/files")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::empty())
        .expect("request");
    let resp = app.clone().oneshot(req).await.expect("response");
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn listings_filter_server_side() {
    let (_dir, app) = test_app().await;
    let (_id, token) = register(&app, "owner@example.com").await;

    for (title, theme) in [("Logo refresh", "Design"), ("Shop backend", "Web")] {
        let (status, _) = request(
            &app,
            "POST",
            "/cases",
            Some(&token),
            Some(json!({ "title": title, "theme": theme, "description": "work" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    // Free-text search matches the owner email, so both cases hit; the topic
    // filter then narrows to the exact theme.
    let (_, body) = request(
        &app,
        "GET",
        "/cases?search=owner@&topics=Design",
        Some(&token),
        None,
    )
    .await;
    let list = body.as_array().expect("list");
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["title"], "Logo refresh");

    // Search terms are case-insensitive substrings.
    let (_, body) = request(&app, "GET", "/cases?search=SHOP", Some(&token), None).await;
    assert_eq!(body.as_array().expect("list").len(), 1);

    // The configured vocabulary is served as-is.
    let (status, body) = request(&app, "GET", "/topics", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!(["Design", "Web"]));
}
