/// Router tests that need no database
///
/// Every request here is answered or rejected before a query runs, so the
/// app is built over a lazy pool pointing at a closed port.

mod common;

use axum::http::{header, Request, StatusCode};
use axum::body::Body;
use common::{body_bytes, body_json, form, get, json, lazy_app, multipart, Part};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_welcome() {
    let (app, _static_dir) = lazy_app();

    let response = app.oneshot(get("/api/welcome/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body, json!({ "message": "Welcome to the To-Do/Reminder API!" }));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (app, _static_dir) = lazy_app();

    let response = app.oneshot(get("/api/nothing-here/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_user_validation_errors_are_422_with_details() {
    let (app, _static_dir) = lazy_app();

    let request = json(
        "POST",
        "/api/users/",
        json!({ "name": "Ada", "email": "not-an-email", "password": "pw" }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "email");
}

#[tokio::test]
async fn test_whitespace_user_name_is_422() {
    let (app, _static_dir) = lazy_app();

    let request = json(
        "POST",
        "/api/users/",
        json!({ "name": "   ", "email": "ada@example.com", "password": "pw" }),
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert_eq!(body["details"][0]["field"], "name");
}

#[tokio::test]
async fn test_login_form_missing_field_is_422() {
    let (app, _static_dir) = lazy_app();

    let response = app
        .oneshot(form("POST", "/api/login/", "email=ada%40example.com"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_reminder_without_title_is_422() {
    let (app, _static_dir) = lazy_app();

    let missing = app
        .clone()
        .oneshot(form("POST", "/api/reminders/", "user_id=1"))
        .await
        .unwrap();
    assert_eq!(missing.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let blank = app
        .oneshot(form("POST", "/api/reminders/", "user_id=1&title="))
        .await
        .unwrap();
    assert_eq!(blank.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(blank).await["error"], "validation_error");
}

#[tokio::test]
async fn test_list_without_user_id_is_400() {
    let (app, _static_dir) = lazy_app();

    for uri in ["/api/reminders/", "/api/events/", "/api/memories/", "/api/predictions/"] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
    }
}

#[tokio::test]
async fn test_task_id_must_be_uuid() {
    let (app, _static_dir) = lazy_app();

    let response = app
        .oneshot(get("/api/images/tasks/not-a-uuid/"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_file_upload_requires_user_id() {
    let (app, _static_dir) = lazy_app();

    let request = multipart(
        "/api/files/",
        &[Part::File {
            name: "file",
            filename: "cat.png",
            content: b"png bytes",
        }],
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = body_json(response).await;
    assert_eq!(body["error"], "bad_request");
    assert_eq!(body["message"], "Missing 'user_id' field");
}

#[tokio::test]
async fn test_file_upload_requires_file_part() {
    let (app, _static_dir) = lazy_app();

    let response = app
        .oneshot(multipart("/api/files/", &[Part::Text("user_id", "1")]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Missing 'file' field");
}

#[tokio::test]
async fn test_file_upload_rejects_unusable_filename() {
    let (app, static_dir) = lazy_app();

    let request = multipart(
        "/api/files/",
        &[
            Part::Text("user_id", "1"),
            Part::File {
                name: "file",
                filename: "../",
                content: b"escape attempt",
            },
        ],
    );
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    // Nothing was written
    assert!(!static_dir.path().join("uploads").exists());
}

#[tokio::test]
async fn test_file_upload_rejects_non_numeric_user_id() {
    let (app, _static_dir) = lazy_app();

    let response = app
        .oneshot(multipart("/api/files/", &[Part::Text("user_id", "me")]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["message"],
        "Field 'user_id' must be a number"
    );
}

#[tokio::test]
async fn test_image_upload_requires_file_id() {
    let (app, _static_dir) = lazy_app();

    let response = app
        .oneshot(multipart("/api/images/", &[Part::Text("reminder_id", "3")]))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["message"], "Missing 'file_id' field");
}

#[tokio::test]
async fn test_image_upload_rejects_bad_flag() {
    let (app, _static_dir) = lazy_app();

    let response = app
        .oneshot(multipart(
            "/api/images/",
            &[Part::Text("file_id", "1"), Part::Text("is_proof", "maybe")],
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_static_files_are_served() {
    let (app, static_dir) = lazy_app();

    let user_dir = static_dir.path().join("uploads").join("user_1");
    std::fs::create_dir_all(&user_dir).unwrap();
    std::fs::write(user_dir.join("note.txt"), b"remember the milk").unwrap();

    let response = app
        .oneshot(get("/static/uploads/user_1/note.txt"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"remember the milk");
}

#[tokio::test]
async fn test_cors_preflight_allows_configured_origin() {
    let (app, _static_dir) = lazy_app();

    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/reminders/")
        .header(header::ORIGIN, "http://localhost:3000")
        .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .and_then(|v| v.to_str().ok()),
        Some("http://localhost:3000")
    );
}
