//! HTTP-level tests driving the router against an in-memory database.

mod common;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use teacherapp::api::{create_router, AppState};
use teacherapp::mailer::Mailer;

use common::{test_config, test_database, FailingMailer, RecordingMailer};

async fn app_with(mailer: Arc<dyn Mailer>, expose_token: bool) -> Router {
    let db = test_database().await;
    let mut config = test_config();
    config.expose_activation_token = expose_token;
    create_router(AppState::with_mailer(db, &config, mailer))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn registration_body(username: &str, email: &str) -> Value {
    json!({
        "username": username,
        "email": email,
        "password": "SecurePass123!",
        "role": "teacher"
    })
}

#[tokio::test]
async fn test_register_returns_created_without_token_by_default() {
    let app = app_with(Arc::new(RecordingMailer::default()), false).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/authentication/register",
        Some(registration_body("jdoe", "jdoe@example.com")),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["username"], "jdoe");
    assert_eq!(body["data"]["role"], "teacher");
    assert_eq!(body["data"]["is_active"], false);
    assert_eq!(body["data"]["version"], 1);
    assert!(body["data"].get("token").is_none());
    assert!(body["data"].get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_can_expose_token() {
    let app = app_with(Arc::new(RecordingMailer::default()), true).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/authentication/register",
        Some(registration_body("jdoe", "jdoe@example.com")),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["token"].as_str().map(str::len), Some(64));
}

#[tokio::test]
async fn test_register_duplicate_email_is_bad_request() {
    let app = app_with(Arc::new(RecordingMailer::default()), false).await;

    let (first, _) = send(
        &app,
        Method::POST,
        "/v1/authentication/register",
        Some(registration_body("first", "shared@example.com")),
    )
    .await;
    assert_eq!(first, StatusCode::CREATED);

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/authentication/register",
        Some(registration_body("second", "shared@example.com")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "DUPLICATE_EMAIL");
}

#[tokio::test]
async fn test_register_rejects_invalid_payloads() {
    let app = app_with(Arc::new(RecordingMailer::default()), false).await;

    let mut short_password = registration_body("jdoe", "jdoe@example.com");
    short_password["password"] = json!("short");

    let mut bad_role = registration_body("jdoe", "jdoe@example.com");
    bad_role["role"] = json!("janitor");

    for payload in [
        short_password,
        bad_role,
        registration_body("jdoe", "not-an-email"),
        json!({"username": "jdoe"}),
    ] {
        let (status, body) =
            send(&app, Method::POST, "/v1/authentication/register", Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }
}

#[tokio::test]
async fn test_register_with_mail_outage_is_server_error_and_rolled_back() {
    let app = app_with(Arc::new(FailingMailer::default()), false).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/authentication/register",
        Some(registration_body("jdoe", "jdoe@example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "DELIVERY_ERROR");

    // The username is free again after compensation
    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/authentication/register",
        Some(registration_body("jdoe", "jdoe@example.com")),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"]["code"], "DELIVERY_ERROR");
}

#[tokio::test]
async fn test_activate_with_emailed_token() {
    let mailer = Arc::new(RecordingMailer::default());
    let app = app_with(mailer.clone(), false).await;

    let (_, body) = send(
        &app,
        Method::POST,
        "/v1/authentication/register",
        Some(registration_body("jdoe", "jdoe@example.com")),
    )
    .await;
    let user_id = body["data"]["id"].as_i64().unwrap();
    let token = mailer.token_for("jdoe@example.com").unwrap();

    let activate_uri = format!("/v1/users/activate/{}", token);
    let (status, body) = send(&app, Method::PUT, &activate_uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, body) = send(&app, Method::GET, &format!("/v1/users/{}", user_id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["is_active"], true);
    assert_eq!(body["data"]["user"]["version"], 2);

    let (status, body) = send(&app, Method::PUT, &activate_uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["message"], "Resource not found");
}

#[tokio::test]
async fn test_activate_unknown_token_is_not_found() {
    let app = app_with(Arc::new(RecordingMailer::default()), false).await;

    let (status, body) = send(&app, Method::PUT, "/v1/users/activate/deadbeef", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_get_user_returns_user_and_empty_profile() {
    let app = app_with(Arc::new(RecordingMailer::default()), false).await;

    let (_, body) = send(
        &app,
        Method::POST,
        "/v1/authentication/register",
        Some(registration_body("jdoe", "jdoe@example.com")),
    )
    .await;
    let user_id = body["data"]["id"].as_i64().unwrap();

    let (status, body) = send(&app, Method::GET, &format!("/v1/users/{}", user_id), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user"]["email"], "jdoe@example.com");
    assert_eq!(body["data"]["profile"]["user_id"], user_id);
    assert_eq!(body["data"]["profile"]["first_name"], Value::Null);
}

#[tokio::test]
async fn test_user_routes_reject_bad_and_unknown_ids() {
    let app = app_with(Arc::new(RecordingMailer::default()), false).await;

    let (status, _) = send(&app, Method::GET, "/v1/users/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, Method::GET, "/v1/users/404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, "/v1/users/404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_user_then_get_is_not_found() {
    let app = app_with(Arc::new(RecordingMailer::default()), false).await;

    let (_, body) = send(
        &app,
        Method::POST,
        "/v1/authentication/register",
        Some(registration_body("jdoe", "jdoe@example.com")),
    )
    .await;
    let user_id = body["data"]["id"].as_i64().unwrap();

    let (status, _) = send(&app, Method::DELETE, &format!("/v1/users/{}", user_id), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, &format!("/v1/users/{}", user_id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_users_returns_everyone_oldest_first() {
    let app = app_with(Arc::new(RecordingMailer::default()), false).await;

    let (status, body) = send(&app, Method::GET, "/v1/users/getAll", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));

    for (username, email) in [("first", "first@example.com"), ("second", "second@example.com")] {
        let (status, _) = send(
            &app,
            Method::POST,
            "/v1/authentication/register",
            Some(registration_body(username, email)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, body) = send(&app, Method::GET, "/v1/users/getAll", None).await;

    assert_eq!(status, StatusCode::OK);
    let users = body["data"].as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["username"], "first");
    assert_eq!(users[1]["username"], "second");
    assert!(users[0].get("password_hash").is_none());
}

#[tokio::test]
async fn test_get_profile_by_id() {
    let app = app_with(Arc::new(RecordingMailer::default()), false).await;

    let (_, body) = send(
        &app,
        Method::POST,
        "/v1/authentication/register",
        Some(registration_body("jdoe", "jdoe@example.com")),
    )
    .await;
    let user_id = body["data"]["id"].as_i64().unwrap();

    let (_, body) = send(&app, Method::GET, &format!("/v1/users/{}", user_id), None).await;
    let profile_id = body["data"]["profile"]["id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/v1/user-profiles/{}", profile_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["user_id"], user_id);

    let (status, _) = send(&app, Method::GET, "/v1/user-profiles/404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, Method::GET, "/v1/user-profiles/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_health_reports_database() {
    let app = app_with(Arc::new(RecordingMailer::default()), false).await;

    let (status, body) = send(&app, Method::GET, "/v1/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["database"]["status"], "healthy");
}
