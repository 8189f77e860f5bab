mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware,
    routing::get,
    Json, Router,
};
use serde_json::{json, Value};
use tower::Service;

use audiobook_api::api::middleware::translate_errors;
use audiobook_api::errors::{context, ErrorContext, ErrorEnvelope, Fault, INTERNAL_SERVER_ERROR_DETAIL};

use common::{assert_error_envelope, capture_logs};

#[derive(Debug, thiserror::Error)]
#[error("narration file is corrupt")]
struct CorruptNarration;

async fn classified() -> Result<Json<Value>, ErrorEnvelope> {
    Err(ErrorEnvelope::new(StatusCode::BAD_REQUEST, "Test error"))
}

async fn classified_with_context() -> Result<Json<Value>, ErrorEnvelope> {
    Err(ErrorEnvelope::with_context(
        StatusCode::BAD_REQUEST,
        "Test detailed exception",
        context([("user_id", "test_user")]),
    ))
}

async fn from_fault() -> Result<Json<Value>, ErrorEnvelope> {
    Err(ErrorEnvelope::from_fault(
        StatusCode::UNPROCESSABLE_ENTITY,
        "Narration could not be decoded",
        Fault::capture(&CorruptNarration),
        context([("chapter", 3i64)]),
    ))
}

async fn unexpected() -> Json<Value> {
    panic!("Unexpected error occurred")
}

async fn success() -> Json<Value> {
    Json(json!({"status": "ok"}))
}

fn app() -> Router {
    Router::new()
        .route("/classified", get(classified))
        .route("/classified-context", get(classified_with_context))
        .route("/fault", get(from_fault))
        .route("/unexpected", get(unexpected))
        .route("/success", get(success))
        .layer(middleware::from_fn(translate_errors))
}

async fn get_json(app: &mut Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let response = app.call(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, serde_json::from_slice(&body).unwrap())
}

#[tokio::test]
async fn test_classified_error_is_rendered_as_envelope() {
    let mut app = app();
    let (status, body) = get_json(&mut app, "/classified").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body);
    assert_eq!(body["detail"], "Test error");
    assert!(body.get("context").is_none());
}

#[tokio::test]
async fn test_classified_context_is_echoed_verbatim() {
    let mut app = app();
    let (status, body) = get_json(&mut app, "/classified-context").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_error_envelope(&body);
    assert_eq!(body["detail"], "Test detailed exception");
    assert_eq!(body["context"], json!({"user_id": "test_user"}));
}

#[tokio::test]
async fn test_unexpected_failure_is_hidden_from_client() {
    let (logs, _guard) = capture_logs();
    let mut app = app();

    let (status, body) = get_json(&mut app, "/unexpected").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let request_id = assert_error_envelope(&body);
    assert_eq!(body["detail"], INTERNAL_SERVER_ERROR_DETAIL);
    assert!(!body.to_string().contains("Unexpected error occurred"));

    let logs = logs.contents();
    assert!(logs.contains("ERROR"));
    assert!(logs.contains("Unexpected error occurred"));
    assert!(logs.contains(&request_id.to_string()));
}

#[tokio::test]
async fn test_success_is_untouched_and_silent() {
    let (logs, _guard) = capture_logs();
    let mut app = app();

    let (status, body) = get_json(&mut app, "/success").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"status": "ok"}));
    assert!(logs.contents().is_empty(), "unexpected log output: {}", logs.contents());
}

#[tokio::test]
async fn test_classified_error_is_not_logged_as_error() {
    let (logs, _guard) = capture_logs();
    let mut app = app();

    let (status, _) = get_json(&mut app, "/classified").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(!logs.contents().contains("ERROR"));
}

#[tokio::test]
async fn test_fault_envelope_keeps_context_but_not_traceback() {
    let (logs, _guard) = capture_logs();
    let mut app = app();

    let (status, body) = get_json(&mut app, "/fault").await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    let request_id = assert_error_envelope(&body);
    assert_eq!(body["detail"], "Narration could not be decoded");
    assert_eq!(body["context"], json!({"chapter": 3}));
    assert!(body.get("traceback").is_none());
    assert!(!body.to_string().contains("narration file is corrupt"));

    let logs = logs.contents();
    assert!(logs.contains("narration file is corrupt"));
    assert!(logs.contains(&request_id.to_string()));
}

#[tokio::test]
async fn test_each_failure_gets_its_own_request_id() {
    let mut app = app();

    let (_, first) = get_json(&mut app, "/unexpected").await;
    let (_, second) = get_json(&mut app, "/unexpected").await;
    let (_, third) = get_json(&mut app, "/classified").await;

    let ids = [
        assert_error_envelope(&first),
        assert_error_envelope(&second),
        assert_error_envelope(&third),
    ];
    assert_ne!(ids[0], ids[1]);
    assert_ne!(ids[1], ids[2]);
    assert_ne!(ids[0], ids[2]);
}

#[test]
fn test_envelope_without_context_omits_context_key() {
    let envelope = ErrorEnvelope::with_context(StatusCode::NOT_FOUND, "gone", ErrorContext::new());
    let body = serde_json::to_value(envelope.external_view()).unwrap();

    let keys: Vec<&str> = body.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys.len(), 3);
    assert!(keys.contains(&"status"));
    assert!(keys.contains(&"detail"));
    assert!(keys.contains(&"request_id"));
}
