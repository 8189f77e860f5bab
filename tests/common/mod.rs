#![allow(dead_code)]

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use std::io;
use std::sync::{Arc, Mutex};
use tower::Service;

use audiobook_api::api;
use audiobook_api::config::{
    AppConfig, Config, CorsConfig, DatabaseConfig, Environment, LogFormat, ServerConfig,
};
use audiobook_api::db;

pub fn test_config() -> Config {
    Config {
        app: AppConfig {
            project_name: "AudioV4".to_string(),
            environment: Environment::Testing,
            debug: true,
            log_level: "DEBUG".to_string(),
            log_format: LogFormat::Pretty,
            log_file: None,
        },
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            instance_id: "test-instance".to_string(),
        },
        database: DatabaseConfig {
            url: "memory://".to_string(),
            max_connections: 1,
            acquire_timeout_ms: 1_000,
        },
        cors: CorsConfig {
            allowed_origins: vec!["*".to_string()],
        },
    }
}

// Helper to create test app backed by the in-memory store
pub async fn create_test_app() -> axum::Router {
    let config = test_config();
    let db = db::init_database(&config.database)
        .await
        .expect("Failed to initialize in-memory database");

    let state = Arc::new(api::handlers::AppStateInner::new(config, db));
    api::routes::create_router(state)
}

async fn read_response(response: axum::response::Response) -> (StatusCode, Value) {
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body).unwrap_or(json!({}));
    (status, json)
}

// Helper to send request and parse JSON response
pub async fn send_json_request(app: &mut axum::Router, method: &str, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();

    read_response(app.call(request).await.unwrap()).await
}

// Helper to send JSON request with JSON body
pub async fn send_json_body_request(
    app: &mut axum::Router,
    method: &str,
    uri: &str,
    body: Value,
) -> (StatusCode, Value) {
    let bytes = serde_json::to_vec(&body).unwrap();
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(bytes))
        .unwrap();

    read_response(app.call(request).await.unwrap()).await
}

// Helper to send a raw body with an explicit content type
pub async fn send_raw_body_request(
    app: &mut axum::Router,
    method: &str,
    uri: &str,
    content_type: &str,
    body: &'static str,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", content_type)
        .body(Body::from(body))
        .unwrap();

    read_response(app.call(request).await.unwrap()).await
}

/// Assert the shared shape of every error body and return its request_id
pub fn assert_error_envelope(body: &Value) -> uuid::Uuid {
    assert_eq!(body["status"], "error");
    assert!(body["detail"].is_string());
    let request_id = body["request_id"].as_str().expect("request_id is a string");
    uuid::Uuid::parse_str(request_id).expect("request_id is a valid UUID")
}

/// In-memory log sink for asserting on emitted records
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Route this thread's tracing output into a fresh buffer until the guard drops
pub fn capture_logs() -> (LogBuffer, tracing::subscriber::DefaultGuard) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::TRACE)
        .with_writer(move || writer.clone())
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (buffer, guard)
}
