use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{info, warn};

use crate::errors::EnvelopeReceipt;

/// Middleware writing one structured line per request.
///
/// Error responses include the envelope's `request_id` so the access log
/// lines up with the diagnostic entry for the same failure.
pub async fn logging_middleware(request: Request, next: Next) -> Response {
    let start = Instant::now();

    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string());
    let path = request.uri().path().to_string();
    let user_agent = request
        .headers()
        .get("user-agent")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    let response = next.run(request).await;

    let duration_ms = start.elapsed().as_millis();
    let status = response.status();
    let route = route.as_deref().unwrap_or("-");

    match response.extensions().get::<EnvelopeReceipt>() {
        None if !status.is_client_error() && !status.is_server_error() => {
            info!(
                method = %method,
                path = %path,
                route = %route,
                status = status.as_u16(),
                duration_ms = %duration_ms,
                user_agent = %user_agent,
                "Request completed"
            );
        }
        receipt => {
            let request_id = receipt.map(|r| r.request_id.as_str()).unwrap_or("-");
            warn!(
                request_id = %request_id,
                method = %method,
                path = %path,
                route = %route,
                status = status.as_u16(),
                duration_ms = %duration_ms,
                user_agent = %user_agent,
                "Request failed ({})",
                failure_class(status.as_u16())
            );
        }
    }

    response
}

fn failure_class(status: u16) -> &'static str {
    match status {
        400..=499 => "client error",
        500..=599 => "server error",
        _ => "error envelope",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_class() {
        assert_eq!(failure_class(404), "client error");
        assert_eq!(failure_class(500), "server error");
        assert_eq!(failure_class(302), "error envelope");
    }
}
