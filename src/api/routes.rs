use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    create_template, get_questionnaire_response, get_template, health, list_template_responses,
    list_templates, method_not_allowed, not_found, submit_questionnaire_response, AppState,
};
use super::middleware::{logging_middleware, translate_errors};
use super::openapi::ApiDoc;
use crate::config::CorsConfig;
use crate::metrics;

pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.cors);

    Router::new()
        // Health check
        .route("/health", get(health))
        // Templates
        .route("/api/templates", post(create_template).get(list_templates))
        .route("/api/templates/:id", get(get_template))
        .route("/api/templates/:id/responses", get(list_template_responses))
        // Questionnaire responses
        .route(
            "/api/questionnaire-responses",
            post(submit_questionnaire_response),
        )
        .route(
            "/api/questionnaire-responses/:id",
            get(get_questionnaire_response),
        )
        // Metrics endpoint (Prometheus)
        .route("/metrics", get(metrics::metrics_handler))
        // OpenAPI documentation
        .merge(SwaggerUi::new("/api-docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .method_not_allowed_fallback(method_not_allowed)
        .fallback(not_found)
        // Middleware, innermost first: errors -> logging -> metrics -> cors -> compression -> trace
        .layer(middleware::from_fn(translate_errors))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(metrics::middleware::track_metrics))
        .layer(cors)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build the CORS layer. Credentials are only allowed with an explicit origin list,
/// since browsers reject a wildcard origin on credentialed requests.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allows_any_origin() {
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(tower_http::cors::AllowMethods::mirror_request())
        .allow_headers(tower_http::cors::AllowHeaders::mirror_request())
        .allow_credentials(true)
}
