use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tracing::info;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use super::extract::{ApiJson, ApiPath, ApiQuery};
use crate::config::Config;
use crate::db::Database;
use crate::errors::{context, ErrorBody, ErrorEnvelope};
use crate::models::{NewQuestionnaireResponse, NewTemplate, QuestionnaireResponse, Template};
use crate::services::{QuestionnaireService, TemplateService};

lazy_static::lazy_static! {
    static ref START_TIME: Instant = Instant::now();
}

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub config: Config,
    pub templates: TemplateService,
    pub questionnaires: QuestionnaireService,
}

impl AppStateInner {
    pub fn new(config: Config, db: Database) -> Self {
        Self {
            config,
            templates: TemplateService::new(db.clone()),
            questionnaires: QuestionnaireService::new(db),
        }
    }
}

/// Pagination query parameters
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListParams {
    /// Number of records to skip (default: 0)
    pub skip: Option<i64>,
    /// Maximum number of records to return (default: 100, max: 1000)
    pub limit: Option<i64>,
}

/// Health check response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub version: String,
    pub environment: String,
    pub instance_id: String,
    pub uptime_seconds: u64,
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: state.config.app.project_name.clone(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        environment: state.config.app.environment.to_string(),
        instance_id: state.config.server.instance_id.clone(),
        uptime_seconds: START_TIME.elapsed().as_secs(),
    })
}

/// Create a template
#[utoipa::path(
    post,
    path = "/api/templates",
    tag = "templates",
    request_body = NewTemplate,
    responses(
        (status = 201, description = "Template created", body = Template),
        (status = 422, description = "Invalid template", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn create_template(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewTemplate>,
) -> Result<impl IntoResponse, ErrorEnvelope> {
    info!("Create template request: title='{}'", new.title);

    let template = state.templates.create_template(new).await?;
    Ok((StatusCode::CREATED, Json(template)))
}

/// List templates
#[utoipa::path(
    get,
    path = "/api/templates",
    tag = "templates",
    params(ListParams),
    responses(
        (status = 200, description = "Templates", body = Vec<Template>),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn list_templates(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Vec<Template>>, ErrorEnvelope> {
    let templates = state
        .templates
        .list_templates(params.skip, params.limit)
        .await?;
    Ok(Json(templates))
}

/// Get a template by ID
#[utoipa::path(
    get,
    path = "/api/templates/{id}",
    tag = "templates",
    params(
        ("id" = Uuid, Path, description = "Template UUID")
    ),
    responses(
        (status = 200, description = "Template found", body = Template),
        (status = 404, description = "Template not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn get_template(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Template>, ErrorEnvelope> {
    match state.templates.get_template_by_id(id).await? {
        Some(template) => Ok(Json(template)),
        None => {
            info!("Template not found: {}", id);
            Err(ErrorEnvelope::with_context(
                StatusCode::NOT_FOUND,
                format!("Template {} not found", id),
                context([("template_id", id)]),
            ))
        }
    }
}

/// List questionnaire responses submitted against a template
#[utoipa::path(
    get,
    path = "/api/templates/{id}/responses",
    tag = "questionnaires",
    params(
        ("id" = Uuid, Path, description = "Template UUID"),
        ListParams
    ),
    responses(
        (status = 200, description = "Responses", body = Vec<QuestionnaireResponse>),
        (status = 404, description = "Template not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn list_template_responses(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Vec<QuestionnaireResponse>>, ErrorEnvelope> {
    let responses = state
        .questionnaires
        .list_responses_for_template(id, params.skip, params.limit)
        .await?;
    Ok(Json(responses))
}

/// Submit a questionnaire response
#[utoipa::path(
    post,
    path = "/api/questionnaire-responses",
    tag = "questionnaires",
    request_body = NewQuestionnaireResponse,
    responses(
        (status = 201, description = "Response recorded", body = QuestionnaireResponse),
        (status = 404, description = "Template not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn submit_questionnaire_response(
    State(state): State<AppState>,
    ApiJson(new): ApiJson<NewQuestionnaireResponse>,
) -> Result<impl IntoResponse, ErrorEnvelope> {
    info!("Submit questionnaire response: template_id={}", new.template_id);

    let response = state.questionnaires.submit_response(new).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Get a questionnaire response by ID
#[utoipa::path(
    get,
    path = "/api/questionnaire-responses/{id}",
    tag = "questionnaires",
    params(
        ("id" = Uuid, Path, description = "Questionnaire response UUID")
    ),
    responses(
        (status = 200, description = "Response found", body = QuestionnaireResponse),
        (status = 404, description = "Response not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn get_questionnaire_response(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<QuestionnaireResponse>, ErrorEnvelope> {
    state
        .questionnaires
        .get_response(id)
        .await?
        .map(Json)
        .ok_or_else(|| {
            ErrorEnvelope::with_context(
                StatusCode::NOT_FOUND,
                format!("Questionnaire response {} not found", id),
                context([("response_id", id)]),
            )
        })
}

/// Fallback for known routes called with an unsupported method
pub async fn method_not_allowed(uri: Uri) -> ErrorEnvelope {
    ErrorEnvelope::with_context(
        StatusCode::METHOD_NOT_ALLOWED,
        "Method not allowed",
        context([("path", uri.path())]),
    )
}

/// Fallback for unknown routes
pub async fn not_found(uri: Uri) -> ErrorEnvelope {
    ErrorEnvelope::with_context(
        StatusCode::NOT_FOUND,
        "Resource not found",
        context([("path", uri.path())]),
    )
}
