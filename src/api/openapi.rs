use utoipa::OpenApi;

use crate::api::handlers::{HealthResponse, ListParams};
use crate::errors::ErrorBody;
use crate::models::{
    NewQuestionnaireResponse, NewTemplate, QuestionnaireResponse, Template, TemplateSection,
};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "AudioV4 API",
        version = "0.1.0",
        description = "Backend for an AI-powered audiobook generation platform. Manages questionnaire templates and the responses submitted against them. Every error is returned as a JSON envelope carrying a request_id for log correlation.",
    ),
    paths(
        crate::api::handlers::health,
        crate::api::handlers::create_template,
        crate::api::handlers::list_templates,
        crate::api::handlers::get_template,
        crate::api::handlers::list_template_responses,
        crate::api::handlers::submit_questionnaire_response,
        crate::api::handlers::get_questionnaire_response,
    ),
    components(
        schemas(
            Template,
            TemplateSection,
            NewTemplate,
            QuestionnaireResponse,
            NewQuestionnaireResponse,
            ErrorBody,
            HealthResponse,
            ListParams,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "templates", description = "Questionnaire template management"),
        (name = "questionnaires", description = "Questionnaire response submission and retrieval"),
    )
)]
pub struct ApiDoc;
