use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;

pub const DEFAULT_RESPONSE_STATUS: &str = "submitted";

/// Answers submitted against a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct QuestionnaireResponse {
    pub id: Uuid,
    pub template_id: Uuid,
    #[schema(value_type = Object)]
    pub responses: Map<String, Value>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Payload for submitting questionnaire answers
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewQuestionnaireResponse {
    pub template_id: Uuid,
    #[schema(value_type = Object)]
    pub responses: Map<String, Value>,
    /// Defaults to "submitted"
    #[serde(default)]
    pub status: Option<String>,
}

impl QuestionnaireResponse {
    pub fn from_new(new: NewQuestionnaireResponse) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            template_id: new.template_id,
            responses: new.responses,
            status: new
                .status
                .unwrap_or_else(|| DEFAULT_RESPONSE_STATUS.to_string()),
            created_at: now,
            updated_at: now,
        }
    }
}
