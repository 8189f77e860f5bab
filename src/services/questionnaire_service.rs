use axum::http::StatusCode;
use tracing::info;
use uuid::Uuid;

use crate::db::Database;
use crate::errors::{context, ErrorEnvelope, Fault};
use crate::models::{NewQuestionnaireResponse, QuestionnaireResponse};

use super::page_bounds;

#[derive(Clone)]
pub struct QuestionnaireService {
    db: Database,
}

impl QuestionnaireService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Record answers for an existing template
    pub async fn submit_response(
        &self,
        new: NewQuestionnaireResponse,
    ) -> Result<QuestionnaireResponse, ErrorEnvelope> {
        self.require_template(new.template_id).await?;

        let response = QuestionnaireResponse::from_new(new);
        self.db
            .insert_questionnaire_response(&response)
            .await
            .map_err(|e| {
                ErrorEnvelope::from_fault(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to submit questionnaire response",
                    Fault::from_anyhow(&e),
                    context([("template_id", response.template_id)]),
                )
            })?;

        info!(
            response_id = %response.id,
            template_id = %response.template_id,
            "Questionnaire response submitted"
        );
        Ok(response)
    }

    pub async fn get_response(
        &self,
        id: Uuid,
    ) -> Result<Option<QuestionnaireResponse>, ErrorEnvelope> {
        self.db.get_questionnaire_response(id).await.map_err(|e| {
            ErrorEnvelope::from_fault(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to retrieve questionnaire response {}", id),
                Fault::from_anyhow(&e),
                context([("response_id", id)]),
            )
        })
    }

    pub async fn list_responses_for_template(
        &self,
        template_id: Uuid,
        skip: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Vec<QuestionnaireResponse>, ErrorEnvelope> {
        self.require_template(template_id).await?;
        let (skip, limit) = page_bounds(skip, limit);

        self.db
            .list_questionnaire_responses(template_id, skip, limit)
            .await
            .map_err(|e| {
                ErrorEnvelope::from_fault(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to retrieve questionnaire responses",
                    Fault::from_anyhow(&e),
                    context([("template_id", template_id)]),
                )
            })
    }

    async fn require_template(&self, template_id: Uuid) -> Result<(), ErrorEnvelope> {
        let template = self.db.get_template(template_id).await.map_err(|e| {
            ErrorEnvelope::from_fault(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to retrieve template {}", template_id),
                Fault::from_anyhow(&e),
                context([("template_id", template_id)]),
            )
        })?;

        match template {
            Some(_) => Ok(()),
            None => Err(ErrorEnvelope::with_context(
                StatusCode::NOT_FOUND,
                format!("Template {} not found", template_id),
                context([("template_id", template_id)]),
            )),
        }
    }
}
