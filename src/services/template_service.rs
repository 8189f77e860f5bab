use axum::http::StatusCode;
use tracing::info;
use uuid::Uuid;

use crate::db::Database;
use crate::errors::{context, ErrorContext, ErrorEnvelope, Fault};
use crate::models::{NewTemplate, Template};

use super::page_bounds;

#[derive(Clone)]
pub struct TemplateService {
    db: Database,
}

impl TemplateService {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    pub async fn create_template(&self, new: NewTemplate) -> Result<Template, ErrorEnvelope> {
        if new.title.trim().is_empty() {
            return Err(ErrorEnvelope::unprocessable(
                "Template title must not be empty",
                context([("field", "title")]),
            ));
        }

        let template = Template::from_new(new);
        self.db.insert_template(&template).await.map_err(|e| {
            ErrorEnvelope::from_fault(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to create template",
                Fault::from_anyhow(&e),
                ErrorContext::new(),
            )
        })?;

        info!(template_id = %template.id, title = %template.title, "Template created");
        Ok(template)
    }

    pub async fn get_template_by_id(&self, id: Uuid) -> Result<Option<Template>, ErrorEnvelope> {
        self.db.get_template(id).await.map_err(|e| {
            ErrorEnvelope::from_fault(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to retrieve template {}", id),
                Fault::from_anyhow(&e),
                context([("template_id", id)]),
            )
        })
    }

    pub async fn list_templates(
        &self,
        skip: Option<i64>,
        limit: Option<i64>,
    ) -> Result<Vec<Template>, ErrorEnvelope> {
        let (skip, limit) = page_bounds(skip, limit);

        self.db.list_templates(skip, limit).await.map_err(|e| {
            ErrorEnvelope::from_fault(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to retrieve templates",
                Fault::from_anyhow(&e),
                ErrorContext::new(),
            )
        })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::{DatabaseBackend, MemoryBackend};
    use crate::errors::ContextValue;
    use crate::models::QuestionnaireResponse;
    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use std::any::Any;
    use std::sync::Arc;

    /// Backend whose every call fails, for exercising the fault paths
    pub(crate) struct BrokenBackend;

    #[async_trait]
    impl DatabaseBackend for BrokenBackend {
        async fn insert_template(&self, _template: &Template) -> Result<()> {
            bail!("connection refused")
        }

        async fn get_template(&self, _id: Uuid) -> Result<Option<Template>> {
            bail!("connection refused")
        }

        async fn list_templates(&self, _skip: i64, _limit: i64) -> Result<Vec<Template>> {
            bail!("connection refused")
        }

        async fn insert_questionnaire_response(&self, _r: &QuestionnaireResponse) -> Result<()> {
            bail!("connection refused")
        }

        async fn get_questionnaire_response(
            &self,
            _id: Uuid,
        ) -> Result<Option<QuestionnaireResponse>> {
            bail!("connection refused")
        }

        async fn list_questionnaire_responses(
            &self,
            _template_id: Uuid,
            _skip: i64,
            _limit: i64,
        ) -> Result<Vec<QuestionnaireResponse>> {
            bail!("connection refused")
        }

        async fn test_connection(&self) -> Result<()> {
            bail!("connection refused")
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn new_template(title: &str) -> NewTemplate {
        NewTemplate {
            title: title.to_string(),
            description: Some("placeholder".to_string()),
            sections: Vec::new(),
            version: None,
            is_active: None,
        }
    }

    fn memory_service() -> TemplateService {
        TemplateService::new(Arc::new(MemoryBackend::new()))
    }

    #[tokio::test]
    async fn test_create_then_get() {
        let service = memory_service();
        let created = service.create_template(new_template("Memoir")).await.unwrap();

        let fetched = service.get_template_by_id(created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
        assert_eq!(service.get_template_by_id(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_blank_title_is_classified() {
        let err = memory_service()
            .create_template(new_template("   "))
            .await
            .unwrap_err();

        assert_eq!(err.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.context()["field"], ContextValue::from("title"));
        assert!(err.diagnostic().is_none());
    }

    #[tokio::test]
    async fn test_list_applies_bounds() {
        let service = memory_service();
        for i in 0..3 {
            service
                .create_template(new_template(&format!("t{}", i)))
                .await
                .unwrap();
        }

        assert_eq!(service.list_templates(None, None).await.unwrap().len(), 3);
        assert_eq!(service.list_templates(Some(1), Some(1)).await.unwrap()[0].title, "t1");
    }

    #[tokio::test]
    async fn test_storage_failures_carry_diagnostic() {
        let service = TemplateService::new(Arc::new(BrokenBackend));

        let err = service.create_template(new_template("x")).await.unwrap_err();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.detail(), "Failed to create template");
        let diagnostic = err.diagnostic().expect("fault captured");
        assert_eq!(diagnostic.fault.message, "connection refused");

        let id = Uuid::new_v4();
        let err = service.get_template_by_id(id).await.unwrap_err();
        assert_eq!(err.detail(), format!("Failed to retrieve template {}", id));
        assert!(err.diagnostic().is_some());

        let err = service.list_templates(None, None).await.unwrap_err();
        assert_eq!(err.detail(), "Failed to retrieve templates");
    }
}
