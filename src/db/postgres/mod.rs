pub mod connection;
pub mod queries;

use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::backend::DatabaseBackend;
use crate::models::{QuestionnaireResponse, Template};

pub struct PostgresBackend {
    pool: PgPool,
}

impl PostgresBackend {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DatabaseBackend for PostgresBackend {
    async fn insert_template(&self, template: &Template) -> Result<()> {
        queries::insert_template(&self.pool, template).await
    }

    async fn get_template(&self, id: Uuid) -> Result<Option<Template>> {
        queries::get_template(&self.pool, id).await
    }

    async fn list_templates(&self, skip: i64, limit: i64) -> Result<Vec<Template>> {
        queries::list_templates(&self.pool, skip, limit).await
    }

    async fn insert_questionnaire_response(&self, response: &QuestionnaireResponse) -> Result<()> {
        queries::insert_questionnaire_response(&self.pool, response).await
    }

    async fn get_questionnaire_response(&self, id: Uuid) -> Result<Option<QuestionnaireResponse>> {
        queries::get_questionnaire_response(&self.pool, id).await
    }

    async fn list_questionnaire_responses(
        &self,
        template_id: Uuid,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<QuestionnaireResponse>> {
        queries::list_questionnaire_responses(&self.pool, template_id, skip, limit).await
    }

    async fn test_connection(&self) -> Result<()> {
        connection::test_connection(&self.pool).await
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
