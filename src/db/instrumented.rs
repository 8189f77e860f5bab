use anyhow::Result;
use async_trait::async_trait;
use std::any::Any;
use std::time::Instant;
use uuid::Uuid;

use crate::db::{Database, DatabaseBackend};
use crate::metrics::registry::{DATABASE_QUERIES_TOTAL, DATABASE_QUERY_DURATION_SECONDS};
use crate::models::{QuestionnaireResponse, Template};

/// A thin wrapper around a DatabaseBackend that records Prometheus metrics
/// for query counts and durations.
pub struct InstrumentedDatabase {
    inner: Database,
}

impl InstrumentedDatabase {
    pub fn new(inner: Database) -> Self {
        Self { inner }
    }

    fn observe(&self, query_type: &'static str, start: Instant) {
        let seconds = start.elapsed().as_secs_f64();
        DATABASE_QUERIES_TOTAL
            .with_label_values(&[query_type])
            .inc();
        DATABASE_QUERY_DURATION_SECONDS
            .with_label_values(&[query_type])
            .observe(seconds);
    }
}

#[async_trait]
impl DatabaseBackend for InstrumentedDatabase {
    async fn insert_template(&self, template: &Template) -> Result<()> {
        let start = Instant::now();
        let res = self.inner.insert_template(template).await;
        self.observe("insert", start);
        res
    }

    async fn get_template(&self, id: Uuid) -> Result<Option<Template>> {
        let start = Instant::now();
        let res = self.inner.get_template(id).await;
        self.observe("select", start);
        res
    }

    async fn list_templates(&self, skip: i64, limit: i64) -> Result<Vec<Template>> {
        let start = Instant::now();
        let res = self.inner.list_templates(skip, limit).await;
        self.observe("select", start);
        res
    }

    async fn insert_questionnaire_response(&self, response: &QuestionnaireResponse) -> Result<()> {
        let start = Instant::now();
        let res = self.inner.insert_questionnaire_response(response).await;
        self.observe("insert", start);
        res
    }

    async fn get_questionnaire_response(&self, id: Uuid) -> Result<Option<QuestionnaireResponse>> {
        let start = Instant::now();
        let res = self.inner.get_questionnaire_response(id).await;
        self.observe("select", start);
        res
    }

    async fn list_questionnaire_responses(
        &self,
        template_id: Uuid,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<QuestionnaireResponse>> {
        let start = Instant::now();
        let res = self
            .inner
            .list_questionnaire_responses(template_id, skip, limit)
            .await;
        self.observe("select", start);
        res
    }

    async fn test_connection(&self) -> Result<()> {
        self.inner.test_connection().await
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
