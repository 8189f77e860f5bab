use anyhow::{bail, Result};
use async_trait::async_trait;
use std::any::Any;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::backend::DatabaseBackend;
use crate::models::{QuestionnaireResponse, Template};

/// In-process backend used for development (`DATABASE_URL=memory://`) and tests.
///
/// Rows are kept in insertion order; nothing survives a restart.
#[derive(Default)]
pub struct MemoryBackend {
    store: RwLock<Store>,
}

#[derive(Default)]
struct Store {
    templates: Vec<Template>,
    responses: Vec<QuestionnaireResponse>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

fn page<T>(rows: impl Iterator<Item = T>, skip: i64, limit: i64) -> Vec<T> {
    rows.skip(skip.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

#[async_trait]
impl DatabaseBackend for MemoryBackend {
    async fn insert_template(&self, template: &Template) -> Result<()> {
        let mut store = self.store.write().await;
        if store.templates.iter().any(|t| t.id == template.id) {
            bail!("duplicate key: template {} already exists", template.id);
        }
        store.templates.push(template.clone());
        Ok(())
    }

    async fn get_template(&self, id: Uuid) -> Result<Option<Template>> {
        let store = self.store.read().await;
        Ok(store.templates.iter().find(|t| t.id == id).cloned())
    }

    async fn list_templates(&self, skip: i64, limit: i64) -> Result<Vec<Template>> {
        let store = self.store.read().await;
        Ok(page(store.templates.iter().cloned(), skip, limit))
    }

    async fn insert_questionnaire_response(&self, response: &QuestionnaireResponse) -> Result<()> {
        let mut store = self.store.write().await;
        if !store.templates.iter().any(|t| t.id == response.template_id) {
            bail!(
                "foreign key violation: template {} does not exist",
                response.template_id
            );
        }
        if store.responses.iter().any(|r| r.id == response.id) {
            bail!("duplicate key: questionnaire response {} already exists", response.id);
        }
        store.responses.push(response.clone());
        Ok(())
    }

    async fn get_questionnaire_response(&self, id: Uuid) -> Result<Option<QuestionnaireResponse>> {
        let store = self.store.read().await;
        Ok(store.responses.iter().find(|r| r.id == id).cloned())
    }

    async fn list_questionnaire_responses(
        &self,
        template_id: Uuid,
        skip: i64,
        limit: i64,
    ) -> Result<Vec<QuestionnaireResponse>> {
        let store = self.store.read().await;
        Ok(page(
            store
                .responses
                .iter()
                .filter(|r| r.template_id == template_id)
                .cloned(),
            skip,
            limit,
        ))
    }

    async fn test_connection(&self) -> Result<()> {
        Ok(())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
