use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::models::{QuestionnaireResponse, Template, TemplateSection};

#[derive(FromRow)]
struct TemplateRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    sections: Json<Vec<TemplateSection>>,
    version: i32,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TemplateRow> for Template {
    fn from(row: TemplateRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description,
            sections: row.sections.0,
            version: row.version,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(FromRow)]
struct QuestionnaireResponseRow {
    id: Uuid,
    template_id: Uuid,
    responses: Json<Map<String, Value>>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<QuestionnaireResponseRow> for QuestionnaireResponse {
    fn from(row: QuestionnaireResponseRow) -> Self {
        Self {
            id: row.id,
            template_id: row.template_id,
            responses: row.responses.0,
            status: row.status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const TEMPLATE_COLUMNS: &str =
    "id, title, description, sections, version, is_active, created_at, updated_at";

const RESPONSE_COLUMNS: &str = "id, template_id, responses, status, created_at, updated_at";

/// Insert a new template
pub async fn insert_template(pool: &PgPool, template: &Template) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO templates (
            id, title, description, sections, version, is_active, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(template.id)
    .bind(&template.title)
    .bind(&template.description)
    .bind(Json(&template.sections))
    .bind(template.version)
    .bind(template.is_active)
    .bind(template.created_at)
    .bind(template.updated_at)
    .execute(pool)
    .await
    .context("Failed to insert template")?;

    Ok(())
}

/// Get a template by ID
pub async fn get_template(pool: &PgPool, id: Uuid) -> Result<Option<Template>> {
    let row = sqlx::query_as::<_, TemplateRow>(&format!(
        "SELECT {} FROM templates WHERE id = $1",
        TEMPLATE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to fetch template")?;

    Ok(row.map(Template::from))
}

/// List templates in creation order
pub async fn list_templates(pool: &PgPool, skip: i64, limit: i64) -> Result<Vec<Template>> {
    let rows = sqlx::query_as::<_, TemplateRow>(&format!(
        "SELECT {} FROM templates ORDER BY created_at, id OFFSET $1 LIMIT $2",
        TEMPLATE_COLUMNS
    ))
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .await
    .context("Failed to list templates")?;

    Ok(rows.into_iter().map(Template::from).collect())
}

/// Insert a questionnaire response; the foreign key rejects unknown templates
pub async fn insert_questionnaire_response(
    pool: &PgPool,
    response: &QuestionnaireResponse,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO questionnaire_responses (
            id, template_id, responses, status, created_at, updated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(response.id)
    .bind(response.template_id)
    .bind(Json(&response.responses))
    .bind(&response.status)
    .bind(response.created_at)
    .bind(response.updated_at)
    .execute(pool)
    .await
    .context("Failed to insert questionnaire response")?;

    Ok(())
}

/// Get a questionnaire response by ID
pub async fn get_questionnaire_response(
    pool: &PgPool,
    id: Uuid,
) -> Result<Option<QuestionnaireResponse>> {
    let row = sqlx::query_as::<_, QuestionnaireResponseRow>(&format!(
        "SELECT {} FROM questionnaire_responses WHERE id = $1",
        RESPONSE_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
    .context("Failed to fetch questionnaire response")?;

    Ok(row.map(QuestionnaireResponse::from))
}

/// List responses for a template in creation order
pub async fn list_questionnaire_responses(
    pool: &PgPool,
    template_id: Uuid,
    skip: i64,
    limit: i64,
) -> Result<Vec<QuestionnaireResponse>> {
    let rows = sqlx::query_as::<_, QuestionnaireResponseRow>(&format!(
        "SELECT {} FROM questionnaire_responses WHERE template_id = $1 \
         ORDER BY created_at, id OFFSET $2 LIMIT $3",
        RESPONSE_COLUMNS
    ))
    .bind(template_id)
    .bind(skip)
    .bind(limit)
    .fetch_all(pool)
    .await
    .context("Failed to list questionnaire responses")?;

    Ok(rows.into_iter().map(QuestionnaireResponse::from).collect())
}
