use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;
use uuid::Uuid;

/// A questionnaire template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Template {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub sections: Vec<TemplateSection>,
    pub version: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One titled group of questions inside a template
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TemplateSection {
    pub title: String,
    /// Free-form question definitions
    #[schema(value_type = Vec<Object>)]
    pub questions: Vec<Map<String, Value>>,
}

/// Payload for creating a template
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewTemplate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub sections: Vec<TemplateSection>,
    /// Defaults to 1
    #[serde(default)]
    pub version: Option<i32>,
    /// Defaults to true
    #[serde(default)]
    pub is_active: Option<bool>,
}

impl Template {
    /// Materialize a new template, filling defaults and stamping timestamps
    pub fn from_new(new: NewTemplate) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: new.title,
            description: new.description,
            sections: new.sections,
            version: new.version.unwrap_or(1),
            is_active: new.is_active.unwrap_or(true),
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_new_template_defaults() {
        let new: NewTemplate = serde_json::from_value(json!({
            "title": "Memoir",
            "sections": [{"title": "Childhood", "questions": [{"q": "Where did you grow up?"}]}]
        }))
        .unwrap();

        let template = Template::from_new(new);
        assert_eq!(template.version, 1);
        assert!(template.is_active);
        assert!(template.description.is_none());
        assert_eq!(template.sections[0].questions[0]["q"], "Where did you grow up?");
        assert_eq!(template.created_at, template.updated_at);
    }

    #[test]
    fn test_new_template_explicit_values() {
        let new: NewTemplate = serde_json::from_value(json!({
            "title": "Guide",
            "description": "How-to",
            "sections": [],
            "version": 3,
            "is_active": false
        }))
        .unwrap();

        let template = Template::from_new(new);
        assert_eq!(template.version, 3);
        assert!(!template.is_active);
        assert_eq!(template.description.as_deref(), Some("How-to"));
    }
}
