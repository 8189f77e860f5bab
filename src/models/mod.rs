pub mod questionnaire;
pub mod template;

pub use questionnaire::{NewQuestionnaireResponse, QuestionnaireResponse};
pub use template::{NewTemplate, Template, TemplateSection};
