//! Application services. Every failure leaves here as an [`ErrorEnvelope`].
//!
//! [`ErrorEnvelope`]: crate::errors::ErrorEnvelope

pub mod questionnaire_service;
pub mod template_service;

pub use questionnaire_service::QuestionnaireService;
pub use template_service::TemplateService;

/// Default page size for list operations
pub const DEFAULT_LIMIT: i64 = 100;
/// Upper bound on page size for list operations
pub const MAX_LIMIT: i64 = 1000;

/// Normalize `skip`/`limit` query values
pub fn page_bounds(skip: Option<i64>, limit: Option<i64>) -> (i64, i64) {
    let skip = skip.unwrap_or(0).max(0);
    let limit = limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT);
    (skip, limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_bounds() {
        assert_eq!(page_bounds(None, None), (0, 100));
        assert_eq!(page_bounds(Some(-5), Some(0)), (0, 1));
        assert_eq!(page_bounds(Some(20), Some(5000)), (20, 1000));
    }
}
