use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use super::context::ErrorContext;
use super::diagnostic::{Diagnostic, Fault, SysInfo};

/// Detail string used for every unclassified failure
pub const INTERNAL_SERVER_ERROR_DETAIL: &str = "Internal server error";

/// Normalized, client-safe error outcome.
///
/// Every envelope owns a fresh `request_id` minted at construction. When
/// built from an internal [`Fault`] the envelope also carries a
/// [`Diagnostic`], which is logged once at construction and never
/// serialized to the client.
#[derive(Debug)]
pub struct ErrorEnvelope {
    status: StatusCode,
    detail: String,
    request_id: String,
    context: ErrorContext,
    diagnostic: Option<Box<Diagnostic>>,
}

/// Client-visible error body
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Always "error"
    pub status: String,
    /// Human-readable error description
    pub detail: String,
    /// Correlation id for locating the server-side log entry
    pub request_id: String,
    /// Caller-supplied context, omitted when empty
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Object)]
    pub context: Option<ErrorContext>,
}

/// Marker attached to responses rendered from an [`ErrorEnvelope`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvelopeReceipt {
    pub request_id: String,
    pub status: StatusCode,
    pub has_diagnostic: bool,
}

impl ErrorEnvelope {
    /// Create a classified error with no context
    pub fn new(status: StatusCode, detail: impl Into<String>) -> Self {
        Self::build(status, detail.into(), None, ErrorContext::new())
    }

    /// Create a classified error carrying caller context
    pub fn with_context(status: StatusCode, detail: impl Into<String>, context: ErrorContext) -> Self {
        Self::build(status, detail.into(), None, context)
    }

    /// Create an error from an internal fault.
    ///
    /// The diagnostic bundle is written to the log sink here, exactly once.
    pub fn from_fault(
        status: StatusCode,
        detail: impl Into<String>,
        fault: Fault,
        context: ErrorContext,
    ) -> Self {
        Self::build(status, detail.into(), Some(fault), context)
    }

    fn build(
        status: StatusCode,
        detail: String,
        fault: Option<Fault>,
        context: ErrorContext,
    ) -> Self {
        let request_id = Uuid::new_v4().to_string();

        let diagnostic = fault.map(|fault| {
            let diagnostic = Diagnostic {
                request_id: request_id.clone(),
                fault,
                sys_info: SysInfo::current(),
                context: context.clone(),
            };
            log_diagnostic(status, &detail, &diagnostic);
            Box::new(diagnostic)
        });

        Self {
            status,
            detail,
            request_id,
            context,
            diagnostic,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    pub fn detail(&self) -> &str {
        &self.detail
    }

    pub fn request_id(&self) -> &str {
        &self.request_id
    }

    pub fn context(&self) -> &ErrorContext {
        &self.context
    }

    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        self.diagnostic.as_deref()
    }

    /// The view serialized to clients. Never includes the diagnostic.
    pub fn external_view(&self) -> ErrorBody {
        ErrorBody {
            status: "error".to_string(),
            detail: self.detail.clone(),
            request_id: self.request_id.clone(),
            context: if self.context.is_empty() {
                None
            } else {
                Some(self.context.clone())
            },
        }
    }

    pub fn receipt(&self) -> EnvelopeReceipt {
        EnvelopeReceipt {
            request_id: self.request_id.clone(),
            status: self.status,
            has_diagnostic: self.diagnostic.is_some(),
        }
    }
}

fn log_diagnostic(status: StatusCode, detail: &str, diagnostic: &Diagnostic) {
    let error_trace = serde_json::to_string(diagnostic)
        .unwrap_or_else(|e| format!("<unserializable diagnostic: {}>", e));
    let context = serde_json::to_string(&diagnostic.context).unwrap_or_default();

    error!(
        request_id = %diagnostic.request_id,
        status = status.as_u16(),
        error_type = %diagnostic.fault.error_type,
        message = %diagnostic.fault.message,
        traceback = %diagnostic.fault.traceback.join("\n"),
        context = %context,
        error_trace = %error_trace,
        "Detailed error occurred: {}",
        detail
    );
}

impl IntoResponse for ErrorEnvelope {
    fn into_response(self) -> Response {
        let receipt = self.receipt();
        let mut response = (self.status, Json(self.external_view())).into_response();
        response.extensions_mut().insert(receipt);
        response
    }
}

/// Helpers for common errors
impl ErrorEnvelope {
    pub fn bad_request(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, detail)
    }

    pub fn not_found(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, detail)
    }

    pub fn unprocessable(detail: impl Into<String>, context: ErrorContext) -> Self {
        Self::with_context(StatusCode::UNPROCESSABLE_ENTITY, detail, context)
    }

    /// Generic 500 for a fault that has no classification
    pub fn internal_server_error(fault: Fault) -> Self {
        Self::from_fault(
            StatusCode::INTERNAL_SERVER_ERROR,
            INTERNAL_SERVER_ERROR_DETAIL,
            fault,
            ErrorContext::new(),
        )
    }
}

impl From<anyhow::Error> for ErrorEnvelope {
    fn from(err: anyhow::Error) -> Self {
        Self::internal_server_error(Fault::from_anyhow(&err))
    }
}

impl From<JsonRejection> for ErrorEnvelope {
    fn from(rejection: JsonRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<PathRejection> for ErrorEnvelope {
    fn from(rejection: PathRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

impl From<QueryRejection> for ErrorEnvelope {
    fn from(rejection: QueryRejection) -> Self {
        Self::new(rejection.status(), rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::context::{context, ContextValue};
    use serde_json::json;

    fn io_fault() -> Fault {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "Original error");
        Fault::capture(&err)
    }

    #[test]
    fn test_envelope_basics() {
        let err = ErrorEnvelope::new(StatusCode::BAD_REQUEST, "Test error");

        assert_eq!(err.status_code(), 400);
        assert_eq!(err.detail(), "Test error");
        assert!(Uuid::parse_str(err.request_id()).is_ok());
        assert!(err.context().is_empty());
        assert!(err.diagnostic().is_none());
    }

    #[test]
    fn test_request_ids_are_unique() {
        let a = ErrorEnvelope::bad_request("same");
        let b = ErrorEnvelope::bad_request("same");
        assert_ne!(a.request_id(), b.request_id());
    }

    #[test]
    fn test_diagnostic_present_only_with_fault() {
        let plain = ErrorEnvelope::with_context(
            StatusCode::CONFLICT,
            "Duplicate",
            context([("key", "value")]),
        );
        assert!(plain.diagnostic().is_none());

        let faulted = ErrorEnvelope::from_fault(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
            io_fault(),
            ErrorContext::new(),
        );
        let diagnostic = faulted.diagnostic().expect("diagnostic expected");
        assert_eq!(diagnostic.request_id, faulted.request_id());
        assert_eq!(diagnostic.fault.message, "Original error");
        assert!(diagnostic.fault.error_type.contains("io::error::Error"));
    }

    #[test]
    fn test_external_view_omits_empty_context() {
        let err = ErrorEnvelope::new(StatusCode::BAD_REQUEST, "Test error");
        let value = serde_json::to_value(err.external_view()).unwrap();

        assert_eq!(value["status"], "error");
        assert_eq!(value["detail"], "Test error");
        assert_eq!(value["request_id"], err.request_id());
        assert!(value.get("context").is_none());
    }

    #[test]
    fn test_external_view_excludes_diagnostic() {
        let err = ErrorEnvelope::from_fault(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error with internal exception",
            io_fault(),
            context([("operation", ContextValue::from("test_internal_error"))]),
        );
        let value = serde_json::to_value(err.external_view()).unwrap();

        assert_eq!(value["context"], json!({"operation": "test_internal_error"}));
        assert!(value.get("traceback").is_none());
        assert!(value.get("error_type").is_none());
        assert!(!value.to_string().contains("Original error"));
    }

    #[test]
    fn test_into_response_sets_status_and_receipt() {
        let err = ErrorEnvelope::not_found("Template abc not found");
        let request_id = err.request_id().to_string();
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let receipt = response
            .extensions()
            .get::<EnvelopeReceipt>()
            .expect("receipt attached");
        assert_eq!(receipt.request_id, request_id);
        assert!(!receipt.has_diagnostic);
    }

    #[test]
    fn test_anyhow_conversion_is_generic_500() {
        let err: ErrorEnvelope = anyhow::anyhow!("pool timed out").into();

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.detail(), INTERNAL_SERVER_ERROR_DETAIL);
        assert!(err.diagnostic().is_some());
        assert!(!serde_json::to_string(&err.external_view())
            .unwrap()
            .contains("pool timed out"));
    }
}
