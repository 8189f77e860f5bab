//! Structured error reporting for API responses

pub mod context;
pub mod diagnostic;
pub mod envelope;
pub mod panic;

pub use context::{context, ContextValue, ErrorContext};
pub use diagnostic::{Diagnostic, Fault, SysInfo};
pub use envelope::{EnvelopeReceipt, ErrorBody, ErrorEnvelope, INTERNAL_SERVER_ERROR_DETAIL};
