pub mod error_translator;
pub mod logging;

pub use error_translator::translate_errors;
pub use logging::logging_middleware;
