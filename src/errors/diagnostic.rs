//! Server-side diagnostic capture for internal faults
//!
//! A [`Fault`] is the internal error object an envelope may be built from.
//! It snapshots everything an operator needs (type, message, cause chain,
//! call stack) at the moment the fault is recognized. A [`Diagnostic`] is
//! that snapshot bound to an envelope's `request_id` and context; it only
//! ever goes to the log sink.

use serde::Serialize;
use std::any::Any;
use std::backtrace::{Backtrace, BacktraceStatus};
use std::panic::Location;

use super::context::ErrorContext;

/// Captured internal fault
#[derive(Debug, Clone, Serialize)]
pub struct Fault {
    /// Fault type name (Rust type path, or `"panic"`)
    pub error_type: String,
    /// Display form of the fault
    pub message: String,
    /// Messages of the `source()` chain, outermost first
    pub causes: Vec<String>,
    /// Formatted call stack, one frame line per entry
    pub traceback: Vec<String>,
}

impl Fault {
    /// Capture a typed error together with a backtrace taken now
    pub fn capture<E>(err: &E) -> Self
    where
        E: std::error::Error + 'static,
    {
        let mut causes = Vec::new();
        let mut source = err.source();
        while let Some(cause) = source {
            causes.push(cause.to_string());
            source = cause.source();
        }

        Self {
            error_type: std::any::type_name::<E>().to_string(),
            message: err.to_string(),
            causes,
            traceback: format_backtrace(&Backtrace::force_capture()),
        }
    }

    /// Capture an `anyhow::Error`, preferring the backtrace it already carries
    pub fn from_anyhow(err: &anyhow::Error) -> Self {
        let traceback = match err.backtrace().status() {
            BacktraceStatus::Captured => format_backtrace(err.backtrace()),
            _ => format_backtrace(&Backtrace::force_capture()),
        };

        Self {
            error_type: "anyhow::Error".to_string(),
            message: err.to_string(),
            causes: err.chain().skip(1).map(|c| c.to_string()).collect(),
            traceback,
        }
    }

    /// Capture a panic payload.
    ///
    /// `location` and `backtrace` come from the panic hook when one was
    /// recorded for this panic.
    pub fn from_panic(
        payload: &(dyn Any + Send),
        location: Option<String>,
        backtrace: Option<&Backtrace>,
    ) -> Self {
        let message = panic_message(payload);
        let causes = location
            .map(|loc| vec![format!("panicked at {}", loc)])
            .unwrap_or_default();

        Self {
            error_type: "panic".to_string(),
            message,
            causes,
            traceback: backtrace.map(format_backtrace).unwrap_or_default(),
        }
    }
}

/// Extract the message carried by a panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}

pub(crate) fn format_location(location: &Location<'_>) -> String {
    format!("{}:{}:{}", location.file(), location.line(), location.column())
}

fn format_backtrace(backtrace: &Backtrace) -> Vec<String> {
    backtrace
        .to_string()
        .lines()
        .map(|line| line.trim_end().to_string())
        .filter(|line| !line.is_empty())
        .collect()
}

/// Host and runtime identifiers recorded with each diagnostic
#[derive(Debug, Clone, Serialize)]
pub struct SysInfo {
    pub service_version: &'static str,
    pub rust_version: &'static str,
    pub os: &'static str,
    pub arch: &'static str,
    pub family: &'static str,
    pub hostname: String,
    pub pid: u32,
}

impl SysInfo {
    pub fn current() -> Self {
        Self {
            service_version: env!("CARGO_PKG_VERSION"),
            rust_version: option_env!("CARGO_PKG_RUST_VERSION").unwrap_or("unknown"),
            os: std::env::consts::OS,
            arch: std::env::consts::ARCH,
            family: std::env::consts::FAMILY,
            hostname: std::env::var("HOSTNAME").unwrap_or_else(|_| "unknown".to_string()),
            pid: std::process::id(),
        }
    }
}

/// Diagnostic bundle emitted to the log sink for faults with an internal cause
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    pub request_id: String,
    #[serde(flatten)]
    pub fault: Fault,
    pub sys_info: SysInfo,
    pub context: ErrorContext,
}
