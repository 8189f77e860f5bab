//! Request error translation.
//!
//! Wraps one request-handling invocation. Successful responses pass through
//! untouched. Responses rendered from an [`ErrorEnvelope`] are classified
//! failures and already carry their JSON body. A panic anywhere below this
//! layer is unclassified: it is replaced by a fresh 500 envelope whose
//! diagnostic (message, location, call stack) goes to the log sink only.

use axum::{extract::Request, middleware::Next, response::IntoResponse, response::Response};
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use tracing::debug;

use crate::errors::panic::{self, PanicScope};
use crate::errors::{EnvelopeReceipt, ErrorEnvelope, Fault};
use crate::metrics::ERROR_RESPONSES_TOTAL;

pub async fn translate_errors(request: Request, next: Next) -> Response {
    panic::install_hook();

    let method = request.method().clone();
    let path = request.uri().path().to_string();

    match AssertUnwindSafe(PanicScope::new(next.run(request)))
        .catch_unwind()
        .await
    {
        Ok(response) => {
            if let Some(receipt) = response.extensions().get::<EnvelopeReceipt>() {
                debug!(
                    request_id = %receipt.request_id,
                    status = receipt.status.as_u16(),
                    method = %method,
                    path = %path,
                    "Classified error response"
                );
                ERROR_RESPONSES_TOTAL
                    .with_label_values(&["classified", receipt.status.as_str()])
                    .inc();
            }
            response
        }
        Err(payload) => {
            let captured = panic::take_captured();
            let fault = Fault::from_panic(
                payload.as_ref(),
                captured.as_ref().and_then(|c| c.location.clone()),
                captured.as_ref().map(|c| &c.backtrace),
            );
            let envelope = ErrorEnvelope::internal_server_error(fault);

            debug!(
                request_id = %envelope.request_id(),
                method = %method,
                path = %path,
                "Unhandled fault translated to internal server error"
            );
            ERROR_RESPONSES_TOTAL
                .with_label_values(&["unclassified", envelope.status().as_str()])
                .inc();

            envelope.into_response()
        }
    }
}
