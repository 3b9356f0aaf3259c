use std::time::Duration;

use crate::error::ConvertError;

/// Observer for the client's HTTP traffic.
///
/// Every method defaults to a no-op, so an implementation only overrides the
/// events it cares about. Hooks run inline on the request path and should not
/// block.
pub trait RequestHooks: Send + Sync {
    fn on_request(&self, _request_id: &str, _method: &str, _url: &str) {}

    fn on_response(&self, _request_id: &str, _method: &str, _url: &str, _status: u16, _elapsed: Duration) {}

    fn on_error(&self, _request_id: &str, _method: &str, _url: &str, _error: &ConvertError) {}
}

/// Hooks that emit one structured `tracing` event per request phase.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingHooks;

impl RequestHooks for TracingHooks {
    fn on_request(&self, request_id: &str, method: &str, url: &str) {
        tracing::info!(
            request_id = %request_id,
            method = %method,
            url = %url,
            "Request started"
        );
    }

    fn on_response(&self, request_id: &str, method: &str, url: &str, status: u16, elapsed: Duration) {
        tracing::info!(
            request_id = %request_id,
            method = %method,
            url = %url,
            status = status,
            duration_ms = %elapsed.as_millis(),
            "Response received"
        );
    }

    fn on_error(&self, request_id: &str, method: &str, url: &str, error: &ConvertError) {
        tracing::error!(
            request_id = %request_id,
            method = %method,
            url = %url,
            error_code = error.error_code(),
            error_message = %error,
            "Request failed"
        );
    }
}
