//! HTTP request tracing.
//!
//! Every request gets an `http` span carrying the method and path. Responses
//! are logged at `INFO` with latency in milliseconds; 5xx responses are
//! additionally logged at `ERROR` by the failure hook.
//!
//! ```text
//! INFO http{method=GET path=/Ab3dE9}: finished processing request latency=1 ms status=302
//! ```

use axum::body::Body;
use axum::http::Request;
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnFailure, DefaultOnResponse, MakeSpan, TraceLayer};
use tracing::{Level, Span};

/// Span factory for incoming requests.
///
/// Query strings are left out of the span so long target URLs passed as
/// parameters do not end up in every log line.
#[derive(Clone, Copy, Debug, Default)]
pub struct RequestSpan;

impl MakeSpan<Body> for RequestSpan {
    fn make_span(&mut self, request: &Request<Body>) -> Span {
        tracing::info_span!(
            "http",
            method = %request.method(),
            path = %request.uri().path(),
        )
    }
}

pub type HttpTraceLayer = TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RequestSpan>;

/// Builds the trace layer applied to the whole router.
pub fn layer() -> HttpTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(RequestSpan)
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
        .on_failure(
            DefaultOnFailure::new()
                .level(Level::ERROR)
                .latency_unit(LatencyUnit::Millis),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_omits_query_string() {
        let request = Request::builder()
            .uri("/api/dashboard?limit=5")
            .body(Body::empty())
            .unwrap();

        // Without a subscriber the span is disabled; building it must still work.
        let _span = RequestSpan.make_span(&request);
        assert_eq!(request.uri().path(), "/api/dashboard");
    }
}
