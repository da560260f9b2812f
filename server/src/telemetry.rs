//! Logging setup and per-request tracing.
//!
//! Log verbosity comes from `RUST_LOG` (default `info`), for example
//! `RUST_LOG=taskboard_server=debug` to see rejected request bodies.
//!
//! Every request gets a fresh UUID trace id. The handler runs inside a
//! `request` span carrying that id, and the id is echoed to the caller in
//! the `trace-id` response header so a client report can be matched to the
//! server log line.

use std::time::Instant;

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{info, info_span, warn, Instrument};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use crate::config::LogFormat;

pub const TRACE_ID_HEADER: HeaderName = HeaderName::from_static("trace-id");

/// Install the global subscriber. A second call only logs a warning.
pub fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = match format {
        LogFormat::Pretty => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    if let Err(err) = result {
        warn!(error = %err, "tracing init failed");
    }
}

pub async fn trace_requests(request: Request, next: Next) -> Response {
    let trace_id = Uuid::new_v4();
    let span = info_span!(
        "request",
        %trace_id,
        method = %request.method(),
        path = %request.uri().path(),
    );
    let started_at = Instant::now();

    let mut response = next.run(request).instrument(span.clone()).await;

    span.in_scope(|| {
        info!(
            status = response.status().as_u16(),
            latency_ms = started_at.elapsed().as_millis() as u64,
            "request completed"
        );
    });
    if let Ok(value) = HeaderValue::from_str(&trace_id.to_string()) {
        response.headers_mut().insert(TRACE_ID_HEADER, value);
    }
    response
}
