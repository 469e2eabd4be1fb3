//! # HTTP Metrics Middleware
//!
//! Records request counts, error counts, and latency histograms through
//! the `metrics` facade. Path labels are normalized (UUID segments
//! collapsed to `{id}`) to keep label cardinality bounded.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

/// Replace UUID path segments with `{id}`.
fn normalize_path(path: &str) -> String {
    path.split('/')
        .map(|segment| {
            let is_uuid = segment.len() == 36
                && segment.chars().enumerate().all(|(i, c)| {
                    if i == 8 || i == 13 || i == 18 || i == 23 {
                        c == '-'
                    } else {
                        c.is_ascii_hexdigit()
                    }
                });
            if is_uuid {
                "{id}"
            } else {
                segment
            }
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Middleware that records HTTP request metrics.
pub async fn track_http(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = normalize_path(request.uri().path());
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status().as_u16().to_string();
    metrics::counter!(
        "aduana_http_requests_total",
        "method" => method.clone(),
        "path" => path.clone(),
        "status" => status.clone()
    )
    .increment(1);
    metrics::histogram!(
        "aduana_http_request_duration_seconds",
        "method" => method.clone(),
        "path" => path.clone()
    )
    .record(start.elapsed().as_secs_f64());
    if response.status().is_client_error() || response.status().is_server_error() {
        metrics::counter!(
            "aduana_http_errors_total",
            "method" => method,
            "path" => path,
            "status" => status
        )
        .increment(1);
    }

    response
}

// ─── Tests ───────────────────────────────────────────────────────────
