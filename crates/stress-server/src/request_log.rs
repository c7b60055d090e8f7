use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request};
use axum::middleware::Next;
use axum::response::Response;
use http::{HeaderMap, Method, StatusCode, Uri};
use jiff::Timestamp;
use stress_core::headers::{INTERNAL_PROBE, is_truthy};

/// Request logging middleware
///
/// Writes one line per completed request under the `request_log` target.
/// Internal probes are skipped unless they failed.
pub async fn log_requests(probe_path: Arc<str>, request: Request, next: Next) -> Response {
    let started_at = Timestamp::now();
    let started = Instant::now();

    let method = request.method().clone();
    let uri = request.uri().clone();
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let probe = is_internal_probe(request.headers(), uri.path(), peer, &probe_path);

    let response = next.run(request).await;
    let status = response.status();

    if probe && !is_failure(status) {
        return response;
    }

    let line = format_line(started_at, &method, &uri, status, started.elapsed());
    tracing::info!(target: "request_log", "{line}");

    response
}

/// Classify a request as an internal health probe
///
/// Either the probe header is set, or the request hits the probe path from
/// a loopback peer. An unknown peer never counts as loopback.
pub fn is_internal_probe(headers: &HeaderMap, path: &str, peer: Option<SocketAddr>, probe_path: &str) -> bool {
    if headers.get(INTERNAL_PROBE).is_some_and(is_truthy) {
        return true;
    }

    path == probe_path && peer.is_some_and(|addr| addr.ip().to_canonical().is_loopback())
}

const fn is_failure(status: StatusCode) -> bool {
    status.as_u16() >= 400
}

fn format_line(started_at: Timestamp, method: &Method, uri: &Uri, status: StatusCode, elapsed: Duration) -> String {
    format!(
        "[{}] {method} {uri} {} {:.1}ms",
        started_at.strftime("%Y-%m-%dT%H:%M:%S%.3fZ"),
        status.as_u16(),
        elapsed.as_secs_f64() * 1000.0,
    )
}
