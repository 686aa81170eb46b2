use axum::{
    extract::{Request, State},
    http::{
        StatusCode,
        header::{HOST, LOCATION},
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::state::AppState;

/// Permanently redirect requests a TLS-terminating proxy saw as plain HTTP.
///
/// Only active when `enforce_https` is set. Requests without
/// `X-Forwarded-Proto` are passed through.
pub async fn enforce_https(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if !state.site.enforce_https {
        return next.run(request).await;
    }

    let plain = request
        .headers()
        .get("x-forwarded-proto")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|proto| proto.eq_ignore_ascii_case("http"));

    let host = request
        .uri()
        .host()
        .map(str::to_owned)
        .or_else(|| {
            request
                .headers()
                .get(HOST)
                .and_then(|v| v.to_str().ok())
                .map(str::to_owned)
        });

    match (plain, host) {
        (true, Some(host)) => {
            let path = request
                .uri()
                .path_and_query()
                .map_or("/", |pq| pq.as_str());
            let target = format!("https://{host}{path}");
            debug!(%target, "redirecting to https");
            (StatusCode::MOVED_PERMANENTLY, [(LOCATION, target)]).into_response()
        }
        _ => next.run(request).await,
    }
}
