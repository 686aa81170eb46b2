use std::net::SocketAddr;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

/// Caller address as handed to admission: `ip:port` from the socket, or
/// the first `X-Forwarded-For` hop when the proxy is trusted. Left as a
/// raw string so admission decides what is parseable.
#[derive(Clone, Debug, Default)]
pub struct ClientAddr(pub String);

/// Middleware to record the caller address in request extensions.
///
/// The socket peer comes from `ConnectInfo`, so the server must be run with
/// `into_make_service_with_connect_info::<SocketAddr>()`.
pub async fn extract_client_addr(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string());

    let forwarded = if state.site.trust_forwarded_for {
        first_forwarded_hop(request.headers())
    } else {
        None
    };

    let addr = forwarded.or(peer).unwrap_or_default();
    request.extensions_mut().insert(ClientAddr(addr));

    next.run(request).await
}

/// Left-most entry of `X-Forwarded-For`, which is the original client.
fn first_forwarded_hop(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(',')
        .next()
        .map(str::trim)
        .filter(|hop| !hop.is_empty())
        .map(str::to_owned)
}
