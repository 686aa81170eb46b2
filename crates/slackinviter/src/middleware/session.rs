use axum::{
    extract::{Request, State},
    http::header::COOKIE,
    middleware::Next,
    response::{Html, IntoResponse, Response},
};
use tracing::warn;

use slackinviter_core::Visitor;

use crate::render::sign_in_page;
use crate::state::AppState;

/// Who is looking at the page. `None` when no session gate is configured.
#[derive(Clone, Debug, Default)]
pub struct Viewer(pub Option<Visitor>);

/// Gate the home page behind an identity-provider session.
///
/// Without a configured verifier every request passes with an anonymous
/// [`Viewer`]. With one, visitors lacking an active session get the sign-in
/// page (HTTP 200) instead of the form; lookup failures are treated the same.
pub async fn session_gate(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let Some(verifier) = state.sessions.as_ref() else {
        request.extensions_mut().insert(Viewer(None));
        return next.run(request).await;
    };

    let cookies = request
        .headers()
        .get(COOKIE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .unwrap_or_default();

    match verifier.visitor(&cookies).await {
        Ok(Some(visitor)) => {
            request.extensions_mut().insert(Viewer(Some(visitor)));
            next.run(request).await
        }
        Ok(None) => Html(sign_in_page()).into_response(),
        Err(e) => {
            warn!(error = %e, "session lookup failed");
            Html(sign_in_page()).into_response()
        }
    }
}
