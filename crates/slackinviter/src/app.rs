// Router assembly
//
// Middleware layers run outermost-last: tracing wraps everything, then the
// caller-address extractor. The home page additionally sits behind HTTPS
// enforcement and the optional session gate.

use axum::{
    Router,
    middleware::from_fn_with_state,
    routing::{get, post},
};
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::middleware::{enforce_https, extract_client_addr, session_gate};
use crate::routes::{badge_handler, debug_vars_handler, home_handler, invite_handler, not_found};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let home = get(home_handler)
        .layer(from_fn_with_state(state.clone(), session_gate))
        .layer(from_fn_with_state(state.clone(), enforce_https));

    Router::new()
        .route("/", home)
        .route("/invite", post(invite_handler).fallback(not_found))
        .route("/invite/", post(invite_handler).fallback(not_found))
        .route("/badge.svg", get(badge_handler).fallback(not_found))
        .route("/badge", get(badge_handler).fallback(not_found))
        .route("/debug/vars", get(debug_vars_handler))
        .nest_service("/static", ServeDir::new(&state.site.static_dir))
        .fallback(not_found)
        .layer(from_fn_with_state(state.clone(), extract_client_addr))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
