use axum::{
    extract::State,
    http::header::CONTENT_TYPE,
    response::{IntoResponse, Response},
};

use crate::badge;
use crate::state::AppState;

/// Member-count badge: `"total"`, or `"active/total"` when anyone is online.
pub async fn badge_handler(State(state): State<AppState>) -> Response {
    let snapshot = state.store.load();
    let svg = badge::render(badge::SUBJECT, &snapshot.user_count_display(), badge::COLOR);
    ([(CONTENT_TYPE, badge::CONTENT_TYPE)], svg).into_response()
}
