use axum::{
    extract::{Extension, State},
    response::Html,
};

use slackinviter_core::Counter;

use crate::middleware::Viewer;
use crate::render::IndexPage;
use crate::state::AppState;

/// Invite form, filled from the current snapshot.
pub async fn home_handler(State(state): State<AppState>, Extension(Viewer(visitor)): Extension<Viewer>) -> Html<String> {
    state.metrics.incr(Counter::Requests);
    state.metrics.record_hit();

    let snapshot = state.store.load();
    let page = IndexPage::new(&snapshot, &state.site.captcha_sitekey, &state.site.coc_url, visitor);
    Html(page.render())
}
