use std::collections::BTreeMap;

use axum::{Json, extract::State};
use serde::Serialize;

use slackinviter_core::SyncPhase;

use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct DebugVars {
    pub metrics: BTreeMap<&'static str, u64>,
    pub sync: SyncStatus,
}

#[derive(Debug, Serialize)]
pub struct SyncStatus {
    pub phase: SyncPhase,
    pub generation: u64,
    /// RFC 3339; `null` before the first published pass.
    pub synced_at: Option<String>,
}

/// Counters, gauges from the current snapshot, and the sync loop's state.
pub async fn debug_vars_handler(State(state): State<AppState>) -> Json<DebugVars> {
    let snapshot = state.store.load();

    let mut metrics = state.metrics.report();
    metrics.insert("user_count", snapshot.total_count);
    metrics.insert("active_user_count", snapshot.active_count);

    Json(DebugVars {
        metrics,
        sync: SyncStatus {
            phase: state.store.phase(),
            generation: state.store.generation(),
            synced_at: snapshot.synced_at.map(|t| t.to_rfc3339()),
        },
    })
}
