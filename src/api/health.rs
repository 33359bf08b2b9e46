use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::state::AppState;
use crate::store::StoreCounts;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub counts: StoreCounts,
}

/// GET /health - Liveness plus document counts
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        database: "connected",
        counts: state.store.counts(),
    })
}
