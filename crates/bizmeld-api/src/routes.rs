use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{json, Value};

use crate::serialize;
use crate::state::SharedState;

pub fn app_router(state: SharedState) -> Router {
    Router::new()
        .route("/api/data", get(get_all_data))
        .route("/api/data/records", get(get_records))
        .route("/api/data/activity", get(get_activity))
        .route("/api/data/report", get(get_report))
        .route("/api/data/deck", get(get_deck))
        .with_state(state)
}

/// The unified composite dataset.
async fn get_all_data(State(state): State<SharedState>) -> Result<Json<Value>, StatusCode> {
    serialize::composite_to_json(&state.composite)
        .map(|data| Json(json!({ "data": data })))
        .map_err(|err| {
            tracing::error!("failed to serialize composite dataset: {err}");
            StatusCode::INTERNAL_SERVER_ERROR
        })
}

/// The raw structured-records document, as ingested.
async fn get_records(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({ "data": state.raw.records }))
}

/// The raw activity rows, or a soft error body when the source was
/// unavailable at startup.
async fn get_activity(State(state): State<SharedState>) -> Json<Value> {
    match &state.raw.activity {
        Some(table) => Json(json!({ "data": table })),
        None => Json(json!({ "error": "membership activity data not available" })),
    }
}

/// The per-page tables extracted from the paginated report.
async fn get_report(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({ "data": state.raw.report }))
}

/// The presentation summary as extracted, before normalization.
async fn get_deck(State(state): State<SharedState>) -> Json<Value> {
    Json(json!({ "data": state.raw.deck }))
}
