use axum::{extract::State, routing::get, Json, Router};

use pulse_core::models::{TimeSlot, Trainer, Zone};

use crate::error::AppError;
use crate::state::AppState;

/// Reference-data browsing. Unauthenticated, always in insertion order.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/trainers", get(list_trainers))
        .route("/zones", get(list_zones))
        .route("/time_slots", get(list_time_slots))
}

async fn list_trainers(State(state): State<AppState>) -> Result<Json<Vec<Trainer>>, AppError> {
    Ok(Json(state.catalog.list_trainers().await?))
}

async fn list_zones(State(state): State<AppState>) -> Result<Json<Vec<Zone>>, AppError> {
    Ok(Json(state.catalog.list_zones().await?))
}

async fn list_time_slots(State(state): State<AppState>) -> Result<Json<Vec<TimeSlot>>, AppError> {
    Ok(Json(state.catalog.list_time_slots().await?))
}
