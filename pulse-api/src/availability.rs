use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;

use pulse_booking::AvailabilitySlot;

use crate::bookings::parse_date;
use crate::error::AppError;
use crate::middleware::auth::Claims;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct AvailabilityQuery {
    date: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/availability", get(list_availability))
}

async fn list_availability(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Vec<AvailabilitySlot>>, AppError> {
    let raw = query
        .date
        .ok_or_else(|| AppError::ValidationError("date is required".to_string()))?;
    let date = parse_date(&raw)?;

    let free = state.availability.list_availability(date).await?;
    Ok(Json(free))
}
