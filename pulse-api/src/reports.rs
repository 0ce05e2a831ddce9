use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use serde::Deserialize;

use pulse_core::models::BookingRecord;

use crate::bookings::parse_date;
use crate::error::AppError;
use crate::middleware::auth::Claims;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
struct ReportQuery {
    start_date: Option<String>,
    end_date: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new().route("/reports/bookings", get(bookings_report))
}

/// Denormalized bookings in an inclusive date range, ordered by
/// (date, start_time). A point-in-time read; nothing here feeds back into
/// writes.
async fn bookings_report(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<Vec<BookingRecord>>, AppError> {
    let (Some(start_raw), Some(end_raw)) = (query.start_date, query.end_date) else {
        return Err(AppError::ValidationError(
            "start_date and end_date are required".to_string(),
        ));
    };
    let start = parse_date(&start_raw)?;
    let end = parse_date(&end_raw)?;

    let records = state.ledger.list_between(start, end).await?;
    Ok(Json(records))
}
