use axum::{
    extract::State,
    routing::{get, post},
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use pulse_booking::{BookingError, BookingRequest};
use pulse_core::models::BookingRecord;

use crate::error::AppError;
use crate::middleware::auth::Claims;
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct AddBookingRequest {
    trainer_id: i64,
    zone_id: i64,
    date: String,
    start_time: String,
    duration_minutes: i64,
    #[serde(rename = "type", default = "default_kind")]
    kind: String,
}

fn default_kind() -> String {
    "personal".to_string()
}

#[derive(Debug, Serialize)]
struct AddBookingResponse {
    message: String,
    booking: BookingRecord,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/bookings/add", post(add_booking))
        .route("/bookings/all", get(list_all_bookings))
}

// ============================================================================
// Handlers
// ============================================================================

async fn add_booking(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<AddBookingRequest>,
) -> Result<Json<AddBookingResponse>, AppError> {
    let user_id = claims.user_id()?;
    let date = parse_date(&req.date)?;

    let request = BookingRequest {
        trainer_id: req.trainer_id,
        zone_id: req.zone_id,
        date,
        start_time: req.start_time,
        duration_minutes: req.duration_minutes,
        kind: req.kind,
    };

    let booking = state
        .resolver
        .place_booking(user_id, request)
        .await
        .map_err(map_booking_error)?;

    // Read-after-write: respond with the denormalized row just inserted.
    let record = state
        .ledger
        .find_denormalized(booking.id)
        .await?
        .ok_or_else(|| {
            AppError::InternalServerError(format!("booking {} vanished after insert", booking.id))
        })?;

    Ok(Json(AddBookingResponse {
        message: "Booking confirmed".to_string(),
        booking: record,
    }))
}

async fn list_all_bookings(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
) -> Result<Json<Vec<BookingRecord>>, AppError> {
    Ok(Json(state.ledger.list_all().await?))
}

fn map_booking_error(err: BookingError) -> AppError {
    match err {
        BookingError::Validation(msg) => AppError::ValidationError(msg),
        BookingError::NotFound(msg) => AppError::NotFoundError(msg),
        BookingError::Conflict(alternatives) => AppError::Conflict {
            message: "Time slot already booked".to_string(),
            alternatives,
        },
        BookingError::Storage(e) => AppError::InternalServerError(e.to_string()),
    }
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .map_err(|_| AppError::ValidationError(format!("invalid date: '{raw}', expected YYYY-MM-DD")))
}
