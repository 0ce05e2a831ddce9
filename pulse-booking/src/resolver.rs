use std::collections::HashSet;
use std::sync::Arc;

use chrono::{Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use pulse_core::models::{Booking, NewBooking};
use pulse_core::repository::{BookingRepository, CatalogRepository};
use pulse_core::RepositoryError;

use crate::policy::BookingPolicy;

/// A booking as submitted by a client, before any checks.
#[derive(Debug, Clone, Deserialize)]
pub struct BookingRequest {
    pub trainer_id: i64,
    pub zone_id: i64,
    pub date: NaiveDate,
    pub start_time: String,
    pub duration_minutes: i64,
    pub kind: String,
}

/// Advisory alternatives returned alongside a conflict. Both are best-effort
/// and computed independently of each other; the caller must resubmit
/// explicitly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ConflictReport {
    pub trainer_next_free: Option<FreeSlotSuggestion>,
    pub alternative_zone_same_time: Option<ZoneSuggestion>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FreeSlotSuggestion {
    pub date: NaiveDate,
    pub start_time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ZoneSuggestion {
    pub zone_id: i64,
    pub zone_name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("time slot already booked")]
    Conflict(ConflictReport),

    #[error(transparent)]
    Storage(#[from] RepositoryError),
}

/// Decides whether a requested booking can be placed.
///
/// On success the booking is written to the ledger; on conflict nothing is
/// written and a `ConflictReport` with alternatives comes back instead. The
/// storage layer's unique indexes back the in-application check, so a lost
/// race between two writers surfaces here as the same conflict outcome.
pub struct ConflictResolver {
    catalog: Arc<dyn CatalogRepository>,
    ledger: Arc<dyn BookingRepository>,
    policy: BookingPolicy,
}

impl ConflictResolver {
    pub fn new(
        catalog: Arc<dyn CatalogRepository>,
        ledger: Arc<dyn BookingRepository>,
        policy: BookingPolicy,
    ) -> Self {
        Self {
            catalog,
            ledger,
            policy,
        }
    }

    pub async fn place_booking(
        &self,
        requester_id: i64,
        req: BookingRequest,
    ) -> Result<Booking, BookingError> {
        if req.duration_minutes <= 0 {
            return Err(BookingError::Validation(
                "duration_minutes must be positive".to_string(),
            ));
        }

        let slots = self.catalog.list_time_slots().await?;
        let slot_labels: Vec<String> = slots.into_iter().map(|s| s.label).collect();
        if !slot_labels.iter().any(|l| l == &req.start_time) {
            return Err(BookingError::Validation(format!(
                "start_time '{}' is not a known time slot",
                req.start_time
            )));
        }

        let today = Utc::now().date_naive();
        validate_window(req.date, today, self.policy.window_days)?;

        if self.policy.enforce_catalog_refs {
            if !self.catalog.trainer_exists(req.trainer_id).await? {
                return Err(BookingError::NotFound(format!(
                    "trainer {} not found",
                    req.trainer_id
                )));
            }
            if !self.catalog.zone_exists(req.zone_id).await? {
                return Err(BookingError::NotFound(format!(
                    "zone {} not found",
                    req.zone_id
                )));
            }
        }

        // One shared-resource check: either a trainer or a zone collision at
        // (date, start_time) blocks the request.
        let occupied = self
            .ledger
            .is_booked(
                req.date,
                &req.start_time,
                Some(req.trainer_id),
                Some(req.zone_id),
            )
            .await?;
        if occupied {
            debug!(
                trainer_id = req.trainer_id,
                zone_id = req.zone_id,
                date = %req.date,
                start_time = %req.start_time,
                "booking conflict detected"
            );
            let report = self.build_conflict_report(&req, &slot_labels).await?;
            return Err(BookingError::Conflict(report));
        }

        let new_booking = NewBooking {
            user_id: requester_id,
            trainer_id: req.trainer_id,
            zone_id: req.zone_id,
            date: req.date,
            start_time: req.start_time.clone(),
            duration_minutes: req.duration_minutes,
            kind: req.kind.clone(),
        };

        match self.ledger.insert(new_booking).await {
            Ok(booking) => {
                info!(booking_id = %booking.id, user_id = requester_id, "booking placed");
                Ok(booking)
            }
            // A concurrent writer took the slot between the check and the
            // insert; the unique index is the authoritative signal.
            Err(RepositoryError::UniqueViolation) => {
                let report = self.build_conflict_report(&req, &slot_labels).await?;
                Err(BookingError::Conflict(report))
            }
            Err(e) => Err(BookingError::Storage(e)),
        }
    }

    /// Compute both advisory alternatives without writing anything.
    async fn build_conflict_report(
        &self,
        req: &BookingRequest,
        slot_labels: &[String],
    ) -> Result<ConflictReport, RepositoryError> {
        let trainer_next_free = self.trainer_next_free(req, slot_labels).await?;
        let alternative_zone_same_time = self.alternative_zone_same_time(req).await?;
        Ok(ConflictReport {
            trainer_next_free,
            alternative_zone_same_time,
        })
    }

    /// First (date, slot) within the scan window where the trainer is free,
    /// scanning days outward from the requested date and slots in canonical
    /// order. The exact requested pair at day offset 0 is skipped; it is the
    /// one already known to conflict.
    async fn trainer_next_free(
        &self,
        req: &BookingRequest,
        slot_labels: &[String],
    ) -> Result<Option<FreeSlotSuggestion>, RepositoryError> {
        let scan_end = req.date + Duration::days(i64::from(self.policy.suggestion_scan_days));
        let busy: HashSet<(NaiveDate, String)> = self
            .ledger
            .trainer_booked_slots(req.trainer_id, req.date, scan_end)
            .await?
            .into_iter()
            .collect();

        for offset in 0..=i64::from(self.policy.suggestion_scan_days) {
            let day = req.date + Duration::days(offset);
            for label in slot_labels {
                if offset == 0 && *label == req.start_time {
                    continue;
                }
                if !busy.contains(&(day, label.clone())) {
                    return Ok(Some(FreeSlotSuggestion {
                        date: day,
                        start_time: label.clone(),
                    }));
                }
            }
        }
        Ok(None)
    }

    /// First other zone, in catalog order, with no booking at the requested
    /// (date, start_time).
    async fn alternative_zone_same_time(
        &self,
        req: &BookingRequest,
    ) -> Result<Option<ZoneSuggestion>, RepositoryError> {
        let occupied: HashSet<i64> = self
            .ledger
            .booked_zone_ids(req.date, &req.start_time)
            .await?
            .into_iter()
            .collect();

        let zones = self.catalog.list_zones().await?;
        Ok(zones
            .into_iter()
            .filter(|z| z.id != req.zone_id && !occupied.contains(&z.id))
            .map(|z| ZoneSuggestion {
                zone_id: z.id,
                zone_name: z.name,
            })
            .next())
    }
}

/// The date window: today through `window_days` ahead, both inclusive.
/// Out-of-window dates are validation failures, never conflicts.
pub fn validate_window(
    date: NaiveDate,
    today: NaiveDate,
    window_days: u32,
) -> Result<(), BookingError> {
    let offset = (date - today).num_days();
    if offset < 0 {
        return Err(BookingError::Validation(
            "cannot book a past date".to_string(),
        ));
    }
    if offset > i64::from(window_days) {
        return Err(BookingError::Validation(format!(
            "bookings are accepted at most {window_days} days ahead"
        )));
    }
    Ok(())
}
