use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use pulse_core::repository::{BookingRepository, CatalogRepository};
use pulse_core::RepositoryError;

/// One free (slot, zone, trainer) combination for a date.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AvailabilitySlot {
    pub time_slot: String,
    pub zone_id: i64,
    pub zone_name: String,
    pub trainer_id: i64,
    pub trainer_name: String,
}

/// Enumerates every unbooked slot × zone × trainer combination for a date.
///
/// The day's bookings are fetched in one pass and folded into occupancy sets
/// keyed by (slot, trainer) and (slot, zone), so each triple of the cross
/// product is tested in O(1) instead of one ledger lookup per triple. The
/// enumeration is read-only, deterministic, and recomputed from scratch on
/// every call; iteration is slot-major, zone next, trainer innermost, in
/// catalog insertion order on each axis.
pub struct AvailabilityComputer {
    catalog: Arc<dyn CatalogRepository>,
    ledger: Arc<dyn BookingRepository>,
}

impl AvailabilityComputer {
    pub fn new(catalog: Arc<dyn CatalogRepository>, ledger: Arc<dyn BookingRepository>) -> Self {
        Self { catalog, ledger }
    }

    pub async fn list_availability(
        &self,
        date: NaiveDate,
    ) -> Result<Vec<AvailabilitySlot>, RepositoryError> {
        let slots = self.catalog.list_time_slots().await?;
        let zones = self.catalog.list_zones().await?;
        let trainers = self.catalog.list_trainers().await?;

        let mut trainer_taken: HashSet<(String, i64)> = HashSet::new();
        let mut zone_taken: HashSet<(String, i64)> = HashSet::new();
        for booking in self.ledger.bookings_for_date(date).await? {
            trainer_taken.insert((booking.start_time.clone(), booking.trainer_id));
            zone_taken.insert((booking.start_time, booking.zone_id));
        }

        let mut free = Vec::new();
        for slot in &slots {
            for zone in &zones {
                if zone_taken.contains(&(slot.label.clone(), zone.id)) {
                    continue;
                }
                for trainer in &trainers {
                    if trainer_taken.contains(&(slot.label.clone(), trainer.id)) {
                        continue;
                    }
                    free.push(AvailabilitySlot {
                        time_slot: slot.label.clone(),
                        zone_id: zone.id,
                        zone_name: zone.name.clone(),
                        trainer_id: trainer.id,
                        trainer_name: trainer.name.clone(),
                    });
                }
            }
        }
        Ok(free)
    }
}
