//! In-memory fakes for the repository traits, used by the crate tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use pulse_core::models::{Booking, BookingRecord, NewBooking, TimeSlot, Trainer, Zone, ZoneKind};
use pulse_core::repository::{BookingRepository, CatalogRepository};
use pulse_core::{RepositoryError, RepositoryResult};

/// Fixed catalog: 3 trainers, 5 zones, hourly slots 08:00 through 20:00.
pub struct MemoryCatalog {
    trainers: Vec<Trainer>,
    zones: Vec<Zone>,
    slots: Vec<TimeSlot>,
}

pub fn fixture_catalog() -> Arc<MemoryCatalog> {
    let trainers = vec![
        ("Ivanova", "personal"),
        ("Sidorov", "pilates"),
        ("Petrova", "yoga"),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (name, specialty))| Trainer {
        id: i as i64 + 1,
        name: name.to_string(),
        specialty: specialty.to_string(),
    })
    .collect();

    let zones = vec![
        ("Cardio Zone", ZoneKind::Cardio),
        ("Strength Zone", ZoneKind::Strength),
        ("Group Studio", ZoneKind::Group),
        ("Premium Hall", ZoneKind::Premium),
        ("Yoga Studio", ZoneKind::Yoga),
    ]
    .into_iter()
    .enumerate()
    .map(|(i, (name, kind))| Zone {
        id: i as i64 + 1,
        name: name.to_string(),
        kind,
    })
    .collect();

    let slots = (8..=20)
        .enumerate()
        .map(|(i, hour)| TimeSlot {
            id: i as i64 + 1,
            label: format!("{hour:02}:00"),
        })
        .collect();

    Arc::new(MemoryCatalog {
        trainers,
        zones,
        slots,
    })
}

#[async_trait]
impl CatalogRepository for MemoryCatalog {
    async fn list_trainers(&self) -> RepositoryResult<Vec<Trainer>> {
        Ok(self.trainers.clone())
    }

    async fn list_zones(&self) -> RepositoryResult<Vec<Zone>> {
        Ok(self.zones.clone())
    }

    async fn list_time_slots(&self) -> RepositoryResult<Vec<TimeSlot>> {
        Ok(self.slots.clone())
    }

    async fn trainer_exists(&self, id: i64) -> RepositoryResult<bool> {
        Ok(self.trainers.iter().any(|t| t.id == id))
    }

    async fn zone_exists(&self, id: i64) -> RepositoryResult<bool> {
        Ok(self.zones.iter().any(|z| z.id == id))
    }
}

/// In-memory booking ledger enforcing the same uniqueness the SQLite indexes
/// do. `with_blind_lookups` makes `is_booked` always answer "free", which
/// emulates a concurrent writer landing between the check and the insert.
pub struct MemoryLedger {
    bookings: Mutex<Vec<Booking>>,
    blind_lookups: bool,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self {
            bookings: Mutex::new(Vec::new()),
            blind_lookups: false,
        }
    }

    pub fn with_blind_lookups() -> Self {
        Self {
            bookings: Mutex::new(Vec::new()),
            blind_lookups: true,
        }
    }

    pub fn len(&self) -> usize {
        self.bookings.lock().unwrap().len()
    }
}

#[async_trait]
impl BookingRepository for MemoryLedger {
    async fn insert(&self, booking: NewBooking) -> RepositoryResult<Booking> {
        let mut bookings = self.bookings.lock().unwrap();
        let collides = bookings.iter().any(|b| {
            b.date == booking.date
                && b.start_time == booking.start_time
                && (b.trainer_id == booking.trainer_id || b.zone_id == booking.zone_id)
        });
        if collides {
            return Err(RepositoryError::UniqueViolation);
        }
        let booking = booking.into_booking();
        bookings.push(booking.clone());
        Ok(booking)
    }

    async fn is_booked(
        &self,
        date: NaiveDate,
        start_time: &str,
        trainer_id: Option<i64>,
        zone_id: Option<i64>,
    ) -> RepositoryResult<bool> {
        if self.blind_lookups {
            return Ok(false);
        }
        let bookings = self.bookings.lock().unwrap();
        Ok(bookings.iter().any(|b| {
            b.date == date
                && b.start_time == start_time
                && (trainer_id.is_some_and(|t| b.trainer_id == t)
                    || zone_id.is_some_and(|z| b.zone_id == z))
        }))
    }

    async fn trainer_booked_slots(
        &self,
        trainer_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<Vec<(NaiveDate, String)>> {
        let bookings = self.bookings.lock().unwrap();
        Ok(bookings
            .iter()
            .filter(|b| b.trainer_id == trainer_id && b.date >= from && b.date <= to)
            .map(|b| (b.date, b.start_time.clone()))
            .collect())
    }

    async fn booked_zone_ids(
        &self,
        date: NaiveDate,
        start_time: &str,
    ) -> RepositoryResult<Vec<i64>> {
        let bookings = self.bookings.lock().unwrap();
        Ok(bookings
            .iter()
            .filter(|b| b.date == date && b.start_time == start_time)
            .map(|b| b.zone_id)
            .collect())
    }

    async fn bookings_for_date(&self, date: NaiveDate) -> RepositoryResult<Vec<Booking>> {
        let bookings = self.bookings.lock().unwrap();
        Ok(bookings.iter().filter(|b| b.date == date).cloned().collect())
    }

    async fn list_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepositoryResult<Vec<BookingRecord>> {
        let bookings = self.bookings.lock().unwrap();
        let mut records: Vec<BookingRecord> = bookings
            .iter()
            .filter(|b| b.date >= start && b.date <= end)
            .map(record_of)
            .collect();
        records.sort_by(|a, b| (a.date, &a.start_time).cmp(&(b.date, &b.start_time)));
        Ok(records)
    }

    async fn list_all(&self) -> RepositoryResult<Vec<BookingRecord>> {
        let bookings = self.bookings.lock().unwrap();
        let mut records: Vec<BookingRecord> = bookings.iter().map(record_of).collect();
        records.sort_by(|a, b| (a.date, &a.start_time).cmp(&(b.date, &b.start_time)));
        Ok(records)
    }

    async fn find_denormalized(&self, id: Uuid) -> RepositoryResult<Option<BookingRecord>> {
        let bookings = self.bookings.lock().unwrap();
        Ok(bookings.iter().find(|b| b.id == id).map(record_of))
    }
}

fn record_of(b: &Booking) -> BookingRecord {
    BookingRecord {
        id: b.id,
        client: format!("client-{}", b.user_id),
        trainer: format!("trainer-{}", b.trainer_id),
        zone: format!("zone-{}", b.zone_id),
        date: b.date,
        start_time: b.start_time.clone(),
        duration_minutes: b.duration_minutes,
        kind: b.kind.clone(),
    }
}

