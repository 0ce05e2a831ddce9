use async_trait::async_trait;
use chrono::NaiveDate;

use crate::models::{Booking, BookingRecord, NewBooking, TimeSlot, Trainer, User, Zone};
use crate::RepositoryResult;
use uuid::Uuid;

/// Read access to the immutable reference catalog.
///
/// All listings preserve insertion order; the resolver and the availability
/// computer both depend on that ordering for deterministic suggestions.
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    async fn list_trainers(&self) -> RepositoryResult<Vec<Trainer>>;

    async fn list_zones(&self) -> RepositoryResult<Vec<Zone>>;

    async fn list_time_slots(&self) -> RepositoryResult<Vec<TimeSlot>>;

    async fn trainer_exists(&self, id: i64) -> RepositoryResult<bool>;

    async fn zone_exists(&self, id: i64) -> RepositoryResult<bool>;
}

/// The booking ledger: append-only writes plus the conflict lookups the
/// resolver and the availability computer need.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Insert one booking. A violated uniqueness index comes back as
    /// `RepositoryError::UniqueViolation` and means a concurrent writer took
    /// the slot first; zero rows are written in that case.
    async fn insert(&self, booking: NewBooking) -> RepositoryResult<Booking>;

    /// True if any booking exists at (date, start_time) matching the trainer
    /// OR the zone, whichever of the two keys are provided.
    async fn is_booked(
        &self,
        date: NaiveDate,
        start_time: &str,
        trainer_id: Option<i64>,
        zone_id: Option<i64>,
    ) -> RepositoryResult<bool>;

    /// Every (date, start_time) pair the trainer occupies in the inclusive
    /// range. Batched input to the next-free scan.
    async fn trainer_booked_slots(
        &self,
        trainer_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<Vec<(NaiveDate, String)>>;

    /// Zone ids occupied at the exact (date, start_time).
    async fn booked_zone_ids(
        &self,
        date: NaiveDate,
        start_time: &str,
    ) -> RepositoryResult<Vec<i64>>;

    /// All bookings on a date, for the availability occupancy pass.
    async fn bookings_for_date(&self, date: NaiveDate) -> RepositoryResult<Vec<Booking>>;

    /// Denormalized bookings in the inclusive date range, ordered by
    /// (date, start_time). The reporting read.
    async fn list_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepositoryResult<Vec<BookingRecord>>;

    /// Every booking, denormalized, same ordering as `list_between`.
    async fn list_all(&self) -> RepositoryResult<Vec<BookingRecord>>;

    /// Read-after-write: one booking joined with names, for the success
    /// response.
    async fn find_denormalized(&self, id: Uuid) -> RepositoryResult<Option<BookingRecord>>;
}

/// User accounts, for registration and login.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
        role: crate::models::Role,
    ) -> RepositoryResult<User>;

    async fn find_by_email(&self, email: &str) -> RepositoryResult<Option<User>>;
}
