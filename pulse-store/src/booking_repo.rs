use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use pulse_core::models::{Booking, BookingRecord, NewBooking};
use pulse_core::repository::BookingRepository;
use pulse_core::{RepositoryError, RepositoryResult};

use crate::database::map_db_err;

pub struct SqliteBookingRepository {
    pool: SqlitePool,
}

impl SqliteBookingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct BookingRow {
    id: String,
    user_id: i64,
    trainer_id: i64,
    zone_id: i64,
    date: NaiveDate,
    start_time: String,
    duration_minutes: i64,
    kind: String,
    created_at: DateTime<Utc>,
}

impl BookingRow {
    fn into_booking(self) -> RepositoryResult<Booking> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Database(format!("bad booking id: {e}")))?;
        Ok(Booking {
            id,
            user_id: self.user_id,
            trainer_id: self.trainer_id,
            zone_id: self.zone_id,
            date: self.date,
            start_time: self.start_time,
            duration_minutes: self.duration_minutes,
            kind: self.kind,
            created_at: self.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct RecordRow {
    id: String,
    client: String,
    trainer: String,
    zone: String,
    date: NaiveDate,
    start_time: String,
    duration_minutes: i64,
    kind: String,
}

impl RecordRow {
    fn into_record(self) -> RepositoryResult<BookingRecord> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Database(format!("bad booking id: {e}")))?;
        Ok(BookingRecord {
            id,
            client: self.client,
            trainer: self.trainer,
            zone: self.zone,
            date: self.date,
            start_time: self.start_time,
            duration_minutes: self.duration_minutes,
            kind: self.kind,
        })
    }
}

const RECORD_SELECT: &str = r"
    SELECT b.id, u.name AS client, t.name AS trainer, z.name AS zone,
           b.date, b.start_time, b.duration_minutes, b.type AS kind
    FROM bookings b
    JOIN users u ON b.user_id = u.id
    JOIN trainers t ON b.trainer_id = t.id
    JOIN zones z ON b.zone_id = z.id
";

#[async_trait]
impl BookingRepository for SqliteBookingRepository {
    async fn insert(&self, booking: NewBooking) -> RepositoryResult<Booking> {
        let booking = booking.into_booking();
        sqlx::query(
            r"
            INSERT INTO bookings (id, user_id, trainer_id, zone_id, date, start_time,
                                  duration_minutes, type, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ",
        )
        .bind(booking.id.to_string())
        .bind(booking.user_id)
        .bind(booking.trainer_id)
        .bind(booking.zone_id)
        .bind(booking.date)
        .bind(&booking.start_time)
        .bind(booking.duration_minutes)
        .bind(&booking.kind)
        .bind(booking.created_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        Ok(booking)
    }

    async fn is_booked(
        &self,
        date: NaiveDate,
        start_time: &str,
        trainer_id: Option<i64>,
        zone_id: Option<i64>,
    ) -> RepositoryResult<bool> {
        let count: i64 = sqlx::query_scalar(
            r"
            SELECT COUNT(*) FROM bookings
            WHERE date = ?1 AND start_time = ?2
              AND ((?3 IS NOT NULL AND trainer_id = ?3)
                OR (?4 IS NOT NULL AND zone_id = ?4))
            ",
        )
        .bind(date)
        .bind(start_time)
        .bind(trainer_id)
        .bind(zone_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_err)?;
        Ok(count > 0)
    }

    async fn trainer_booked_slots(
        &self,
        trainer_id: i64,
        from: NaiveDate,
        to: NaiveDate,
    ) -> RepositoryResult<Vec<(NaiveDate, String)>> {
        sqlx::query_as::<_, (NaiveDate, String)>(
            r"
            SELECT date, start_time FROM bookings
            WHERE trainer_id = ? AND date BETWEEN ? AND ?
            ",
        )
        .bind(trainer_id)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)
    }

    async fn booked_zone_ids(
        &self,
        date: NaiveDate,
        start_time: &str,
    ) -> RepositoryResult<Vec<i64>> {
        sqlx::query_scalar("SELECT zone_id FROM bookings WHERE date = ? AND start_time = ?")
            .bind(date)
            .bind(start_time)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_err)
    }

    async fn bookings_for_date(&self, date: NaiveDate) -> RepositoryResult<Vec<Booking>> {
        let rows = sqlx::query_as::<_, BookingRow>(
            r"
            SELECT id, user_id, trainer_id, zone_id, date, start_time,
                   duration_minutes, type AS kind, created_at
            FROM bookings WHERE date = ?
            ",
        )
        .bind(date)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_err)?;

        rows.into_iter().map(BookingRow::into_booking).collect()
    }

    async fn list_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> RepositoryResult<Vec<BookingRecord>> {
        let sql = format!(
            "{RECORD_SELECT} WHERE b.date BETWEEN ? AND ? ORDER BY b.date, b.start_time"
        );
        let rows = sqlx::query_as::<_, RecordRow>(&sql)
            .bind(start)
            .bind(end)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_err)?;

        rows.into_iter().map(RecordRow::into_record).collect()
    }

    async fn list_all(&self) -> RepositoryResult<Vec<BookingRecord>> {
        let sql = format!("{RECORD_SELECT} ORDER BY b.date, b.start_time");
        let rows = sqlx::query_as::<_, RecordRow>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_err)?;

        rows.into_iter().map(RecordRow::into_record).collect()
    }

    async fn find_denormalized(&self, id: Uuid) -> RepositoryResult<Option<BookingRecord>> {
        let sql = format!("{RECORD_SELECT} WHERE b.id = ?");
        let row = sqlx::query_as::<_, RecordRow>(&sql)
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_err)?;

        row.map(RecordRow::into_record).transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;

    async fn ledger() -> (Database, SqliteBookingRepository) {
        let db = Database::in_memory().await.unwrap();
        db.migrate().await.unwrap();
        db.seed().await.unwrap();
        let repo = SqliteBookingRepository::new(db.pool.clone());
        (db, repo)
    }

    fn new_booking(trainer_id: i64, zone_id: i64, date: NaiveDate, slot: &str) -> NewBooking {
        NewBooking {
            // Seeded demo client.
            user_id: 2,
            trainer_id,
            zone_id,
            date,
            start_time: slot.to_string(),
            duration_minutes: 60,
            kind: "personal".to_string(),
        }
    }

    #[tokio::test]
    async fn test_insert_and_read_back_denormalized() {
        let (_db, repo) = ledger().await;
        let date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();

        let booking = repo.insert(new_booking(1, 2, date, "10:00")).await.unwrap();

        let record = repo
            .find_denormalized(booking.id)
            .await
            .unwrap()
            .expect("read-after-write must see the row");
        assert_eq!(record.client, "Ivan Petrov");
        assert_eq!(record.trainer, "Ivanova");
        assert_eq!(record.zone, "Strength Zone");
        assert_eq!(record.start_time, "10:00");
    }

    #[tokio::test]
    async fn test_unique_indexes_reject_double_booking() {
        let (_db, repo) = ledger().await;
        let date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();

        repo.insert(new_booking(1, 1, date, "10:00")).await.unwrap();

        // Same trainer, different zone.
        let err = repo
            .insert(new_booking(1, 2, date, "10:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::UniqueViolation));

        // Same zone, different trainer.
        let err = repo
            .insert(new_booking(2, 1, date, "10:00"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::UniqueViolation));

        // Different slot goes through.
        repo.insert(new_booking(1, 1, date, "11:00")).await.unwrap();
    }

    #[tokio::test]
    async fn test_is_booked_matches_trainer_or_zone() {
        let (_db, repo) = ledger().await;
        let date = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        repo.insert(new_booking(1, 2, date, "10:00")).await.unwrap();

        assert!(repo.is_booked(date, "10:00", Some(1), None).await.unwrap());
        assert!(repo.is_booked(date, "10:00", None, Some(2)).await.unwrap());
        assert!(repo
            .is_booked(date, "10:00", Some(1), Some(5))
            .await
            .unwrap());
        assert!(!repo.is_booked(date, "10:00", Some(2), None).await.unwrap());
        assert!(!repo.is_booked(date, "11:00", Some(1), Some(2)).await.unwrap());
    }

    #[tokio::test]
    async fn test_scan_lookups_and_report_range() {
        let (_db, repo) = ledger().await;
        let d1 = NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
        let d2 = NaiveDate::from_ymd_opt(2026, 9, 2).unwrap();
        let d9 = NaiveDate::from_ymd_opt(2026, 9, 9).unwrap();

        repo.insert(new_booking(1, 1, d1, "10:00")).await.unwrap();
        repo.insert(new_booking(1, 2, d2, "09:00")).await.unwrap();
        repo.insert(new_booking(1, 3, d9, "08:00")).await.unwrap();

        let slots = repo.trainer_booked_slots(1, d1, d2).await.unwrap();
        assert_eq!(slots.len(), 2, "day 9 is outside the scan range");

        let zones = repo.booked_zone_ids(d1, "10:00").await.unwrap();
        assert_eq!(zones, vec![1]);

        let records = repo.list_between(d1, d2).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, d1, "ordered by (date, start_time)");
        assert_eq!(records[1].date, d2);

        let day = repo.bookings_for_date(d1).await.unwrap();
        assert_eq!(day.len(), 1);
        assert_eq!(day[0].trainer_id, 1);
    }
}
