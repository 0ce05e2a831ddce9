use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;

use pulse_core::{RepositoryError, RepositoryResult};

/// Shared SQLite handle. The schema is bootstrapped in code at startup, the
/// way the service has always done it, and the two unique indexes on the
/// bookings table are what make a lost check-then-insert race surface as a
/// constraint violation instead of a double-booking.
#[derive(Clone)]
pub struct Database {
    pub pool: SqlitePool,
}

impl Database {
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Single-connection in-memory database, for tests.
    pub async fn in_memory() -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await?;
        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> RepositoryResult<()> {
        info!("Running database bootstrap...");

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'client' CHECK (role IN ('client', 'admin'))
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS trainers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                specialty TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS zones (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                type TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS time_slots (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                label TEXT NOT NULL UNIQUE
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS bookings (
                id TEXT PRIMARY KEY,
                user_id INTEGER NOT NULL,
                trainer_id INTEGER NOT NULL,
                zone_id INTEGER NOT NULL,
                date TEXT NOT NULL,
                start_time TEXT NOT NULL,
                duration_minutes INTEGER NOT NULL,
                type TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        // A trainer and a zone each serve at most one booking per
        // (date, start_time); the indexes are the source of truth.
        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_bookings_trainer_slot
             ON bookings(date, start_time, trainer_id)",
        )
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        sqlx::query(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_bookings_zone_slot
             ON bookings(date, start_time, zone_id)",
        )
        .execute(&self.pool)
        .await
        .map_err(map_db_err)?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_bookings_date ON bookings(date)")
            .execute(&self.pool)
            .await
            .map_err(map_db_err)?;

        info!("Database bootstrap completed.");
        Ok(())
    }

    /// Populate empty reference tables with the standard fixtures: hourly
    /// slots 08:00-20:00, five zones, three trainers, and the two demo
    /// accounts.
    pub async fn seed(&self) -> RepositoryResult<()> {
        let slot_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM time_slots")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_err)?;
        if slot_count == 0 {
            for hour in 8..=20 {
                sqlx::query("INSERT INTO time_slots (label) VALUES (?)")
                    .bind(format!("{hour:02}:00"))
                    .execute(&self.pool)
                    .await
                    .map_err(map_db_err)?;
            }
        }

        let zone_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM zones")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_err)?;
        if zone_count == 0 {
            for (name, kind) in [
                ("Cardio Zone", "cardio"),
                ("Strength Zone", "strength"),
                ("Group Studio", "group"),
                ("Premium Hall", "premium"),
                ("Yoga Studio", "yoga"),
            ] {
                sqlx::query("INSERT INTO zones (name, type) VALUES (?, ?)")
                    .bind(name)
                    .bind(kind)
                    .execute(&self.pool)
                    .await
                    .map_err(map_db_err)?;
            }
        }

        let trainer_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM trainers")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_err)?;
        if trainer_count == 0 {
            for (name, specialty) in [
                ("Ivanova", "personal"),
                ("Sidorov", "pilates"),
                ("Petrova", "yoga"),
            ] {
                sqlx::query("INSERT INTO trainers (name, specialty) VALUES (?, ?)")
                    .bind(name)
                    .bind(specialty)
                    .execute(&self.pool)
                    .await
                    .map_err(map_db_err)?;
            }
        }

        let user_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_err)?;
        if user_count == 0 {
            info!("Seeding demo accounts (admin@example.com, ivan@example.com)");
            for (name, email, password, role) in [
                ("Administrator", "admin@example.com", "admin123", "admin"),
                ("Ivan Petrov", "ivan@example.com", "password123", "client"),
            ] {
                let hash = bcrypt::hash(password, bcrypt::DEFAULT_COST)
                    .map_err(|e| RepositoryError::Database(e.to_string()))?;
                sqlx::query(
                    "INSERT INTO users (name, email, password_hash, role) VALUES (?, ?, ?, ?)",
                )
                .bind(name)
                .bind(email)
                .bind(hash)
                .bind(role)
                .execute(&self.pool)
                .await
                .map_err(map_db_err)?;
            }
        }

        Ok(())
    }
}

pub(crate) fn map_db_err(e: sqlx::Error) -> RepositoryError {
    match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => RepositoryError::UniqueViolation,
        sqlx::Error::RowNotFound => RepositoryError::NotFound(e.to_string()),
        _ => RepositoryError::Database(e.to_string()),
    }
}
