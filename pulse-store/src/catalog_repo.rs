use std::str::FromStr;

use async_trait::async_trait;
use sqlx::SqlitePool;

use pulse_core::models::{TimeSlot, Trainer, Zone, ZoneKind};
use pulse_core::repository::CatalogRepository;
use pulse_core::{RepositoryError, RepositoryResult};

use crate::database::map_db_err;

pub struct SqliteCatalogRepository {
    pool: SqlitePool,
}

impl SqliteCatalogRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

// Internal structs for type-safe querying; the core models carry no sqlx
// derives.
#[derive(sqlx::FromRow)]
struct TrainerRow {
    id: i64,
    name: String,
    specialty: String,
}

#[derive(sqlx::FromRow)]
struct ZoneRow {
    id: i64,
    name: String,
    kind: String,
}

#[derive(sqlx::FromRow)]
struct TimeSlotRow {
    id: i64,
    label: String,
}

#[async_trait]
impl CatalogRepository for SqliteCatalogRepository {
    async fn list_trainers(&self) -> RepositoryResult<Vec<Trainer>> {
        let rows =
            sqlx::query_as::<_, TrainerRow>("SELECT id, name, specialty FROM trainers ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(map_db_err)?;
        Ok(rows
            .into_iter()
            .map(|row| Trainer {
                id: row.id,
                name: row.name,
                specialty: row.specialty,
            })
            .collect())
    }

    async fn list_zones(&self) -> RepositoryResult<Vec<Zone>> {
        let rows =
            sqlx::query_as::<_, ZoneRow>("SELECT id, name, type AS kind FROM zones ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(map_db_err)?;

        rows.into_iter()
            .map(|row| {
                let kind = ZoneKind::from_str(&row.kind)
                    .map_err(|e| RepositoryError::Database(e.to_string()))?;
                Ok(Zone {
                    id: row.id,
                    name: row.name,
                    kind,
                })
            })
            .collect()
    }

    async fn list_time_slots(&self) -> RepositoryResult<Vec<TimeSlot>> {
        let rows =
            sqlx::query_as::<_, TimeSlotRow>("SELECT id, label FROM time_slots ORDER BY id")
                .fetch_all(&self.pool)
                .await
                .map_err(map_db_err)?;
        Ok(rows
            .into_iter()
            .map(|row| TimeSlot {
                id: row.id,
                label: row.label,
            })
            .collect())
    }

    async fn trainer_exists(&self, id: i64) -> RepositoryResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM trainers WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(count > 0)
    }

    async fn zone_exists(&self, id: i64) -> RepositoryResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM zones WHERE id = ?")
            .bind(id)
            .fetch_one(&self.pool)
            .await
            .map_err(map_db_err)?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;

    #[tokio::test]
    async fn test_seeded_catalog_preserves_insertion_order() {
        let db = Database::in_memory().await.unwrap();
        db.migrate().await.unwrap();
        db.seed().await.unwrap();

        let repo = SqliteCatalogRepository::new(db.pool.clone());

        let slots = repo.list_time_slots().await.unwrap();
        assert_eq!(slots.len(), 13);
        assert_eq!(slots[0].label, "08:00");
        assert_eq!(slots[12].label, "20:00");

        let zones = repo.list_zones().await.unwrap();
        assert_eq!(zones.len(), 5);
        assert_eq!(zones[0].kind, ZoneKind::Cardio);
        assert_eq!(zones[4].kind, ZoneKind::Yoga);

        let trainers = repo.list_trainers().await.unwrap();
        assert_eq!(trainers.len(), 3);
        assert!(repo.trainer_exists(trainers[0].id).await.unwrap());
        assert!(!repo.trainer_exists(999).await.unwrap());
        assert!(repo.zone_exists(zones[0].id).await.unwrap());
        assert!(!repo.zone_exists(999).await.unwrap());
    }
}
