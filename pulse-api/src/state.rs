use std::sync::Arc;

use pulse_booking::{AvailabilityComputer, BookingPolicy, ConflictResolver};
use pulse_core::repository::{BookingRepository, CatalogRepository, UserRepository};
use pulse_store::{Database, SqliteBookingRepository, SqliteCatalogRepository, SqliteUserRepository};

#[derive(Clone)]
pub struct AuthConfig {
    pub secret: String,
    pub expiration: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub catalog: Arc<dyn CatalogRepository>,
    pub ledger: Arc<dyn BookingRepository>,
    pub resolver: Arc<ConflictResolver>,
    pub availability: Arc<AvailabilityComputer>,
    pub auth: AuthConfig,
}

impl AppState {
    /// Wire the SQLite repositories and the booking engine onto one database
    /// handle.
    pub fn new(db: &Database, auth: AuthConfig, policy: BookingPolicy) -> Self {
        let users: Arc<dyn UserRepository> = Arc::new(SqliteUserRepository::new(db.pool.clone()));
        let catalog: Arc<dyn CatalogRepository> =
            Arc::new(SqliteCatalogRepository::new(db.pool.clone()));
        let ledger: Arc<dyn BookingRepository> =
            Arc::new(SqliteBookingRepository::new(db.pool.clone()));

        let resolver = Arc::new(ConflictResolver::new(
            catalog.clone(),
            ledger.clone(),
            policy,
        ));
        let availability = Arc::new(AvailabilityComputer::new(catalog.clone(), ledger.clone()));

        Self {
            users,
            catalog,
            ledger,
            resolver,
            availability,
            auth,
        }
    }
}
