pub mod app_config;
pub mod booking_repo;
pub mod catalog_repo;
pub mod database;
pub mod user_repo;

pub use booking_repo::SqliteBookingRepository;
pub use catalog_repo::SqliteCatalogRepository;
pub use database::Database;
pub use user_repo::SqliteUserRepository;
