//! Persistence for the brigade kitchen order engine.
//!
//! Layout mirrors the persisted-state contract: per-workspace partitions
//! holding a dish table, raw rows for queued tickets (the heap is
//! rebuilt on load, never persisted as an array), and an append-only
//! completion log.
//!
//! - [`models`] — row structs and insert payloads.
//! - [`repositories`] — sqlx query modules, one per table.
//! - [`store`] — the [`store::Store`] backend trait with a PostgreSQL
//!   implementation ([`store::PgStore`]) and an in-memory one
//!   ([`store::MemStore`]) for tests and single-node use.

pub mod models;
pub mod repositories;
pub mod store;

pub use store::{MemStore, PgStore, Store, StoreError};

/// Connection pool type used throughout.
pub type DbPool = sqlx::PgPool;

/// Embedded SQL migrations.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
}

/// Apply all pending migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await
}

/// Verify the database answers a trivial query.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1")
        .fetch_one(pool)
        .await
        .map(|_| ())
}
