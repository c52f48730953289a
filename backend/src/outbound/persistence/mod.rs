//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain repository ports backed by
//! PostgreSQL via `diesel-async` with `bb8` connection pooling.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. No business logic resides here.
//! - **Internal models**: row structs (`models.rs`) and schema definitions
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: database failures map to the persistence
//!   error variants the domain expects.

mod diesel_parcel_repository;
mod diesel_user_repository;
mod models;
mod pool;
mod schema;

pub use diesel_parcel_repository::DieselParcelRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};

use diesel::pg::PgConnection;
use diesel::Connection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

/// Embedded migrations from the backend/migrations directory.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending migrations against the given database.
///
/// Uses a short-lived synchronous connection on a blocking thread; the
/// migration harness is not async.
///
/// # Errors
///
/// Returns [`PoolError::Build`] when the connection cannot be established
/// or a migration fails.
pub async fn run_migrations(database_url: &str) -> Result<(), PoolError> {
    let database_url = database_url.to_owned();
    tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&database_url)
            .map_err(|err| PoolError::build(err.to_string()))?;
        conn.run_pending_migrations(MIGRATIONS)
            .map_err(|err| PoolError::build(err.to_string()))?;
        Ok(())
    })
    .await
    .map_err(|err| PoolError::build(format!("migration task panicked: {err}")))?
}
