//! # Database Migrations
//!
//! Schema migrations live in `migrations/` using the `YYYYMMDDHHMMSS_description.sql`
//! naming convention and are embedded at compile time. sqlx records applied
//! versions in `_sqlx_migrations` and serializes concurrent runners with an
//! advisory lock.

use sqlx::migrate::{MigrateError, Migrator};
use sqlx::PgPool;
use tracing::info;

pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

pub struct DatabaseMigrations;

impl DatabaseMigrations {
    /// Apply all outstanding migrations
    pub async fn run_all(pool: &PgPool) -> Result<(), MigrateError> {
        let known = MIGRATOR.iter().count();
        info!(migrations = known, "Running database migrations");
        MIGRATOR.run(pool).await?;
        info!("Database schema is up to date");
        Ok(())
    }

    pub fn migrator() -> &'static Migrator {
        &MIGRATOR
    }
}
