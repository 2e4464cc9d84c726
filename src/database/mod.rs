//! # Database Operations
//!
//! Pool construction, schema migrations and initial data seeding.
//!
//! - [`connection`] - pool construction from configuration and health checks
//! - [`migrations`] - embedded schema migrations
//! - [`seed`] - default administrator, sample trader and contract template

pub mod connection;
pub mod migrations;
pub mod seed;

pub use connection::{health_check, DatabaseConnection};
pub use migrations::DatabaseMigrations;
pub use seed::{seed_initial_data, SeedReport};
