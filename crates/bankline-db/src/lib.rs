//! Bankline Database Layer
//!
//! Persistence for bank accounts. Everything above this crate talks to the
//! [`AccountStore`] capability; two implementations are provided:
//!
//! - **PostgreSQL** ([`AccountRepo`]): the production store, schema managed by
//!   SQLx migrations.
//! - **In-memory** ([`MemoryAccountStore`]): used by tests and by the server's
//!   development mode.

pub mod config;
pub mod error;
pub mod memory;
pub mod models;
pub mod repos;
pub mod store;

use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::info;

pub use config::DatabaseConfig;
pub use error::{DbError, DbResult};
pub use memory::MemoryAccountStore;
pub use models::*;
pub use repos::*;
pub use store::AccountStore;

/// PostgreSQL connection pool
pub struct Database {
    /// PostgreSQL connection pool
    pub pg: PgPool,
}

impl Database {
    /// Connect to PostgreSQL
    pub async fn connect(config: &DatabaseConfig) -> DbResult<Self> {
        info!("Connecting to PostgreSQL: {}", config.postgres_url_masked());

        let pg = PgPoolOptions::new()
            .max_connections(config.pg_max_connections)
            .min_connections(config.pg_min_connections)
            .acquire_timeout(std::time::Duration::from_secs(config.pg_acquire_timeout_secs))
            .connect(&config.postgres_url)
            .await
            .map_err(|e| DbError::Connection(format!("PostgreSQL: {}", e)))?;

        info!("Connected to PostgreSQL");

        Ok(Self { pg })
    }

    /// Run database migrations
    pub async fn migrate(&self) -> DbResult<()> {
        info!("Running database migrations...");
        sqlx::migrate!("./migrations")
            .run(&self.pg)
            .await
            .map_err(|e| DbError::Migration(e.to_string()))?;
        info!("Migrations complete");
        Ok(())
    }

    /// Account repository backed by this pool
    pub fn account_repo(&self) -> AccountRepo {
        AccountRepo::new(self.pg.clone())
    }
}
