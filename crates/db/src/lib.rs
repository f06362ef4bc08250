//! PostgreSQL snapshot reader for the report's source tables.
//!
//! Each source table has a row model in [`models`] and a zero-sized
//! repository in [`repositories`]. [`snapshot::load_snapshot`] reads all four
//! tables for one run and converts them into core types.

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod models;
pub mod repositories;
pub mod snapshot;

pub use error::DbError;
pub use snapshot::load_snapshot;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

/// Verify the pool can reach the database.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}
