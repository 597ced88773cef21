//! Atrium content store.
//!
//! [`ContentStore`] is the query seam the site needs from the CMS. Two
//! adapters implement it: [`PgContentStore`] over PostgreSQL and
//! [`MemoryContentStore`] for fixtures and tests.

use sqlx::postgres::PgPoolOptions;

pub mod error;
pub mod models;
pub mod repositories;
pub mod store;

pub use error::StoreError;
pub use store::memory::MemoryContentStore;
pub use store::pg::PgContentStore;
pub use store::query::{PageQuery, ParentFilter, PostQuery, PostSort, Visibility};
pub use store::ContentStore;

pub type DbPool = sqlx::PgPool;

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to confirm the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply pending migrations from `crates/db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
