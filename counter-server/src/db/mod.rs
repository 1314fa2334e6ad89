//! Database layer
//!
//! Embedded SQLite via sqlx — the local-development variant of the hosted
//! relational store. Schema is bootstrapped at startup; the hosted
//! deployment owns its own migrations, so every statement here is
//! idempotent.

pub mod capabilities;
pub mod repository;

pub use capabilities::SchemaCapabilities;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS orders (
    id                      TEXT PRIMARY KEY,
    order_number            INTEGER NOT NULL UNIQUE,
    user_id                 TEXT NOT NULL,
    items                   TEXT NOT NULL,
    status                  TEXT NOT NULL DEFAULT 'pending',
    pickup_time             TEXT NOT NULL,
    collection_time_minutes INTEGER,
    estimated_ready_at      INTEGER,
    created_at              INTEGER NOT NULL,
    share_location          INTEGER NOT NULL DEFAULT 0,
    current_location        TEXT
);

CREATE INDEX IF NOT EXISTS idx_orders_user_created
    ON orders(user_id, created_at DESC);

CREATE INDEX IF NOT EXISTS idx_orders_status
    ON orders(status);

CREATE TABLE IF NOT EXISTS app_settings (
    key         TEXT PRIMARY KEY,
    value       TEXT NOT NULL,
    description TEXT,
    updated_at  INTEGER NOT NULL
);
";

/// Open a connection pool for the given `sqlite:` URL
///
/// Creates the database file if missing.
pub async fn connect(database_url: &str) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    SqlitePoolOptions::new()
        .max_connections(8)
        .connect_with(options)
        .await
}

/// Create tables and indexes if they do not exist yet
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA).execute(pool).await?;
    Ok(())
}

/// In-memory database for tests
///
/// Single connection — each `:memory:` connection is its own database.
#[cfg(test)]
pub async fn open_in_memory() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:").expect("options");
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .expect("in-memory pool");
    init_schema(&pool).await.expect("schema");
    pool
}
