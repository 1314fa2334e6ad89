//! Schema capability negotiation
//!
//! Hosted deployments have drifted on the optional collection-time
//! columns. Instead of catching backend errors by message substring, the
//! available columns are probed once at startup and write payloads omit
//! unsupported optional fields proactively. Only additive fields degrade
//! this way — identity and status columns are always required.

use dashmap::DashMap;
use sqlx::SqlitePool;
use tracing::warn;

/// Optional `orders` columns that may be missing on older schemas
pub const OPTIONAL_ORDER_COLUMNS: [&str; 2] = ["collection_time_minutes", "estimated_ready_at"];

/// Probed column support, keyed `table.column`
#[derive(Debug, Default)]
pub struct SchemaCapabilities {
    columns: DashMap<String, bool>,
}

impl SchemaCapabilities {
    /// Probe the live schema
    pub async fn probe(pool: &SqlitePool) -> Result<Self, sqlx::Error> {
        let caps = Self::default();
        let present: Vec<String> =
            sqlx::query_scalar("SELECT name FROM pragma_table_info('orders')")
                .fetch_all(pool)
                .await?;

        for column in OPTIONAL_ORDER_COLUMNS {
            let supported = present.iter().any(|c| c == column);
            if !supported {
                warn!(
                    column,
                    "orders column not found; collection-time features degrade to unavailable"
                );
            }
            caps.columns
                .insert(format!("orders.{}", column), supported);
        }
        Ok(caps)
    }

    /// Capabilities with every optional column assumed present (tests)
    pub fn assume_full() -> Self {
        let caps = Self::default();
        for column in OPTIONAL_ORDER_COLUMNS {
            caps.columns.insert(format!("orders.{}", column), true);
        }
        caps
    }

    pub fn supports(&self, table: &str, column: &str) -> bool {
        self.columns
            .get(&format!("{}.{}", table, column))
            .map(|v| *v)
            .unwrap_or(false)
    }

    /// Whether both collection-time columns are writable
    pub fn supports_collection_time(&self) -> bool {
        self.supports("orders", "collection_time_minutes")
            && self.supports("orders", "estimated_ready_at")
    }
}
