//! Order Repository

use sqlx::SqlitePool;
use uuid::Uuid;

use super::{RepoError, RepoResult};
use crate::db::SchemaCapabilities;
use shared::models::{GeoPoint, Order, OrderItem, OrderStatus, PickupTime};

/// Raw `orders` row
///
/// The collection-time columns default to NULL when a legacy schema does
/// not have them, so `SELECT *` works against both layouts.
#[derive(Debug, sqlx::FromRow)]
struct OrderRow {
    id: String,
    order_number: i64,
    user_id: String,
    items: String,
    status: String,
    pickup_time: String,
    #[sqlx(default)]
    collection_time_minutes: Option<i64>,
    #[sqlx(default)]
    estimated_ready_at: Option<i64>,
    created_at: i64,
    share_location: bool,
    current_location: Option<String>,
}

impl TryFrom<OrderRow> for Order {
    type Error = RepoError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let corrupt = |field: &str, detail: String| {
            RepoError::Database(format!("corrupt order row ({}): {}", field, detail))
        };

        let items: Vec<OrderItem> = serde_json::from_str(&row.items)
            .map_err(|e| corrupt("items", e.to_string()))?;
        let current_location: Option<GeoPoint> = match &row.current_location {
            Some(raw) => {
                Some(serde_json::from_str(raw).map_err(|e| corrupt("current_location", e.to_string()))?)
            }
            None => None,
        };

        Ok(Order {
            id: Uuid::parse_str(&row.id).map_err(|e| corrupt("id", e.to_string()))?,
            order_number: row.order_number,
            user_id: Uuid::parse_str(&row.user_id).map_err(|e| corrupt("user_id", e.to_string()))?,
            items,
            status: row.status.parse().map_err(|e| corrupt("status", e))?,
            pickup_time: PickupTime::try_from(row.pickup_time)
                .map_err(|e| corrupt("pickup_time", e))?,
            collection_time_minutes: row.collection_time_minutes,
            estimated_ready_at: row.estimated_ready_at,
            created_at: row.created_at,
            share_location: row.share_location,
            current_location,
        })
    }
}

/// Status write for a planned transition
#[derive(Debug, Clone)]
pub struct StatusWrite {
    pub status: OrderStatus,
    /// Write the collection-time columns (transition into `preparing`)
    pub set_collection: bool,
    pub collection_time_minutes: Option<i64>,
    pub estimated_ready_at: Option<i64>,
}

/// Insert a new order
///
/// Only the base columns are written — the collection-time fields are
/// never set at creation, so inserts work unchanged on legacy schemas.
pub async fn insert(pool: &SqlitePool, order: &Order) -> RepoResult<()> {
    let items = serde_json::to_string(&order.items)
        .map_err(|e| RepoError::Validation(format!("unserializable items: {}", e)))?;
    let location = order
        .current_location
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(|e| RepoError::Validation(format!("unserializable location: {}", e)))?;

    sqlx::query(
        "INSERT INTO orders (id, order_number, user_id, items, status, pickup_time, created_at, share_location, current_location)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )
    .bind(order.id.to_string())
    .bind(order.order_number)
    .bind(order.user_id.to_string())
    .bind(items)
    .bind(order.status.as_str())
    .bind(String::from(order.pickup_time.clone()))
    .bind(order.created_at)
    .bind(order.share_location)
    .bind(location)
    .execute(pool)
    .await?;
    Ok(())
}

/// Fetch a single order
pub async fn get(pool: &SqlitePool, id: Uuid) -> RepoResult<Option<Order>> {
    let row = sqlx::query_as::<_, OrderRow>("SELECT * FROM orders WHERE id = ?1")
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?;
    row.map(Order::try_from).transpose()
}

/// List orders, newest first, optionally scoped to one owner
pub async fn list(pool: &SqlitePool, user_id: Option<Uuid>) -> RepoResult<Vec<Order>> {
    let rows = match user_id {
        Some(uid) => {
            sqlx::query_as::<_, OrderRow>(
                "SELECT * FROM orders WHERE user_id = ?1 ORDER BY created_at DESC",
            )
            .bind(uid.to_string())
            .fetch_all(pool)
            .await?
        }
        None => {
            sqlx::query_as::<_, OrderRow>("SELECT * FROM orders ORDER BY created_at DESC")
                .fetch_all(pool)
                .await?
        }
    };
    rows.into_iter().map(Order::try_from).collect()
}

/// List orders in a given status, newest first
pub async fn list_by_status(pool: &SqlitePool, status: OrderStatus) -> RepoResult<Vec<Order>> {
    let rows = sqlx::query_as::<_, OrderRow>(
        "SELECT * FROM orders WHERE status = ?1 ORDER BY created_at DESC",
    )
    .bind(status.as_str())
    .fetch_all(pool)
    .await?;
    rows.into_iter().map(Order::try_from).collect()
}

/// Apply a planned status transition and return the updated row
///
/// The collection-time columns are only touched when the schema supports
/// them; otherwise the write degrades to status-only and the feature is
/// silently unavailable. The status column itself never degrades.
pub async fn update_status(
    pool: &SqlitePool,
    caps: &SchemaCapabilities,
    id: Uuid,
    write: &StatusWrite,
) -> RepoResult<Order> {
    let row = if write.set_collection && caps.supports_collection_time() {
        sqlx::query_as::<_, OrderRow>(
            "UPDATE orders
             SET status = ?1, collection_time_minutes = ?2, estimated_ready_at = ?3
             WHERE id = ?4
             RETURNING *",
        )
        .bind(write.status.as_str())
        .bind(write.collection_time_minutes)
        .bind(write.estimated_ready_at)
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?
    } else {
        sqlx::query_as::<_, OrderRow>(
            "UPDATE orders SET status = ?1 WHERE id = ?2 RETURNING *",
        )
        .bind(write.status.as_str())
        .bind(id.to_string())
        .fetch_optional(pool)
        .await?
    };

    row.ok_or_else(|| RepoError::NotFound(format!("Order not found: {}", id)))?
        .try_into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::util::now_millis;

    fn sample_order(number: i64, created_at: i64) -> Order {
        Order {
            id: Uuid::new_v4(),
            order_number: number,
            user_id: Uuid::new_v4(),
            items: vec![OrderItem {
                menu_item_id: "flat-white".to_string(),
                name: "Flat White".to_string(),
                unit_price: 32.0,
                quantity: 1,
                variant: None,
                extras: vec![],
                notes: None,
            }],
            status: OrderStatus::Pending,
            pickup_time: PickupTime::Asap,
            collection_time_minutes: None,
            estimated_ready_at: None,
            created_at,
            share_location: false,
            current_location: None,
        }
    }

    #[tokio::test]
    async fn test_insert_and_get_round_trip() {
        let pool = crate::db::open_in_memory().await;
        let order = sample_order(1001, now_millis());
        insert(&pool, &order).await.unwrap();

        let fetched = get(&pool, order.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, order.id);
        assert_eq!(fetched.order_number, 1001);
        assert_eq!(fetched.status, OrderStatus::Pending);
        assert_eq!(fetched.items, order.items);
        assert!(fetched.pickup_time.is_asap());
    }

    #[tokio::test]
    async fn test_list_is_newest_first() {
        let pool = crate::db::open_in_memory().await;
        let base = now_millis();
        for i in 0..3 {
            insert(&pool, &sample_order(1001 + i, base + i * 1000))
                .await
                .unwrap();
        }

        let orders = list(&pool, None).await.unwrap();
        assert_eq!(orders.len(), 3);
        assert!(orders.windows(2).all(|w| w[0].created_at >= w[1].created_at));
        assert_eq!(orders[0].order_number, 1003);
    }

    #[tokio::test]
    async fn test_list_scoped_to_owner() {
        let pool = crate::db::open_in_memory().await;
        let mine = sample_order(1001, now_millis());
        let theirs = sample_order(1002, now_millis());
        insert(&pool, &mine).await.unwrap();
        insert(&pool, &theirs).await.unwrap();

        let orders = list(&pool, Some(mine.user_id)).await.unwrap();
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].id, mine.id);
    }

    #[tokio::test]
    async fn test_update_status_writes_collection_fields() {
        let pool = crate::db::open_in_memory().await;
        let caps = SchemaCapabilities::probe(&pool).await.unwrap();
        let order = sample_order(1001, now_millis());
        insert(&pool, &order).await.unwrap();

        let ready_at = order.created_at + 15 * 60_000;
        let updated = update_status(
            &pool,
            &caps,
            order.id,
            &StatusWrite {
                status: OrderStatus::Preparing,
                set_collection: true,
                collection_time_minutes: Some(15),
                estimated_ready_at: Some(ready_at),
            },
        )
        .await
        .unwrap();

        assert_eq!(updated.status, OrderStatus::Preparing);
        assert_eq!(updated.collection_time_minutes, Some(15));
        assert_eq!(updated.estimated_ready_at, Some(ready_at));

        // A later transition leaves the collection fields untouched
        let ready = update_status(
            &pool,
            &caps,
            order.id,
            &StatusWrite {
                status: OrderStatus::Ready,
                set_collection: false,
                collection_time_minutes: None,
                estimated_ready_at: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(ready.status, OrderStatus::Ready);
        assert_eq!(ready.collection_time_minutes, Some(15));
    }

    #[tokio::test]
    async fn test_update_status_unknown_order_is_not_found() {
        let pool = crate::db::open_in_memory().await;
        let caps = SchemaCapabilities::probe(&pool).await.unwrap();
        let err = update_status(
            &pool,
            &caps,
            Uuid::new_v4(),
            &StatusWrite {
                status: OrderStatus::Preparing,
                set_collection: false,
                collection_time_minutes: None,
                estimated_ready_at: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_legacy_schema_degrades_collection_writes() {
        use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
        use std::str::FromStr;

        let options = SqliteConnectOptions::from_str("sqlite::memory:").unwrap();
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .unwrap();
        sqlx::raw_sql(
            "CREATE TABLE orders (
                id TEXT PRIMARY KEY,
                order_number INTEGER NOT NULL UNIQUE,
                user_id TEXT NOT NULL,
                items TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                pickup_time TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                share_location INTEGER NOT NULL DEFAULT 0,
                current_location TEXT
            );",
        )
        .execute(&pool)
        .await
        .unwrap();

        let caps = SchemaCapabilities::probe(&pool).await.unwrap();
        assert!(!caps.supports_collection_time());

        let order = sample_order(1001, now_millis());
        insert(&pool, &order).await.unwrap();

        // The preparing transition still lands; the estimate is dropped
        let updated = update_status(
            &pool,
            &caps,
            order.id,
            &StatusWrite {
                status: OrderStatus::Preparing,
                set_collection: true,
                collection_time_minutes: Some(15),
                estimated_ready_at: Some(order.created_at + 900_000),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.status, OrderStatus::Preparing);
        assert_eq!(updated.collection_time_minutes, None);
        assert_eq!(updated.estimated_ready_at, None);
    }
}
