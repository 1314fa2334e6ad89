//! Order Model

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

// ============================================================================
// Order Status
// ============================================================================

/// Order status lifecycle
///
/// `pending` is the initial status; `collected` and `cancelled` are terminal.
/// Stored rows and wire payloads use the lowercase form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Ready,
    Collected,
    Cancelled,
}

impl OrderStatus {
    /// Terminal statuses accept no further transitions
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Collected | OrderStatus::Cancelled)
    }

    /// Stored text form (lowercase, same as the serde representation)
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Collected => "collected",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "preparing" => Ok(OrderStatus::Preparing),
            "ready" => Ok(OrderStatus::Ready),
            "collected" => Ok(OrderStatus::Collected),
            "cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(format!("unknown order status: {}", other)),
        }
    }
}

// ============================================================================
// Pickup Time
// ============================================================================

/// Requested pickup time
///
/// `"ASAP"` is the sentinel for as-soon-as-possible; anything else is an
/// RFC 3339 timestamp. The stored/wire form is always a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum PickupTime {
    Asap,
    /// Unix millis of the requested pickup timestamp
    At(i64),
}

impl PickupTime {
    pub fn is_asap(&self) -> bool {
        matches!(self, PickupTime::Asap)
    }
}

impl From<PickupTime> for String {
    fn from(value: PickupTime) -> Self {
        match value {
            PickupTime::Asap => "ASAP".to_string(),
            PickupTime::At(millis) => crate::util::millis_to_rfc3339(millis),
        }
    }
}

impl TryFrom<String> for PickupTime {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.eq_ignore_ascii_case("ASAP") {
            return Ok(PickupTime::Asap);
        }
        crate::util::rfc3339_to_millis(&value)
            .map(PickupTime::At)
            .ok_or_else(|| format!("invalid pickup time: {}", value))
    }
}

// ============================================================================
// Location
// ============================================================================

/// Customer location shared at checkout (present only when opted in)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

// ============================================================================
// Order Items
// ============================================================================

/// Order line item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Menu item reference (String ID)
    pub menu_item_id: String,
    pub name: String,
    /// Unit price in currency unit
    pub unit_price: f64,
    pub quantity: i32,
    /// Selected variant (e.g. size), if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    /// Selected extras (names, snapshot at order time)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extras: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl OrderItem {
    /// Line total before tax
    pub fn line_total(&self) -> f64 {
        self.unit_price * self.quantity as f64
    }
}

/// Line item input for order creation
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderItemInput {
    pub menu_item_id: String,
    pub name: String,
    pub unit_price: f64,
    #[validate(range(min = 1, message = "quantity must be positive"))]
    pub quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    #[serde(default)]
    pub extras: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl From<OrderItemInput> for OrderItem {
    fn from(input: OrderItemInput) -> Self {
        OrderItem {
            menu_item_id: input.menu_item_id,
            name: input.name,
            unit_price: input.unit_price,
            quantity: input.quantity,
            variant: input.variant,
            extras: input.extras,
            notes: input.notes,
        }
    }
}

// ============================================================================
// Order Entity
// ============================================================================

/// Order entity
///
/// Created by checkout with status `pending`; mutated only by status
/// transitions and the one-time collection-time fields. Timestamps are
/// Unix millis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    /// Human-facing sequential number, unique across all orders
    pub order_number: i64,
    pub user_id: Uuid,
    pub items: Vec<OrderItem>,
    pub status: OrderStatus,
    pub pickup_time: PickupTime,
    /// Operator estimate set on the transition into `preparing`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_time_minutes: Option<i64>,
    /// Derived: transition-to-preparing time + collection time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_ready_at: Option<i64>,
    pub created_at: i64,
    #[serde(default)]
    pub share_location: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_location: Option<GeoPoint>,
}

impl Order {
    /// Order total before tax
    pub fn subtotal(&self) -> f64 {
        self.items.iter().map(OrderItem::line_total).sum()
    }

    /// Tax amount for the given settings (0.0 when taxes are disabled)
    pub fn tax(&self, settings: &super::TaxSettings) -> f64 {
        if settings.enabled {
            self.subtotal() * settings.rate
        } else {
            0.0
        }
    }
}

// ============================================================================
// Payloads
// ============================================================================

/// Create order payload (checkout)
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct OrderCreate {
    pub user_id: Uuid,
    #[validate(length(min = 1, message = "order must contain at least one item"), nested)]
    pub items: Vec<OrderItemInput>,
    pub pickup_time: PickupTime,
    #[serde(default)]
    pub share_location: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_location: Option<GeoPoint>,
}

/// Created order reference returned by checkout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreated {
    pub id: Uuid,
    pub order_number: i64,
}

/// Status transition request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
    /// Only meaningful on the transition into `preparing`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collection_time_minutes: Option<i64>,
}
