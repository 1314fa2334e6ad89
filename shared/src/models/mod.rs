//! Domain models

pub mod business_hours;
pub mod counter;
pub mod order;
pub mod settings;

pub use business_hours::{DayHours, SpecialHour, WeeklyHours, special_for_date};
pub use counter::{CounterError, DEFAULT_ORDER_NUMBER_START, OrderNumberCounter};
pub use order::{
    GeoPoint, Order, OrderCreate, OrderCreated, OrderItem, OrderItemInput, OrderStatus,
    OrderStatusUpdate, PickupTime,
};
pub use settings::{DEFAULT_TAX_RATE, TaxSettings};
