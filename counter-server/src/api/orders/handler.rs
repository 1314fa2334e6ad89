//! Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::core::AppState;
use crate::db::repository::order as order_repo;
use crate::orders::service;
use crate::utils::{AppError, AppResult};
use shared::models::{Order, OrderCreate, OrderCreated, OrderStatusUpdate};

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub user_id: Option<Uuid>,
}

/// Create an order (checkout)
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<OrderCreated>> {
    let created = service::create_order(&state, payload).await?;
    Ok(Json(created))
}

/// List orders, newest first, optionally scoped to one customer
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<Json<Vec<Order>>> {
    let orders = order_repo::list(&state.pool, params.user_id).await?;
    Ok(Json(orders))
}

/// Live order board snapshot
pub async fn board(State(state): State<AppState>) -> Json<Vec<Order>> {
    Json(state.board.snapshot())
}

/// Fetch a single order
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Order>> {
    let order = order_repo::get(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Order not found: {}", id)))?;
    Ok(Json(order))
}

/// Request a status transition
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<OrderStatusUpdate>,
) -> AppResult<Json<Order>> {
    let order = service::update_status(&state, id, request).await?;
    Ok(Json(order))
}
