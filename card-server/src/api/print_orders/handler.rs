//! Print Order API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::db::models::{PrintOrder, PrintOrderDetail};
use crate::db::repository::PrintOrderRepository;
use crate::fulfillment::{CreateOrderRequest, OrderService, QuoteOrderRequest, StatusReconciler};
use crate::utils::{AppError, AppResult};
use fulfillment_client::QuoteResponse;

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// List all print orders (paginated, newest first)
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<PrintOrder>>> {
    let repo = PrintOrderRepository::new(state.db.clone());
    let orders = repo.find_all(query.limit, query.offset).await?;
    Ok(Json(orders))
}

/// Get order by id
///
/// Reading an order with a remote counterpart reconciles its status from
/// the provider first; the caller always receives the freshest state the
/// provider would let us observe.
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<PrintOrderDetail>> {
    let repo = PrintOrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Print order {} not found", id)))?;

    let reconciler = StatusReconciler::new(state.db.clone(), state.provider.clone());
    let order = reconciler.reconcile_on_read(order).await;

    let items = repo.find_items(&order.key()).await?;
    Ok(Json(PrintOrderDetail { order, items }))
}

/// Create a print order
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CreateOrderRequest>,
) -> AppResult<Json<PrintOrderDetail>> {
    let service = OrderService::new(state.db.clone(), state.provider.clone());
    let detail = service.create_order(payload).await?;
    Ok(Json(detail))
}

/// Confirm a draft order
pub async fn confirm(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<PrintOrder>> {
    let service = OrderService::new(state.db.clone(), state.provider.clone());
    let order = service.confirm(&id).await?;
    Ok(Json(order))
}

/// Quote a prospective order
pub async fn quote(
    State(state): State<ServerState>,
    Json(payload): Json<QuoteOrderRequest>,
) -> AppResult<Json<QuoteResponse>> {
    let service = OrderService::new(state.db.clone(), state.provider.clone());
    let response = service.quote(payload).await?;
    Ok(Json(response))
}
