//! Catalog API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::core::ServerState;
use crate::utils::AppResult;
use fulfillment_client::{ProviderProduct, ShipmentMethod};

/// Get provider product metadata
pub async fn get_product(
    State(state): State<ServerState>,
    Path(uid): Path<String>,
) -> AppResult<Json<ProviderProduct>> {
    let product = state.provider.get_product(&uid).await?;
    Ok(Json(product))
}

/// List provider shipment methods
pub async fn list_shipment_methods(
    State(state): State<ServerState>,
) -> AppResult<Json<Vec<ShipmentMethod>>> {
    let methods = state.provider.list_shipment_methods().await?;
    Ok(Json(methods))
}
