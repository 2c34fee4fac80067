//! Catalog API Module
//!
//! Read-only passthrough of provider product metadata and shipment
//! methods, consumed by the order form.

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

/// Catalog router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/fulfillment", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/products/{uid}", get(handler::get_product))
        .route("/shipment-methods", get(handler::list_shipment_methods))
}
