//! Print Order API Module
//!
//! Management surface for print orders. Reading a single order triggers
//! pull-path reconciliation against the provider.

mod handler;

use axum::{
    Router,
    routing::{get, patch, post},
};

use crate::core::ServerState;

/// Print order router
pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/print-orders", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", post(handler::create).get(handler::list))
        .route("/quote", post(handler::quote))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/confirm", patch(handler::confirm))
}
