//! Webhook API Module
//!
//! Inbound surface for provider-initiated fulfillment events. Sits
//! outside /api: the provider is not a session-authenticated client, it
//! authenticates per request with the shared webhook secret.

mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

/// Webhook router
pub fn router() -> Router<ServerState> {
    Router::new().route("/webhooks/fulfillment", post(handler::receive))
}
