//! Webhook API Handlers

use axum::{
    Json,
    body::Bytes,
    extract::{Query, State},
    http::HeaderMap,
};
use serde::Deserialize;

use crate::core::ServerState;
use crate::fulfillment::{WebhookAck, WebhookEvent, WebhookIngestor, authenticate};
use crate::utils::{AppError, AppResult};

const SECRET_HEADER: &str = "x-webhook-secret";
const SIGNATURE_HEADER: &str = "x-webhook-signature";

/// Query params accepted by the webhook endpoint
#[derive(Debug, Deserialize)]
pub struct WebhookQuery {
    pub secret: Option<String>,
}

/// Receive a provider fulfillment event
///
/// The body is taken raw so that malformed JSON maps to a 400 rather than
/// the framework's rejection, and so the (reserved) signature slot keeps
/// access to the exact bytes it would verify.
pub async fn receive(
    State(state): State<ServerState>,
    Query(query): Query<WebhookQuery>,
    headers: HeaderMap,
    body: Bytes,
) -> AppResult<Json<WebhookAck>> {
    authenticate(
        &state.config.webhook_secret,
        header_str(&headers, SECRET_HEADER),
        query.secret.as_deref(),
        header_str(&headers, SIGNATURE_HEADER),
    )?;

    let event: WebhookEvent = serde_json::from_slice(&body)
        .map_err(|e| AppError::validation(format!("Malformed webhook body: {e}")))?;

    let ingestor = WebhookIngestor::new(state.db.clone(), state.provider.clone());
    let ack = ingestor.ingest(event).await?;
    Ok(Json(ack))
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}
