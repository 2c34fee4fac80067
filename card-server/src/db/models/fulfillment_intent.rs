//! Fulfillment Intent Model
//!
//! Saga-style record written before every remote-then-local sequence
//! (order creation, draft confirmation). The remote call and the local
//! write cannot share a transaction, so the intent row is what lets the
//! sweep detect "remote succeeded, local unwritten" and repair it.

use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

use super::serde_thing;

/// Which remote-then-local sequence the intent guards
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum IntentKind {
    Create,
    Confirm,
}

/// Intent progress
///
/// `Pending` -> `RemoteDone` -> `Fulfilled`. A crash between the remote
/// call and the local write leaves `RemoteDone` behind; the sweep repairs
/// those. `Failed` marks intents that cannot be repaired automatically.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum IntentState {
    Pending,
    RemoteDone,
    Fulfilled,
    Failed,
}

/// Fulfillment intent row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FulfillmentIntent {
    #[serde(
        with = "serde_thing::option",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub id: Option<Thing>,
    pub kind: IntentKind,
    pub state: IntentState,
    /// Local order reference (create intents)
    pub reference: Option<String>,
    /// Provider order ID, recorded as soon as the remote call succeeds
    pub remote_order_id: Option<String>,
    /// Local order ID, "print_order:key" form (confirm intents)
    pub order_id: Option<String>,
    /// Original request payload, kept so the sweep can replay the local write
    pub payload: serde_json::Value,
    pub created_at: i64,
    pub updated_at: i64,
}

impl FulfillmentIntent {
    pub fn key(&self) -> String {
        self.id
            .as_ref()
            .map(|t| t.id.to_raw())
            .unwrap_or_default()
    }
}
