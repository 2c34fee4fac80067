//! Card Request Model
//!
//! Owned by the card CRUD subsystem. Fulfillment reads the ID through
//! order items and writes `print_status` only.

use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

use shared::CardPrintStatus;

use super::serde_thing;

/// Card record, as far as fulfillment is concerned
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardRequest {
    #[serde(
        with = "serde_thing::option",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub id: Option<Thing>,
    #[serde(default)]
    pub title: Option<String>,
    /// Mirrored from the owning print order; the only field this
    /// subsystem writes
    #[serde(default)]
    pub print_status: Option<CardPrintStatus>,
    #[serde(default)]
    pub updated_at: i64,
}
