//! Print Order Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use surrealdb::sql::Thing;

use shared::{PrintOrderStatus, PrintOrderType, ShippingAddress};

use super::serde_thing;

pub type PrintOrderId = Thing;

/// Print order row
///
/// `remote_order_id` is assigned exactly once, when the provider-side
/// creation succeeds; `order_type` flips draft -> order exactly once,
/// through confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintOrder {
    #[serde(
        with = "serde_thing::option",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub id: Option<PrintOrderId>,
    /// Locally generated, time-based reference correlating with the provider
    pub reference: String,
    /// Provider-assigned order ID; immutable once set
    pub remote_order_id: Option<String>,
    #[serde(default)]
    pub status: PrintOrderStatus,
    #[serde(default)]
    pub order_type: PrintOrderType,
    pub shipping_address: ShippingAddress,
    pub shipping_method: Option<String>,
    pub quote_amount: Option<Decimal>,
    pub quote_currency: String,
    pub tracking_url: Option<String>,
    pub tracking_code: Option<String>,
    pub created_by: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl PrintOrder {
    /// Record key without the table prefix, empty before creation
    pub fn key(&self) -> String {
        self.id
            .as_ref()
            .map(|t| t.id.to_raw())
            .unwrap_or_default()
    }
}

/// Print order line item
///
/// `card_request_id` references a card record owned by the card CRUD
/// subsystem; the item does not own it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintOrderItem {
    #[serde(
        with = "serde_thing::option",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub id: Option<Thing>,
    /// Owning order, "print_order:key" form
    pub print_order_id: String,
    pub card_request_id: String,
    pub product_uid: String,
    pub quantity: u32,
    pub front_file_url: String,
    pub back_file_url: Option<String>,
}

/// Order with its line items, as returned by the management API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrintOrderDetail {
    #[serde(flatten)]
    pub order: PrintOrder,
    pub items: Vec<PrintOrderItem>,
}

/// Partial write produced by status reconciliation
///
/// Only fields that actually changed are present; merge semantics leave
/// the rest of the row untouched.
#[derive(Debug, Clone, Serialize)]
pub struct PrintOrderSyncUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PrintOrderStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_code: Option<String>,
    pub updated_at: i64,
}
