//! Print Order vocabulary
//!
//! Status enums for print orders plus the two translation tables used by
//! both fulfillment sync paths (on-read reconciliation and webhook ingest):
//!
//! - provider fulfillment status string -> [`PrintOrderStatus`]
//! - [`PrintOrderStatus`] -> card `print_status` ([`CardPrintStatus`])
//!
//! Both tables are closed: unknown inputs translate to `None`, never to an
//! error. The allowed-transition table lives here as well so the two sync
//! paths cannot drift apart on what counts as a stale update.

use serde::{Deserialize, Serialize};

use super::card_request::CardPrintStatus;

/// Print order lifecycle status
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PrintOrderStatus {
    #[default]
    Draft,
    Pending,
    Production,
    Shipped,
    Delivered,
    Cancelled,
    Failed,
}

impl PrintOrderStatus {
    /// Translate a provider fulfillment status into the local vocabulary.
    ///
    /// Closed table: unknown provider statuses return `None` (keep the
    /// stored status unchanged).
    pub fn from_provider(status: &str) -> Option<Self> {
        match status {
            "created" | "passed" => Some(Self::Pending),
            "in_production" => Some(Self::Production),
            "shipped" => Some(Self::Shipped),
            "delivered" => Some(Self::Delivered),
            "canceled" | "cancelled" => Some(Self::Cancelled),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Card-level projection table.
    ///
    /// Only production/shipped/delivered project onto linked card records;
    /// every other status propagates nothing.
    pub fn card_print_status(self) -> Option<CardPrintStatus> {
        match self {
            Self::Production => Some(CardPrintStatus::Ordered),
            Self::Shipped => Some(CardPrintStatus::Shipped),
            Self::Delivered => Some(CardPrintStatus::Delivered),
            _ => None,
        }
    }

    /// Position in the forward lifecycle, `None` for terminal failure states.
    fn lifecycle_rank(self) -> Option<u8> {
        match self {
            Self::Draft => Some(0),
            Self::Pending => Some(1),
            Self::Production => Some(2),
            Self::Shipped => Some(3),
            Self::Delivered => Some(4),
            Self::Cancelled | Self::Failed => None,
        }
    }

    /// True once no further provider updates may move this order.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled | Self::Failed)
    }

    /// Allowed-transition table.
    ///
    /// Forward moves along draft -> pending -> production -> shipped ->
    /// delivered (provider may skip intermediate states), cancelled/failed
    /// from any non-terminal state, nothing out of a terminal state. A
    /// stale webhook replaying an older status therefore never moves the
    /// record backward.
    pub fn can_transition_to(self, next: Self) -> bool {
        if self == next || self.is_terminal() {
            return false;
        }
        match (self.lifecycle_rank(), next.lifecycle_rank()) {
            (Some(from), Some(to)) => to > from,
            // cancelled/failed reachable from any non-terminal state
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Pending => "pending",
            Self::Production => "production",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
            Self::Failed => "failed",
        }
    }
}

impl std::fmt::Display for PrintOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Draft vs. committed order
///
/// Flips draft -> order exactly once, through confirmation only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum PrintOrderType {
    #[default]
    Draft,
    Order,
}

impl std::fmt::Display for PrintOrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Draft => f.write_str("draft"),
            Self::Order => f.write_str("order"),
        }
    }
}

/// Shipping address for a print order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    pub address_line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub post_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    /// ISO 3166-1 alpha-2
    pub country: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}
