//! Card Request print status
//!
//! Card records are owned by the card CRUD subsystem; fulfillment only ever
//! writes their `print_status` field, and only through the projection table
//! in [`print_order`](super::print_order).

use serde::{Deserialize, Serialize};

/// Print status mirrored onto card records linked to a print order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CardPrintStatus {
    Ordered,
    Shipped,
    Delivered,
}

impl CardPrintStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ordered => "ordered",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
        }
    }
}

impl std::fmt::Display for CardPrintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
