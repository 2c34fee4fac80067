//! Shared types for the card platform
//!
//! Domain vocabulary used by the card server and its client surfaces:
//! print-order status enums, the provider status translation tables,
//! shipping types, and ID/time utilities.

pub mod models;
pub mod util;

// Re-exports
pub use models::{CardPrintStatus, PrintOrderStatus, PrintOrderType, ShippingAddress};
