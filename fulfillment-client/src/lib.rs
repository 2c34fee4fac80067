//! Fulfillment Client - HTTP client for the print fulfillment provider
//!
//! Single authenticated entry point for all provider calls: quotes, order
//! creation, status lookup, draft confirmation, product metadata and
//! shipment methods. Network failures are retried through a swappable
//! [`RetryPolicy`]; HTTP error responses are never retried.

pub mod api;
pub mod config;
pub mod error;
pub mod http;
pub mod retry;
pub mod types;

pub use api::ProviderApi;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use http::FulfillmentClient;
pub use retry::{ExponentialBackoff, NoRetry, RetryPolicy};
pub use types::{
    ProviderAddress, ProviderFile, ProviderOrder, ProviderOrderItem, ProviderOrderRequest,
    ProviderProduct, ProviderQuote, ProviderShipment, QuoteRequest, QuoteResponse, ShipmentMethod,
};
