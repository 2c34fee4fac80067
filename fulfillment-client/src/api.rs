//! Provider API seam
//!
//! The server consumes the provider through this trait rather than the
//! concrete [`FulfillmentClient`], so lifecycle and reconciliation logic can
//! be exercised against a mock provider in tests.

use async_trait::async_trait;

use crate::ClientResult;
use crate::http::FulfillmentClient;
use crate::types::{
    ProviderOrder, ProviderOrderRequest, ProviderProduct, QuoteRequest, QuoteResponse,
    ShipmentMethod,
};

/// Operations the platform needs from the fulfillment provider
#[async_trait]
pub trait ProviderApi: Send + Sync {
    async fn create_quote(&self, request: &QuoteRequest) -> ClientResult<QuoteResponse>;
    async fn create_order(&self, request: &ProviderOrderRequest) -> ClientResult<ProviderOrder>;
    async fn get_order(&self, remote_order_id: &str) -> ClientResult<ProviderOrder>;
    async fn confirm_draft(&self, remote_order_id: &str) -> ClientResult<ProviderOrder>;
    async fn get_product(&self, product_uid: &str) -> ClientResult<ProviderProduct>;
    async fn list_shipment_methods(&self) -> ClientResult<Vec<ShipmentMethod>>;
}

#[async_trait]
impl ProviderApi for FulfillmentClient {
    async fn create_quote(&self, request: &QuoteRequest) -> ClientResult<QuoteResponse> {
        FulfillmentClient::create_quote(self, request).await
    }

    async fn create_order(&self, request: &ProviderOrderRequest) -> ClientResult<ProviderOrder> {
        FulfillmentClient::create_order(self, request).await
    }

    async fn get_order(&self, remote_order_id: &str) -> ClientResult<ProviderOrder> {
        FulfillmentClient::get_order(self, remote_order_id).await
    }

    async fn confirm_draft(&self, remote_order_id: &str) -> ClientResult<ProviderOrder> {
        FulfillmentClient::confirm_draft(self, remote_order_id).await
    }

    async fn get_product(&self, product_uid: &str) -> ClientResult<ProviderProduct> {
        FulfillmentClient::get_product(self, product_uid).await
    }

    async fn list_shipment_methods(&self) -> ClientResult<Vec<ShipmentMethod>> {
        FulfillmentClient::list_shipment_methods(self).await
    }
}
