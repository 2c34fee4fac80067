//! HTTP client for provider API calls

use std::sync::Arc;

use reqwest::{Client, Method, header::HeaderValue};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::types::{
    ProviderOrder, ProviderOrderRequest, ProviderProduct, QuoteRequest, QuoteResponse,
    ShipmentMethod,
};
use crate::{ClientConfig, ClientError, ClientResult, ExponentialBackoff, RetryPolicy};

const API_KEY_HEADER: &str = "X-API-Key";

/// HTTP client for the print fulfillment provider
///
/// Holds one reusable connection pool; construct once at startup and share.
#[derive(Debug, Clone)]
pub struct FulfillmentClient {
    client: Client,
    base_url: String,
    api_key: String,
    retry: Arc<dyn RetryPolicy>,
}

impl FulfillmentClient {
    /// Create a new client from configuration with the default retry policy
    pub fn new(config: &ClientConfig) -> Self {
        Self::with_retry_policy(config, Arc::new(ExponentialBackoff::default()))
    }

    /// Create a new client with an explicit retry policy
    pub fn with_retry_policy(config: &ClientConfig, retry: Arc<dyn RetryPolicy>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            retry,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Send one request, retrying transport failures per the retry policy.
    ///
    /// HTTP error responses are decoded into [`ClientError::Api`] and
    /// surfaced immediately; only connection-level failures loop.
    async fn request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> ClientResult<T> {
        let url = self.url(path);
        let mut attempt: u32 = 0;

        loop {
            let mut request = self
                .client
                .request(method.clone(), &url)
                .header(API_KEY_HEADER, HeaderValue::from_str(&self.api_key)
                    .map_err(|_| ClientError::InvalidResponse("API key is not a valid header value".into()))?);

            if let Some(body) = body {
                request = request.json(body);
            }

            match request.send().await {
                Ok(response) => return Self::handle_response(response).await,
                Err(e) => match self.retry.backoff(attempt + 1) {
                    Some(delay) => {
                        attempt += 1;
                        tracing::warn!(
                            attempt,
                            delay_ms = delay.as_millis() as u64,
                            path,
                            "Provider request failed, retrying: {e}"
                        );
                        tokio::time::sleep(delay).await;
                    }
                    None => return Err(ClientError::Transport(e)),
                },
            }
        }
    }

    /// Decode a response, mapping HTTP errors through the provider error body
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::from_error_body(status.as_u16(), &text));
        }

        response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    // ========== Provider API ==========

    /// Request a price quote for a prospective order
    pub async fn create_quote(&self, request: &QuoteRequest) -> ClientResult<QuoteResponse> {
        self.request(Method::POST, "v4/quotes", Some(request)).await
    }

    /// Create an order (draft or live) on the provider side
    pub async fn create_order(&self, request: &ProviderOrderRequest) -> ClientResult<ProviderOrder> {
        self.request(Method::POST, "v4/orders", Some(request)).await
    }

    /// Fetch the provider's current view of an order
    pub async fn get_order(&self, remote_order_id: &str) -> ClientResult<ProviderOrder> {
        self.request::<_, ()>(Method::GET, &format!("v4/orders/{remote_order_id}"), None)
            .await
    }

    /// Convert a draft order into a live order
    pub async fn confirm_draft(&self, remote_order_id: &str) -> ClientResult<ProviderOrder> {
        let body = serde_json::json!({ "orderType": "order" });
        self.request(
            Method::PATCH,
            &format!("v4/orders/{remote_order_id}"),
            Some(&body),
        )
        .await
    }

    /// Fetch product metadata by product uid
    pub async fn get_product(&self, product_uid: &str) -> ClientResult<ProviderProduct> {
        self.request::<_, ()>(Method::GET, &format!("v4/products/{product_uid}"), None)
            .await
    }

    /// List the provider's shipment methods
    pub async fn list_shipment_methods(&self) -> ClientResult<Vec<ShipmentMethod>> {
        self.request::<_, ()>(Method::GET, "v4/shipment-methods", None)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let config = ClientConfig::new("https://api.example/", "key");
        let client = FulfillmentClient::new(&config);
        assert_eq!(client.url("/v4/orders"), "https://api.example/v4/orders");
        assert_eq!(client.url("v4/quotes"), "https://api.example/v4/quotes");
    }
}
