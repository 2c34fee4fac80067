//! Client configuration

/// Configuration for connecting to the fulfillment provider
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Provider API base URL (e.g., "https://api.printprovider.example")
    pub base_url: String,

    /// Provider API key, sent as `X-API-Key` on every request
    pub api_key: String,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: api_key.into(),
            timeout: 30,
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Create a fulfillment client from this configuration
    pub fn build_client(&self) -> super::FulfillmentClient {
        super::FulfillmentClient::new(self)
    }
}
