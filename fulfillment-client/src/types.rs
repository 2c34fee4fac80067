//! Provider wire types
//!
//! Request/response shapes of the provider REST surface. The provider
//! speaks camelCase JSON; everything here is renamed accordingly.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::ShippingAddress;

/// Recipient address in the provider's shape
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderAddress {
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    pub address_line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address_line2: Option<String>,
    pub city: String,
    pub post_code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub country: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl From<&ShippingAddress> for ProviderAddress {
    fn from(addr: &ShippingAddress) -> Self {
        Self {
            first_name: addr.first_name.clone(),
            last_name: addr.last_name.clone(),
            company_name: addr.company.clone(),
            address_line1: addr.address_line1.clone(),
            address_line2: addr.address_line2.clone(),
            city: addr.city.clone(),
            post_code: addr.post_code.clone(),
            state: addr.state.clone(),
            country: addr.country.clone(),
            email: addr.email.clone(),
            phone: addr.phone.clone(),
        }
    }
}

/// Print file attached to an order item, tagged by side
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderFile {
    /// File slot: "front" or "back"
    #[serde(rename = "type")]
    pub file_type: String,
    pub url: String,
}

/// Order line item in the provider's shape
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderOrderItem {
    pub item_reference_id: String,
    pub product_uid: String,
    pub quantity: u32,
    pub files: Vec<ProviderFile>,
}

/// Order creation request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderOrderRequest {
    /// Locally generated reference correlating local and provider records
    pub order_reference_id: String,
    /// "draft" or "order"
    pub order_type: String,
    pub currency: String,
    pub items: Vec<ProviderOrderItem>,
    pub shipping_address: ProviderAddress,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipment_method_uid: Option<String>,
}

/// Shipment attached to a provider order
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderShipment {
    #[serde(default)]
    pub tracking_url: Option<String>,
    #[serde(default)]
    pub tracking_code: Option<String>,
    #[serde(default)]
    pub shipment_method_name: Option<String>,
}

/// Provider-side order record
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderOrder {
    /// Provider-assigned order ID
    pub id: String,
    #[serde(default)]
    pub order_reference_id: Option<String>,
    /// "draft" until the draft is confirmed, then "order"
    #[serde(default)]
    pub order_type: Option<String>,
    /// Provider status vocabulary; translated locally, never stored as-is
    pub fulfillment_status: String,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub total_incl_vat: Option<Decimal>,
    #[serde(default)]
    pub shipments: Vec<ProviderShipment>,
}

impl ProviderOrder {
    /// Tracking fields from the first shipment, if any.
    ///
    /// Later shipments are ignored; single-shipment orders are the normal
    /// case for this product.
    pub fn first_tracking(&self) -> (Option<String>, Option<String>) {
        match self.shipments.first() {
            Some(shipment) => (shipment.tracking_url.clone(), shipment.tracking_code.clone()),
            None => (None, None),
        }
    }
}

/// Quote request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub order_reference_id: String,
    pub currency: String,
    pub items: Vec<ProviderOrderItem>,
    pub shipping_address: ProviderAddress,
}

/// Single quote option returned by the provider
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderQuote {
    pub amount: Decimal,
    pub currency: String,
    pub shipment_method_uid: String,
    #[serde(default)]
    pub min_delivery_days: Option<u32>,
    #[serde(default)]
    pub max_delivery_days: Option<u32>,
}

/// Quote response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteResponse {
    pub quotes: Vec<ProviderQuote>,
}

/// Product metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProviderProduct {
    pub product_uid: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub attributes: Option<serde_json::Value>,
}

/// Available shipment method
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShipmentMethod {
    pub shipment_method_uid: String,
    pub name: String,
    #[serde(rename = "type", default)]
    pub method_type: Option<String>,
    #[serde(default)]
    pub supported_countries: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_order_deserializes_camel_case() {
        let json = r#"{
            "id": "G123",
            "orderReferenceId": "po-42",
            "fulfillmentStatus": "in_production",
            "currency": "EUR",
            "shipments": [
                {"trackingUrl": "https://t.example/1", "trackingCode": "TRK1"},
                {"trackingUrl": "https://t.example/2", "trackingCode": "TRK2"}
            ]
        }"#;
        let order: ProviderOrder = serde_json::from_str(json).unwrap();
        assert_eq!(order.id, "G123");
        assert_eq!(order.fulfillment_status, "in_production");
        let (url, code) = order.first_tracking();
        assert_eq!(url.as_deref(), Some("https://t.example/1"));
        assert_eq!(code.as_deref(), Some("TRK1"));
    }

    #[test]
    fn tracking_absent_without_shipments() {
        let json = r#"{"id": "G9", "fulfillmentStatus": "created"}"#;
        let order: ProviderOrder = serde_json::from_str(json).unwrap();
        assert_eq!(order.first_tracking(), (None, None));
    }

    #[test]
    fn file_type_uses_reserved_keyword_rename() {
        let file = ProviderFile {
            file_type: "front".to_string(),
            url: "https://cdn.example/f.pdf".to_string(),
        };
        let json = serde_json::to_string(&file).unwrap();
        assert!(json.contains("\"type\":\"front\""));
    }
}
