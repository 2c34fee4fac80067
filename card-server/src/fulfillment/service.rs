//! Order Lifecycle
//!
//! Creation and confirmation of print orders. Both operations are
//! remote-then-local sequences with no cross-system transaction, so each
//! one records a fulfillment intent before touching the provider; the
//! sweep repairs sequences that die between the two writes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use validator::Validate;

use crate::db::models::{
    FulfillmentIntent, IntentKind, IntentState, PrintOrder, PrintOrderDetail, PrintOrderItem,
};
use crate::db::repository::{FulfillmentIntentRepository, PrintOrderRepository};
use crate::utils::{AppError, AppResult};
use fulfillment_client::{
    ProviderAddress, ProviderApi, ProviderFile, ProviderOrder, ProviderOrderItem,
    ProviderOrderRequest, QuoteRequest, QuoteResponse,
};
use shared::{PrintOrderStatus, PrintOrderType, ShippingAddress};

const FILE_TYPE_FRONT: &str = "front";
const FILE_TYPE_BACK: &str = "back";

/// Print file reference, tagged by side
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderFileRequest {
    /// "front" or "back"
    #[serde(rename = "type")]
    pub file_type: String,
    pub url: String,
}

/// One requested line item
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrderItemRequest {
    pub card_request_id: String,
    pub product_uid: String,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: u32,
    pub files: Vec<OrderFileRequest>,
}

impl CreateOrderItemRequest {
    fn file_url(&self, file_type: &str) -> Option<String> {
        self.files
            .iter()
            .find(|f| f.file_type == file_type)
            .map(|f| f.url.clone())
    }
}

/// Order creation request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CreateOrderRequest {
    #[validate(length(min = 1, message = "Order must contain at least one item"), nested)]
    pub items: Vec<CreateOrderItemRequest>,
    pub shipping_address: Option<ShippingAddress>,
    #[serde(default)]
    pub shipping_method: Option<String>,
    pub currency: Option<String>,
    #[serde(default)]
    pub order_type: Option<PrintOrderType>,
    #[serde(default)]
    pub created_by: Option<String>,
}

/// Quote request for the order form
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct QuoteOrderRequest {
    #[validate(length(min = 1, message = "Quote must contain at least one item"), nested)]
    pub items: Vec<CreateOrderItemRequest>,
    pub shipping_address: Option<ShippingAddress>,
    pub currency: Option<String>,
}

pub struct OrderService {
    orders: PrintOrderRepository,
    intents: FulfillmentIntentRepository,
    provider: Arc<dyn ProviderApi>,
}

impl OrderService {
    pub fn new(db: Surreal<Db>, provider: Arc<dyn ProviderApi>) -> Self {
        Self {
            orders: PrintOrderRepository::new(db.clone()),
            intents: FulfillmentIntentRepository::new(db),
            provider,
        }
    }

    /// Create an order: validate, create remotely, persist locally.
    ///
    /// Validation failures reject the request before any remote call or
    /// local write. A local persistence failure after remote creation is
    /// logged and left to the intent sweep to repair.
    pub async fn create_order(&self, request: CreateOrderRequest) -> AppResult<PrintOrderDetail> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let (address, currency) = extract_address_currency(
            request.shipping_address.as_ref(),
            request.currency.as_deref(),
        )?;
        validate_item_files(&request.items)?;

        let reference = shared::util::order_reference();
        let now = shared::util::now_millis();

        let intent = self
            .intents
            .create(FulfillmentIntent {
                id: None,
                kind: IntentKind::Create,
                state: IntentState::Pending,
                reference: Some(reference.clone()),
                remote_order_id: None,
                order_id: None,
                payload: serde_json::to_value(&request)
                    .map_err(|e| AppError::internal(format!("Failed to encode intent: {e}")))?,
                created_at: now,
                updated_at: now,
            })
            .await?;
        let intent_key = intent.key();

        let provider_request =
            build_provider_request(&reference, &request, &address, &currency);
        let remote = match self.provider.create_order(&provider_request).await {
            Ok(remote) => remote,
            Err(e) => {
                if let Err(mark_err) = self.intents.mark_failed(&intent_key).await {
                    tracing::warn!(intent = %intent_key, "Failed to mark intent failed: {mark_err}");
                }
                return Err(e.into());
            }
        };

        if let Err(e) = self
            .intents
            .mark_remote_done(&intent_key, Some(&remote.id))
            .await
        {
            tracing::warn!(intent = %intent_key, "Failed to record remote order ID on intent: {e}");
        }

        let (order, items) = build_order_rows(&reference, &request, &address, &currency, &remote)?;
        let created = match self.orders.create(order, items).await {
            Ok(created) => created,
            Err(e) => {
                tracing::error!(
                    intent = %intent_key,
                    remote_order_id = %remote.id,
                    "Local persistence failed after remote creation; sweep will repair: {e}"
                );
                return Err(e.into());
            }
        };

        if let Err(e) = self.intents.mark_fulfilled(&intent_key).await {
            tracing::warn!(intent = %intent_key, "Failed to mark intent fulfilled: {e}");
        }

        tracing::info!(
            order = %reference,
            remote_order_id = %remote.id,
            "Print order created"
        );

        let items = self.orders.find_items(&created.key()).await?;
        Ok(PrintOrderDetail {
            order: created,
            items,
        })
    }

    /// Confirm a draft order.
    ///
    /// Preconditions are checked before any remote call: the order must
    /// exist, carry a remote order ID, and still be a draft. On success
    /// status and order type flip in a single local write.
    pub async fn confirm(&self, order_id: &str) -> AppResult<PrintOrder> {
        let order = self
            .orders
            .find_by_id(order_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Print order {order_id} not found")))?;

        let Some(remote_order_id) = order.remote_order_id.clone() else {
            return Err(AppError::validation("Order has no remote order ID"));
        };
        if order.order_type != PrintOrderType::Draft {
            return Err(AppError::validation("Order is already confirmed"));
        }

        let now = shared::util::now_millis();
        let order_ref = order
            .id
            .as_ref()
            .map(|t| t.to_string())
            .ok_or_else(|| AppError::internal("Stored order has no ID"))?;

        let intent = self
            .intents
            .create(FulfillmentIntent {
                id: None,
                kind: IntentKind::Confirm,
                state: IntentState::Pending,
                reference: Some(order.reference.clone()),
                remote_order_id: Some(remote_order_id.clone()),
                order_id: Some(order_ref),
                payload: serde_json::Value::Null,
                created_at: now,
                updated_at: now,
            })
            .await?;
        let intent_key = intent.key();

        if let Err(e) = self.provider.confirm_draft(&remote_order_id).await {
            if let Err(mark_err) = self.intents.mark_failed(&intent_key).await {
                tracing::warn!(intent = %intent_key, "Failed to mark intent failed: {mark_err}");
            }
            return Err(e.into());
        }

        if let Err(e) = self.intents.mark_remote_done(&intent_key, None).await {
            tracing::warn!(intent = %intent_key, "Failed to advance intent: {e}");
        }

        let confirmed = match self.orders.confirm(&order.key()).await {
            Ok(confirmed) => confirmed,
            Err(e) => {
                tracing::error!(
                    intent = %intent_key,
                    remote_order_id = %remote_order_id,
                    "Local confirm failed after remote confirm; sweep will repair: {e}"
                );
                return Err(e.into());
            }
        };

        if let Err(e) = self.intents.mark_fulfilled(&intent_key).await {
            tracing::warn!(intent = %intent_key, "Failed to mark intent fulfilled: {e}");
        }

        tracing::info!(order = %order.reference, "Draft order confirmed");
        Ok(confirmed)
    }

    /// Quote passthrough for the order form
    pub async fn quote(&self, request: QuoteOrderRequest) -> AppResult<QuoteResponse> {
        request
            .validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;
        let (address, currency) = extract_address_currency(
            request.shipping_address.as_ref(),
            request.currency.as_deref(),
        )?;

        let provider_request = QuoteRequest {
            order_reference_id: shared::util::order_reference(),
            currency,
            items: provider_items(&request.items),
            shipping_address: ProviderAddress::from(&address),
        };

        Ok(self.provider.create_quote(&provider_request).await?)
    }
}

/// Shipping address and currency are required before anything leaves the
/// process; absence is a 400, not a provider error.
pub(crate) fn extract_address_currency(
    address: Option<&ShippingAddress>,
    currency: Option<&str>,
) -> AppResult<(ShippingAddress, String)> {
    let address = address
        .cloned()
        .ok_or_else(|| AppError::validation("Shipping address is required"))?;
    let currency = currency
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .ok_or_else(|| AppError::validation("Currency code is required"))?;
    Ok((address, currency.to_string()))
}

/// Every item must carry a front file in its tagged file list
pub(crate) fn validate_item_files(items: &[CreateOrderItemRequest]) -> AppResult<()> {
    for (index, item) in items.iter().enumerate() {
        if item.file_url(FILE_TYPE_FRONT).is_none() {
            return Err(AppError::validation(format!(
                "Item {index} is missing a front file"
            )));
        }
    }
    Ok(())
}

fn provider_items(items: &[CreateOrderItemRequest]) -> Vec<ProviderOrderItem> {
    items
        .iter()
        .map(|item| ProviderOrderItem {
            item_reference_id: item.card_request_id.clone(),
            product_uid: item.product_uid.clone(),
            quantity: item.quantity,
            files: item
                .files
                .iter()
                .map(|f| ProviderFile {
                    file_type: f.file_type.clone(),
                    url: f.url.clone(),
                })
                .collect(),
        })
        .collect()
}

pub(crate) fn build_provider_request(
    reference: &str,
    request: &CreateOrderRequest,
    address: &ShippingAddress,
    currency: &str,
) -> ProviderOrderRequest {
    ProviderOrderRequest {
        order_reference_id: reference.to_string(),
        order_type: request.order_type.unwrap_or_default().to_string(),
        currency: currency.to_string(),
        items: provider_items(&request.items),
        shipping_address: ProviderAddress::from(address),
        shipment_method_uid: request.shipping_method.clone(),
    }
}

/// Build the local rows mirroring a successful provider creation.
///
/// Shared with the intent sweep, which replays exactly this construction
/// from the stored request payload when the original local write was lost.
pub(crate) fn build_order_rows(
    reference: &str,
    request: &CreateOrderRequest,
    address: &ShippingAddress,
    currency: &str,
    remote: &ProviderOrder,
) -> AppResult<(PrintOrder, Vec<PrintOrderItem>)> {
    let now = shared::util::now_millis();

    let order = PrintOrder {
        id: None,
        reference: reference.to_string(),
        remote_order_id: Some(remote.id.clone()),
        status: PrintOrderStatus::Draft,
        order_type: request.order_type.unwrap_or_default(),
        shipping_address: address.clone(),
        shipping_method: request.shipping_method.clone(),
        quote_amount: remote.total_incl_vat,
        quote_currency: remote.currency.clone().unwrap_or_else(|| currency.to_string()),
        tracking_url: None,
        tracking_code: None,
        created_by: request
            .created_by
            .clone()
            .unwrap_or_else(|| "system".to_string()),
        created_at: now,
        updated_at: now,
    };

    let items = request
        .items
        .iter()
        .map(|item| {
            let front_file_url = item.file_url(FILE_TYPE_FRONT).ok_or_else(|| {
                AppError::validation(format!(
                    "Item for card {} is missing a front file",
                    item.card_request_id
                ))
            })?;
            Ok(PrintOrderItem {
                id: None,
                print_order_id: String::new(),
                card_request_id: item.card_request_id.clone(),
                product_uid: item.product_uid.clone(),
                quantity: item.quantity,
                front_file_url,
                back_file_url: item.file_url(FILE_TYPE_BACK),
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok((order, items))
}
