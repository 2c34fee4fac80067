//! Shared test fixtures: embedded test database, mock provider, seed data.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use rust_decimal::Decimal;
use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use card_server::db::define_schema;
use card_server::db::models::{CardRequest, PrintOrder, PrintOrderItem};
use card_server::db::repository::PrintOrderRepository;
use fulfillment_client::{
    ClientError, ClientResult, ProviderApi, ProviderOrder, ProviderOrderRequest, ProviderProduct,
    ProviderQuote, ProviderShipment, QuoteRequest, QuoteResponse, ShipmentMethod,
};
use shared::{PrintOrderStatus, PrintOrderType, ShippingAddress};

/// Embedded database in a temp dir; keep the TempDir alive for the test
pub async fn test_db() -> (Surreal<Db>, tempfile::TempDir) {
    let tmp = tempfile::tempdir().unwrap();
    let db: Surreal<Db> = Surreal::new::<RocksDb>(tmp.path()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    define_schema(&db).await.unwrap();
    (db, tmp)
}

/// In-memory provider double with call counters
#[derive(Default)]
pub struct MockProvider {
    orders: Mutex<HashMap<String, ProviderOrder>>,
    pub create_calls: AtomicUsize,
    pub confirm_calls: AtomicUsize,
    pub get_calls: AtomicUsize,
    /// Respond to create_order with this provider status code instead
    pub create_error: Option<u16>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_create(status: u16) -> Self {
        Self {
            create_error: Some(status),
            ..Self::default()
        }
    }

    /// Register a provider-side order for get/confirm lookups
    pub fn register_order(&self, order: ProviderOrder) {
        self.orders.lock().unwrap().insert(order.id.clone(), order);
    }

    pub fn set_status(&self, remote_id: &str, status: &str, shipments: Vec<ProviderShipment>) {
        let mut orders = self.orders.lock().unwrap();
        let order = orders.get_mut(remote_id).expect("order not registered");
        order.fulfillment_status = status.to_string();
        order.shipments = shipments;
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn confirm_calls(&self) -> usize {
        self.confirm_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProviderApi for MockProvider {
    async fn create_quote(&self, request: &QuoteRequest) -> ClientResult<QuoteResponse> {
        Ok(QuoteResponse {
            quotes: vec![ProviderQuote {
                amount: Decimal::new(2450, 2),
                currency: request.currency.clone(),
                shipment_method_uid: "standard".to_string(),
                min_delivery_days: Some(3),
                max_delivery_days: Some(7),
            }],
        })
    }

    async fn create_order(&self, request: &ProviderOrderRequest) -> ClientResult<ProviderOrder> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(status) = self.create_error {
            return Err(ClientError::from_error_body(
                status,
                r#"{"message":"create rejected","code":"test_failure"}"#,
            ));
        }

        let mut orders = self.orders.lock().unwrap();
        let id = format!("G{}", orders.len() + 1);
        let order = ProviderOrder {
            id: id.clone(),
            order_reference_id: Some(request.order_reference_id.clone()),
            order_type: Some(request.order_type.clone()),
            fulfillment_status: "created".to_string(),
            currency: Some(request.currency.clone()),
            total_incl_vat: Some(Decimal::new(2450, 2)),
            shipments: vec![],
        };
        orders.insert(id, order.clone());
        Ok(order)
    }

    async fn get_order(&self, remote_order_id: &str) -> ClientResult<ProviderOrder> {
        self.get_calls.fetch_add(1, Ordering::SeqCst);
        self.orders
            .lock()
            .unwrap()
            .get(remote_order_id)
            .cloned()
            .ok_or_else(|| {
                ClientError::from_error_body(404, r#"{"message":"Order not found"}"#)
            })
    }

    async fn confirm_draft(&self, remote_order_id: &str) -> ClientResult<ProviderOrder> {
        self.confirm_calls.fetch_add(1, Ordering::SeqCst);
        let mut orders = self.orders.lock().unwrap();
        let order = orders.get_mut(remote_order_id).ok_or_else(|| {
            ClientError::from_error_body(404, r#"{"message":"Order not found"}"#)
        })?;
        order.order_type = Some("order".to_string());
        Ok(order.clone())
    }

    async fn get_product(&self, product_uid: &str) -> ClientResult<ProviderProduct> {
        Ok(ProviderProduct {
            product_uid: product_uid.to_string(),
            title: Some("Business cards 85x55".to_string()),
            description: None,
            attributes: None,
        })
    }

    async fn list_shipment_methods(&self) -> ClientResult<Vec<ShipmentMethod>> {
        Ok(vec![ShipmentMethod {
            shipment_method_uid: "standard".to_string(),
            name: "Standard".to_string(),
            method_type: Some("normal".to_string()),
            supported_countries: vec!["DE".to_string(), "GB".to_string()],
        }])
    }
}

/// Well-formed creation request for the given cards
pub fn create_request(card_keys: &[&str]) -> card_server::fulfillment::CreateOrderRequest {
    use card_server::fulfillment::{CreateOrderItemRequest, CreateOrderRequest, OrderFileRequest};

    CreateOrderRequest {
        items: card_keys
            .iter()
            .map(|key| CreateOrderItemRequest {
                card_request_id: format!("card_request:{key}"),
                product_uid: "cards_85x55_350gsm".to_string(),
                quantity: 100,
                files: vec![
                    OrderFileRequest {
                        file_type: "front".to_string(),
                        url: format!("https://cdn.example/{key}-front.pdf"),
                    },
                    OrderFileRequest {
                        file_type: "back".to_string(),
                        url: format!("https://cdn.example/{key}-back.pdf"),
                    },
                ],
            })
            .collect(),
        shipping_address: Some(sample_address()),
        shipping_method: Some("standard".to_string()),
        currency: Some("EUR".to_string()),
        order_type: None,
        created_by: Some("tests".to_string()),
    }
}

pub fn sample_address() -> ShippingAddress {
    ShippingAddress {
        first_name: "Ada".to_string(),
        last_name: "Lovelace".to_string(),
        company: None,
        address_line1: "12 Analytical Way".to_string(),
        address_line2: None,
        city: "London".to_string(),
        post_code: "N1 9GU".to_string(),
        state: None,
        country: "GB".to_string(),
        email: "ada@example.com".to_string(),
        phone: None,
    }
}

/// Seed a card record the projector can write to
pub async fn seed_card(db: &Surreal<Db>, key: &str) {
    let _: Option<CardRequest> = db
        .create(("card_request", key))
        .content(CardRequest {
            id: None,
            title: Some(format!("card {key}")),
            print_status: None,
            updated_at: shared::util::now_millis(),
        })
        .await
        .unwrap();
}

/// Seed a local order with line items pointing at the given cards
pub async fn seed_order(
    db: &Surreal<Db>,
    remote_order_id: Option<&str>,
    status: PrintOrderStatus,
    order_type: PrintOrderType,
    card_keys: &[&str],
) -> PrintOrder {
    let repo = PrintOrderRepository::new(db.clone());
    let now = shared::util::now_millis();

    let order = PrintOrder {
        id: None,
        reference: shared::util::order_reference(),
        remote_order_id: remote_order_id.map(str::to_string),
        status,
        order_type,
        shipping_address: sample_address(),
        shipping_method: Some("standard".to_string()),
        quote_amount: Some(Decimal::new(2450, 2)),
        quote_currency: "EUR".to_string(),
        tracking_url: None,
        tracking_code: None,
        created_by: "tests".to_string(),
        created_at: now,
        updated_at: now,
    };

    let items = card_keys
        .iter()
        .map(|key| PrintOrderItem {
            id: None,
            print_order_id: String::new(),
            card_request_id: format!("card_request:{key}"),
            product_uid: "cards_85x55_350gsm".to_string(),
            quantity: 100,
            front_file_url: "https://cdn.example/front.pdf".to_string(),
            back_file_url: Some("https://cdn.example/back.pdf".to_string()),
        })
        .collect();

    repo.create(order, items).await.unwrap()
}
