//! Order lifecycle tests: creation and confirmation preconditions, the
//! remote-then-local sequence, and intent bookkeeping.

mod common;

use std::sync::Arc;

use common::{MockProvider, create_request, sample_address, seed_order, test_db};

use card_server::AppError;
use card_server::db::models::{FulfillmentIntent, IntentState};
use card_server::db::repository::PrintOrderRepository;
use card_server::fulfillment::OrderService;
use shared::{PrintOrderStatus, PrintOrderType};

async fn all_intents(db: &surrealdb::Surreal<surrealdb::engine::local::Db>) -> Vec<FulfillmentIntent> {
    db.select("fulfillment_intent").await.unwrap()
}

#[tokio::test]
async fn create_with_empty_items_rejected_before_remote_call() {
    let (db, _tmp) = test_db().await;
    let provider = Arc::new(MockProvider::new());
    let service = OrderService::new(db.clone(), provider.clone());

    let mut request = create_request(&[]);
    request.items.clear();

    let err = service.create_order(request).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "got {err:?}");

    // no remote call, no local rows, no intent
    assert_eq!(provider.create_calls(), 0);
    let orders = PrintOrderRepository::new(db.clone())
        .find_all(10, 0)
        .await
        .unwrap();
    assert!(orders.is_empty());
    assert!(all_intents(&db).await.is_empty());
}

#[tokio::test]
async fn create_without_shipping_address_rejected() {
    let (db, _tmp) = test_db().await;
    let provider = Arc::new(MockProvider::new());
    let service = OrderService::new(db.clone(), provider.clone());

    let mut request = create_request(&["c1"]);
    request.shipping_address = None;

    let err = service.create_order(request).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(provider.create_calls(), 0);
}

#[tokio::test]
async fn create_without_currency_rejected() {
    let (db, _tmp) = test_db().await;
    let provider = Arc::new(MockProvider::new());
    let service = OrderService::new(db.clone(), provider.clone());

    let mut request = create_request(&["c1"]);
    request.currency = Some("  ".to_string());

    let err = service.create_order(request).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(provider.create_calls(), 0);
}

#[tokio::test]
async fn create_without_front_file_rejected() {
    let (db, _tmp) = test_db().await;
    let provider = Arc::new(MockProvider::new());
    let service = OrderService::new(db.clone(), provider.clone());

    let mut request = create_request(&["c1"]);
    request.items[0].files.retain(|f| f.file_type != "front");

    let err = service.create_order(request).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(provider.create_calls(), 0);
    assert!(all_intents(&db).await.is_empty());
}

#[tokio::test]
async fn create_persists_order_and_items() {
    let (db, _tmp) = test_db().await;
    let provider = Arc::new(MockProvider::new());
    let service = OrderService::new(db.clone(), provider.clone());

    let detail = service
        .create_order(create_request(&["c1", "c2"]))
        .await
        .unwrap();

    assert_eq!(provider.create_calls(), 1);
    assert_eq!(detail.order.remote_order_id.as_deref(), Some("G1"));
    assert_eq!(detail.order.status, PrintOrderStatus::Draft);
    assert_eq!(detail.order.order_type, PrintOrderType::Draft);
    assert!(detail.order.quote_amount.is_some());
    assert_eq!(detail.order.quote_currency, "EUR");

    assert_eq!(detail.items.len(), 2);
    let first = &detail.items[0];
    assert!(first.front_file_url.ends_with("front.pdf"));
    assert!(first.back_file_url.as_deref().unwrap().ends_with("back.pdf"));

    // the remote-then-local sequence closed its intent
    let intents = all_intents(&db).await;
    assert_eq!(intents.len(), 1);
    assert_eq!(intents[0].state, IntentState::Fulfilled);
    assert_eq!(intents[0].remote_order_id.as_deref(), Some("G1"));
}

#[tokio::test]
async fn create_surfaces_provider_rejection_and_marks_intent_failed() {
    let (db, _tmp) = test_db().await;
    let provider = Arc::new(MockProvider::failing_create(500));
    let service = OrderService::new(db.clone(), provider.clone());

    let err = service.create_order(create_request(&["c1"])).await.unwrap_err();
    match err {
        AppError::Remote { status, .. } => assert_eq!(status, 500),
        other => panic!("expected remote error, got {other:?}"),
    }

    // nothing persisted locally, intent closed as failed
    let orders = PrintOrderRepository::new(db.clone())
        .find_all(10, 0)
        .await
        .unwrap();
    assert!(orders.is_empty());
    let intents = all_intents(&db).await;
    assert_eq!(intents.len(), 1);
    assert_eq!(intents[0].state, IntentState::Failed);
}

#[tokio::test]
async fn confirm_without_remote_id_rejected_without_remote_call() {
    let (db, _tmp) = test_db().await;
    let provider = Arc::new(MockProvider::new());
    let service = OrderService::new(db.clone(), provider.clone());

    let order = seed_order(
        &db,
        None,
        PrintOrderStatus::Draft,
        PrintOrderType::Draft,
        &["c1"],
    )
    .await;

    let err = service.confirm(&order.key()).await.unwrap_err();
    match err {
        AppError::Validation(msg) => assert!(msg.contains("no remote order ID"), "{msg}"),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert_eq!(provider.confirm_calls(), 0);
}

#[tokio::test]
async fn confirm_of_confirmed_order_rejected_without_remote_call() {
    let (db, _tmp) = test_db().await;
    let provider = Arc::new(MockProvider::new());
    let service = OrderService::new(db.clone(), provider.clone());

    let order = seed_order(
        &db,
        Some("G77"),
        PrintOrderStatus::Pending,
        PrintOrderType::Order,
        &["c1"],
    )
    .await;

    let err = service.confirm(&order.key()).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(provider.confirm_calls(), 0);
}

#[tokio::test]
async fn confirm_of_unknown_order_is_not_found() {
    let (db, _tmp) = test_db().await;
    let service = OrderService::new(db.clone(), Arc::new(MockProvider::new()));

    let err = service.confirm("nonexistent").await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn confirm_flips_status_and_order_type_in_one_operation() {
    let (db, _tmp) = test_db().await;
    let provider = Arc::new(MockProvider::new());
    let service = OrderService::new(db.clone(), provider.clone());

    // create through the service so the mock knows the remote order
    let detail = service.create_order(create_request(&["c1"])).await.unwrap();

    let confirmed = service.confirm(&detail.order.key()).await.unwrap();
    assert_eq!(confirmed.status, PrintOrderStatus::Pending);
    assert_eq!(confirmed.order_type, PrintOrderType::Order);
    assert_eq!(provider.confirm_calls(), 1);

    // the flip happens exactly once
    let err = service.confirm(&detail.order.key()).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert_eq!(provider.confirm_calls(), 1);
}

#[tokio::test]
async fn quote_passthrough_validates_and_forwards() {
    let (db, _tmp) = test_db().await;
    let provider = Arc::new(MockProvider::new());
    let service = OrderService::new(db.clone(), provider.clone());

    let request = create_request(&["c1"]);
    let quote_request = card_server::fulfillment::QuoteOrderRequest {
        items: request.items.clone(),
        shipping_address: Some(sample_address()),
        currency: Some("EUR".to_string()),
    };

    let response = service.quote(quote_request).await.unwrap();
    assert_eq!(response.quotes.len(), 1);
    assert_eq!(response.quotes[0].currency, "EUR");

    let missing_currency = card_server::fulfillment::QuoteOrderRequest {
        items: request.items,
        shipping_address: Some(sample_address()),
        currency: None,
    };
    let err = service.quote(missing_currency).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}
