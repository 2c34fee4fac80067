//! Status synchronization tests: webhook ingest (push), on-read
//! reconciliation (pull), idempotency, transition guards and card
//! projection.

mod common;

use std::sync::Arc;

use common::{MockProvider, seed_card, seed_order, test_db};

use card_server::AppError;
use card_server::db::repository::{CardRequestRepository, PrintOrderRepository};
use card_server::fulfillment::{
    ApplyOutcome, RemoteTracking, StatusReconciler, WebhookEvent, WebhookIngestor,
};
use fulfillment_client::{ProviderOrder, ProviderShipment};
use shared::{CardPrintStatus, PrintOrderStatus, PrintOrderType};

fn status_event(remote_id: &str, status: &str) -> WebhookEvent {
    WebhookEvent {
        event: Some("order_status_updated".to_string()),
        order_id: Some(remote_id.to_string()),
        status: Some(status.to_string()),
        tracking_url: None,
        tracking_code: None,
    }
}

#[tokio::test]
async fn webhook_updates_status_and_projects_cards() {
    let (db, _tmp) = test_db().await;
    seed_card(&db, "c1").await;
    seed_card(&db, "c2").await;
    seed_order(
        &db,
        Some("G123"),
        PrintOrderStatus::Pending,
        PrintOrderType::Order,
        &["c1", "c2"],
    )
    .await;

    let ingestor = WebhookIngestor::new(db.clone(), Arc::new(MockProvider::new()));
    let ack = ingestor
        .ingest(status_event("G123", "in_production"))
        .await
        .unwrap();

    assert!(ack.received);
    assert_eq!(ack.matched, Some(true));
    assert_eq!(ack.status.as_deref(), Some("updated"));

    let orders = PrintOrderRepository::new(db.clone());
    let order = orders.find_by_remote_id("G123").await.unwrap().unwrap();
    assert_eq!(order.status, PrintOrderStatus::Production);

    let cards = CardRequestRepository::new(db.clone());
    for key in ["c1", "c2"] {
        let card = cards.find_by_id(key).await.unwrap().unwrap();
        assert_eq!(card.print_status, Some(CardPrintStatus::Ordered));
    }
}

#[tokio::test]
async fn replayed_webhook_event_is_idempotent() {
    let (db, _tmp) = test_db().await;
    seed_card(&db, "c1").await;
    seed_order(
        &db,
        Some("G123"),
        PrintOrderStatus::Pending,
        PrintOrderType::Order,
        &["c1"],
    )
    .await;

    let ingestor = WebhookIngestor::new(db.clone(), Arc::new(MockProvider::new()));

    let first = ingestor
        .ingest(status_event("G123", "in_production"))
        .await
        .unwrap();
    assert_eq!(first.status.as_deref(), Some("updated"));

    let orders = PrintOrderRepository::new(db.clone());
    let after_first = orders.find_by_remote_id("G123").await.unwrap().unwrap();

    let second = ingestor
        .ingest(status_event("G123", "in_production"))
        .await
        .unwrap();
    assert_eq!(second.status.as_deref(), Some("unchanged"));

    // zero writes on replay: the row is untouched
    let after_second = orders.find_by_remote_id("G123").await.unwrap().unwrap();
    assert_eq!(after_second.updated_at, after_first.updated_at);
    assert_eq!(after_second.status, PrintOrderStatus::Production);
}

#[tokio::test]
async fn webhook_for_unknown_order_acknowledged_without_write() {
    let (db, _tmp) = test_db().await;
    seed_order(
        &db,
        Some("G123"),
        PrintOrderStatus::Pending,
        PrintOrderType::Order,
        &["c1"],
    )
    .await;

    let ingestor = WebhookIngestor::new(db.clone(), Arc::new(MockProvider::new()));
    let ack = ingestor
        .ingest(status_event("G999", "shipped"))
        .await
        .unwrap();

    assert!(ack.received);
    assert_eq!(ack.matched, Some(false));

    let order = PrintOrderRepository::new(db.clone())
        .find_by_remote_id("G123")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, PrintOrderStatus::Pending);
}

#[tokio::test]
async fn stale_webhook_event_does_not_move_order_backward() {
    let (db, _tmp) = test_db().await;
    seed_order(
        &db,
        Some("G5"),
        PrintOrderStatus::Shipped,
        PrintOrderType::Order,
        &["c1"],
    )
    .await;

    let ingestor = WebhookIngestor::new(db.clone(), Arc::new(MockProvider::new()));
    // an old "created" event arriving after the shipped update
    let ack = ingestor.ingest(status_event("G5", "created")).await.unwrap();
    assert_eq!(ack.status.as_deref(), Some("ignored"));

    let order = PrintOrderRepository::new(db.clone())
        .find_by_remote_id("G5")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, PrintOrderStatus::Shipped);
}

#[tokio::test]
async fn unmapped_provider_status_keeps_local_state() {
    let (db, _tmp) = test_db().await;
    seed_order(
        &db,
        Some("G5"),
        PrintOrderStatus::Production,
        PrintOrderType::Order,
        &["c1"],
    )
    .await;

    let ingestor = WebhookIngestor::new(db.clone(), Arc::new(MockProvider::new()));
    let ack = ingestor
        .ingest(status_event("G5", "uploading"))
        .await
        .unwrap();
    assert_eq!(ack.status.as_deref(), Some("ignored"));

    let order = PrintOrderRepository::new(db.clone())
        .find_by_remote_id("G5")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, PrintOrderStatus::Production);
}

#[tokio::test]
async fn item_status_event_acknowledged_but_not_applied() {
    let (db, _tmp) = test_db().await;
    seed_order(
        &db,
        Some("G5"),
        PrintOrderStatus::Pending,
        PrintOrderType::Order,
        &["c1"],
    )
    .await;

    let ingestor = WebhookIngestor::new(db.clone(), Arc::new(MockProvider::new()));
    let event = WebhookEvent {
        event: Some("order_item_status_updated".to_string()),
        order_id: Some("G5".to_string()),
        status: Some("shipped".to_string()),
        tracking_url: None,
        tracking_code: None,
    };
    let ack = ingestor.ingest(event).await.unwrap();
    assert!(ack.received);
    assert_eq!(ack.status.as_deref(), Some("accepted"));

    let order = PrintOrderRepository::new(db.clone())
        .find_by_remote_id("G5")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, PrintOrderStatus::Pending);
}

#[tokio::test]
async fn webhook_missing_fields_rejected() {
    let (db, _tmp) = test_db().await;
    let ingestor = WebhookIngestor::new(db.clone(), Arc::new(MockProvider::new()));

    let no_event = WebhookEvent {
        event: None,
        order_id: Some("G1".to_string()),
        status: None,
        tracking_url: None,
        tracking_code: None,
    };
    assert!(matches!(
        ingestor.ingest(no_event).await.unwrap_err(),
        AppError::Validation(_)
    ));

    let no_order = WebhookEvent {
        event: Some("order_status_updated".to_string()),
        order_id: None,
        status: None,
        tracking_url: None,
        tracking_code: None,
    };
    assert!(matches!(
        ingestor.ingest(no_order).await.unwrap_err(),
        AppError::Validation(_)
    ));
}

#[tokio::test]
async fn read_reconciles_status_and_tracking_from_provider() {
    let (db, _tmp) = test_db().await;
    seed_card(&db, "c1").await;
    let order = seed_order(
        &db,
        Some("G999"),
        PrintOrderStatus::Shipped,
        PrintOrderType::Order,
        &["c1"],
    )
    .await;

    let provider = Arc::new(MockProvider::new());
    provider.register_order(ProviderOrder {
        id: "G999".to_string(),
        order_reference_id: Some(order.reference.clone()),
        order_type: Some("order".to_string()),
        fulfillment_status: "delivered".to_string(),
        currency: Some("EUR".to_string()),
        total_incl_vat: None,
        shipments: vec![ProviderShipment {
            tracking_url: Some("https://track.example/1".to_string()),
            tracking_code: Some("TRK-1".to_string()),
            shipment_method_name: Some("DHL".to_string()),
        }],
    });

    let reconciler = StatusReconciler::new(db.clone(), provider.clone());
    let refreshed = reconciler.reconcile_on_read(order).await;

    // the caller receives the updated record, already persisted
    assert_eq!(refreshed.status, PrintOrderStatus::Delivered);
    assert_eq!(
        refreshed.tracking_url.as_deref(),
        Some("https://track.example/1")
    );
    assert_eq!(refreshed.tracking_code.as_deref(), Some("TRK-1"));

    let stored = PrintOrderRepository::new(db.clone())
        .find_by_remote_id("G999")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, PrintOrderStatus::Delivered);

    // delivery projects onto linked cards
    let card = CardRequestRepository::new(db.clone())
        .find_by_id("c1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(card.print_status, Some(CardPrintStatus::Delivered));
}

#[tokio::test]
async fn read_survives_unreachable_provider() {
    let (db, _tmp) = test_db().await;
    let order = seed_order(
        &db,
        Some("G404"),
        PrintOrderStatus::Production,
        PrintOrderType::Order,
        &["c1"],
    )
    .await;

    // provider knows nothing about G404; get_order fails
    let reconciler = StatusReconciler::new(db.clone(), Arc::new(MockProvider::new()));
    let served = reconciler.reconcile_on_read(order.clone()).await;

    assert_eq!(served.status, PrintOrderStatus::Production);
    assert_eq!(served.updated_at, order.updated_at);
}

#[tokio::test]
async fn orders_without_remote_id_skip_reconciliation() {
    let (db, _tmp) = test_db().await;
    let order = seed_order(
        &db,
        None,
        PrintOrderStatus::Draft,
        PrintOrderType::Draft,
        &["c1"],
    )
    .await;

    let provider = Arc::new(MockProvider::new());
    let reconciler = StatusReconciler::new(db.clone(), provider.clone());
    let served = reconciler.reconcile_on_read(order).await;

    assert_eq!(served.status, PrintOrderStatus::Draft);
    assert_eq!(provider.get_calls.load(std::sync::atomic::Ordering::SeqCst), 0);
}

#[tokio::test]
async fn tracking_only_change_updates_without_projection() {
    let (db, _tmp) = test_db().await;
    seed_card(&db, "c1").await;
    let order = seed_order(
        &db,
        Some("G8"),
        PrintOrderStatus::Shipped,
        PrintOrderType::Order,
        &["c1"],
    )
    .await;

    let reconciler = StatusReconciler::new(db.clone(), Arc::new(MockProvider::new()));
    let outcome = reconciler
        .apply_remote_status(
            &order,
            "shipped",
            RemoteTracking {
                url: Some("https://track.example/late".to_string()),
                code: Some("LATE-1".to_string()),
            },
        )
        .await
        .unwrap();

    match outcome {
        ApplyOutcome::Updated(updated) => {
            assert_eq!(updated.status, PrintOrderStatus::Shipped);
            assert_eq!(updated.tracking_code.as_deref(), Some("LATE-1"));
        }
        other => panic!("expected update, got {other:?}"),
    }

    // status did not change in this operation, so no card projection fired
    let card = CardRequestRepository::new(db.clone())
        .find_by_id("c1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(card.print_status, None);
}

#[tokio::test]
async fn pending_status_has_no_card_projection() {
    let (db, _tmp) = test_db().await;
    seed_card(&db, "c1").await;
    seed_order(
        &db,
        Some("G9"),
        PrintOrderStatus::Draft,
        PrintOrderType::Draft,
        &["c1"],
    )
    .await;

    let ingestor = WebhookIngestor::new(db.clone(), Arc::new(MockProvider::new()));
    let ack = ingestor.ingest(status_event("G9", "created")).await.unwrap();
    assert_eq!(ack.status.as_deref(), Some("updated"));

    let order = PrintOrderRepository::new(db.clone())
        .find_by_remote_id("G9")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(order.status, PrintOrderStatus::Pending);

    // pending is outside the card projection table
    let card = CardRequestRepository::new(db.clone())
        .find_by_id("c1")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(card.print_status, None);
}
