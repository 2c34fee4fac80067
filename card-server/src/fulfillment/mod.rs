//! Fulfillment domain
//!
//! Everything that keeps local print orders consistent with the
//! fulfillment provider:
//!
//! - [`service`] - order lifecycle (create draft, confirm)
//! - [`reconcile`] - unified status convergence, shared by both sync paths
//! - [`webhook`] - provider-initiated push events
//! - [`project`] - order status fan-out onto linked card records
//! - [`sweep`] - saga-intent repair for non-transactional remote+local writes

pub mod project;
pub mod reconcile;
pub mod service;
pub mod sweep;
pub mod webhook;

pub use project::CardStatusProjector;
pub use reconcile::{ApplyOutcome, RemoteTracking, StatusReconciler};
pub use service::{CreateOrderItemRequest, CreateOrderRequest, OrderFileRequest, OrderService, QuoteOrderRequest};
pub use sweep::IntentSweeper;
pub use webhook::{WebhookAck, WebhookEvent, WebhookIngestor, authenticate};
