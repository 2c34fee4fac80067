//! Intent Sweep
//!
//! Periodic repair worker for the saga intents written around every
//! remote-then-local sequence. A crash (or a failed local write) between
//! the provider call and the local persistence leaves an intent stuck in
//! `pending` or `remote_done`; this worker detects those and either
//! replays the missing local write or flags the intent for an operator.

use std::sync::Arc;
use std::time::Duration;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use tokio_util::sync::CancellationToken;

use crate::db::models::{FulfillmentIntent, IntentKind, IntentState};
use crate::db::repository::{FulfillmentIntentRepository, PrintOrderRepository};
use crate::fulfillment::service::{build_order_rows, extract_address_currency};
use crate::fulfillment::CreateOrderRequest;
use crate::utils::AppResult;
use fulfillment_client::ProviderApi;
use shared::PrintOrderType;

pub struct IntentSweeper {
    orders: PrintOrderRepository,
    intents: FulfillmentIntentRepository,
    provider: Arc<dyn ProviderApi>,
    interval: Duration,
    stale_after_millis: i64,
}

impl IntentSweeper {
    pub fn new(
        db: Surreal<Db>,
        provider: Arc<dyn ProviderApi>,
        interval: Duration,
        stale_after_millis: i64,
    ) -> Self {
        Self {
            orders: PrintOrderRepository::new(db.clone()),
            intents: FulfillmentIntentRepository::new(db),
            provider,
            interval,
            stale_after_millis,
        }
    }

    /// Run the sweep loop until cancelled
    pub async fn run(self, shutdown: CancellationToken) {
        tracing::info!(
            interval_secs = self.interval.as_secs(),
            "IntentSweeper started"
        );

        let mut ticker = tokio::time::interval(self.interval);

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    tracing::info!("IntentSweeper shutting down");
                    break;
                }
                _ = ticker.tick() => {
                    match self.sweep_once().await {
                        Ok(0) => {}
                        Ok(repaired) => {
                            tracing::info!(repaired, "Intent sweep repaired stale sequences");
                        }
                        Err(e) => {
                            tracing::error!("Intent sweep failed: {e}");
                        }
                    }
                }
            }
        }
    }

    /// One sweep pass; returns how many intents were repaired
    pub async fn sweep_once(&self) -> AppResult<usize> {
        let cutoff = shared::util::now_millis() - self.stale_after_millis;
        let stale = self.intents.find_stale(cutoff).await?;
        if stale.is_empty() {
            return Ok(0);
        }

        tracing::debug!(count = stale.len(), "Found stale fulfillment intents");

        let mut repaired = 0;
        for intent in stale {
            match self.repair(&intent).await {
                Ok(true) => repaired += 1,
                Ok(false) => {}
                Err(e) => {
                    tracing::warn!(
                        intent = %intent.key(),
                        "Intent repair deferred to next sweep: {e}"
                    );
                }
            }
        }

        Ok(repaired)
    }

    async fn repair(&self, intent: &FulfillmentIntent) -> AppResult<bool> {
        match (intent.kind, intent.state) {
            (IntentKind::Create, IntentState::RemoteDone) => self.repair_create(intent).await,
            (IntentKind::Create, IntentState::Pending) => {
                // The remote call's outcome is unknown and the provider has
                // no lookup-by-reference; an operator has to check for an
                // orphaned remote draft.
                tracing::error!(
                    intent = %intent.key(),
                    reference = ?intent.reference,
                    "Create intent stuck before remote ID was recorded; marking failed, operator attention required"
                );
                self.intents.mark_failed(&intent.key()).await?;
                Ok(false)
            }
            (IntentKind::Confirm, IntentState::RemoteDone) => self.repair_confirm(intent).await,
            (IntentKind::Confirm, IntentState::Pending) => {
                self.repair_confirm_pending(intent).await
            }
            _ => Ok(false),
        }
    }

    /// Remote order exists but the local row may be missing: replay the
    /// local write from the stored request payload.
    async fn repair_create(&self, intent: &FulfillmentIntent) -> AppResult<bool> {
        let Some(remote_order_id) = intent.remote_order_id.as_deref() else {
            tracing::error!(intent = %intent.key(), "remote_done create intent without remote ID");
            self.intents.mark_failed(&intent.key()).await?;
            return Ok(false);
        };

        if self
            .orders
            .find_by_remote_id(remote_order_id)
            .await?
            .is_some()
        {
            // Local write landed after all; just close the intent.
            self.intents.mark_fulfilled(&intent.key()).await?;
            return Ok(false);
        }

        let request: CreateOrderRequest = match serde_json::from_value(intent.payload.clone()) {
            Ok(request) => request,
            Err(e) => {
                tracing::error!(intent = %intent.key(), "Unreadable intent payload: {e}");
                self.intents.mark_failed(&intent.key()).await?;
                return Ok(false);
            }
        };
        let (address, currency) = extract_address_currency(
            request.shipping_address.as_ref(),
            request.currency.as_deref(),
        )?;

        // Transport failures bubble up and defer the repair to the next pass
        let remote = self.provider.get_order(remote_order_id).await?;

        let reference = intent.reference.clone().unwrap_or_default();
        let (order, items) = build_order_rows(&reference, &request, &address, &currency, &remote)?;
        self.orders.create(order, items).await?;
        self.intents.mark_fulfilled(&intent.key()).await?;

        tracing::info!(
            intent = %intent.key(),
            remote_order_id,
            "Repaired print order lost between remote creation and local write"
        );
        Ok(true)
    }

    /// Remote confirm succeeded but the local flip may be missing
    async fn repair_confirm(&self, intent: &FulfillmentIntent) -> AppResult<bool> {
        let Some(order_id) = intent.order_id.as_deref() else {
            tracing::error!(intent = %intent.key(), "Confirm intent without local order ID");
            self.intents.mark_failed(&intent.key()).await?;
            return Ok(false);
        };

        let Some(order) = self.orders.find_by_id(order_id).await? else {
            tracing::error!(intent = %intent.key(), order_id, "Confirm intent references missing order");
            self.intents.mark_failed(&intent.key()).await?;
            return Ok(false);
        };

        if order.order_type == PrintOrderType::Draft {
            self.orders.confirm(&order.key()).await?;
            self.intents.mark_fulfilled(&intent.key()).await?;
            tracing::info!(
                intent = %intent.key(),
                order = %order.reference,
                "Repaired confirm lost between remote confirm and local write"
            );
            return Ok(true);
        }

        self.intents.mark_fulfilled(&intent.key()).await?;
        Ok(false)
    }

    /// Confirm intent died before the remote outcome was recorded; ask the
    /// provider which side of the call it landed on.
    async fn repair_confirm_pending(&self, intent: &FulfillmentIntent) -> AppResult<bool> {
        let Some(remote_order_id) = intent.remote_order_id.as_deref() else {
            tracing::error!(intent = %intent.key(), "Confirm intent without remote order ID");
            self.intents.mark_failed(&intent.key()).await?;
            return Ok(false);
        };

        let remote = self.provider.get_order(remote_order_id).await?;
        match remote.order_type.as_deref() {
            Some("order") => {
                self.intents
                    .mark_remote_done(&intent.key(), Some(remote_order_id))
                    .await?;
                self.repair_confirm(intent).await
            }
            Some("draft") => {
                // Remote confirm never happened; the caller already saw the
                // error, nothing to replay.
                self.intents.mark_failed(&intent.key()).await?;
                Ok(false)
            }
            _ => {
                tracing::warn!(
                    intent = %intent.key(),
                    remote_order_id,
                    "Provider did not report an order type; deferring"
                );
                Ok(false)
            }
        }
    }
}
