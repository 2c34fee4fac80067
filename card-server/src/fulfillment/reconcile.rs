//! Status Reconciliation
//!
//! [`StatusReconciler::apply_remote_status`] is the single convergence
//! point for both writers of an order row: the on-read pull path and the
//! webhook push path. Keeping the mapping, idempotency and transition
//! rules in one function is what stops the two paths from drifting apart.

use std::sync::Arc;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::models::{PrintOrder, PrintOrderSyncUpdate};
use crate::db::repository::PrintOrderRepository;
use crate::fulfillment::CardStatusProjector;
use crate::utils::AppResult;
use fulfillment_client::{ProviderApi, ProviderOrder};
use shared::PrintOrderStatus;

/// Tracking fields carried by a remote status observation
#[derive(Debug, Clone, Default)]
pub struct RemoteTracking {
    pub url: Option<String>,
    pub code: Option<String>,
}

impl From<&ProviderOrder> for RemoteTracking {
    fn from(order: &ProviderOrder) -> Self {
        let (url, code) = order.first_tracking();
        Self { url, code }
    }
}

/// Result of applying one remote status observation
#[derive(Debug)]
pub enum ApplyOutcome {
    /// Something differed; exactly one merge write was performed
    Updated(PrintOrder),
    /// Local record already matches; no write
    Unchanged,
    /// Observation discarded (unmapped status or disallowed transition); no write
    Ignored(&'static str),
}

#[derive(Clone)]
pub struct StatusReconciler {
    orders: PrintOrderRepository,
    projector: CardStatusProjector,
    provider: Arc<dyn ProviderApi>,
}

impl StatusReconciler {
    pub fn new(db: Surreal<Db>, provider: Arc<dyn ProviderApi>) -> Self {
        Self {
            orders: PrintOrderRepository::new(db.clone()),
            projector: CardStatusProjector::new(db),
            provider,
        }
    }

    /// Pull path: refresh an order from the provider before serving a read.
    ///
    /// The read path never fails because the provider is unreachable or the
    /// refresh write fails; the last known local state is served instead.
    pub async fn reconcile_on_read(&self, order: PrintOrder) -> PrintOrder {
        let Some(remote_id) = order.remote_order_id.clone() else {
            return order;
        };

        let remote = match self.provider.get_order(&remote_id).await {
            Ok(remote) => remote,
            Err(e) => {
                tracing::warn!(
                    remote_order_id = %remote_id,
                    "Provider unreachable, serving last known status: {e}"
                );
                return order;
            }
        };

        let tracking = RemoteTracking::from(&remote);
        match self
            .apply_remote_status(&order, &remote.fulfillment_status, tracking)
            .await
        {
            Ok(ApplyOutcome::Updated(updated)) => updated,
            Ok(_) => order,
            Err(e) => {
                tracing::error!(
                    remote_order_id = %remote_id,
                    "Failed to persist reconciled status, serving last known: {e}"
                );
                order
            }
        }
    }

    /// Unified convergence function for both sync paths.
    ///
    /// Translates the provider status, enforces the allowed-transition
    /// table, and performs at most one merge write. When the status
    /// actually changed, the card projection fires for the order's items.
    pub async fn apply_remote_status(
        &self,
        order: &PrintOrder,
        provider_status: &str,
        tracking: RemoteTracking,
    ) -> AppResult<ApplyOutcome> {
        let Some(target) = PrintOrderStatus::from_provider(provider_status) else {
            tracing::debug!(
                order = %order.reference,
                provider_status,
                "Unmapped provider status, keeping local state"
            );
            return Ok(ApplyOutcome::Ignored("unmapped_status"));
        };

        let status_changed = target != order.status;
        if status_changed && !order.status.can_transition_to(target) {
            tracing::warn!(
                order = %order.reference,
                from = %order.status,
                to = %target,
                "Discarding stale status transition"
            );
            return Ok(ApplyOutcome::Ignored("stale_transition"));
        }

        // Tracking fields only ever fill in or advance; an absent field in
        // the observation never clears a stored value.
        let tracking_url = tracking
            .url
            .filter(|url| order.tracking_url.as_deref() != Some(url));
        let tracking_code = tracking
            .code
            .filter(|code| order.tracking_code.as_deref() != Some(code));

        if !status_changed && tracking_url.is_none() && tracking_code.is_none() {
            return Ok(ApplyOutcome::Unchanged);
        }

        let update = PrintOrderSyncUpdate {
            status: status_changed.then_some(target),
            tracking_url,
            tracking_code,
            updated_at: shared::util::now_millis(),
        };

        let order_key = order.key();
        let updated = self.orders.apply_sync_update(&order_key, update).await?;

        if status_changed {
            tracing::info!(
                order = %order.reference,
                from = %order.status,
                to = %target,
                "Order status reconciled"
            );
            self.projector.project(&order_key, target).await?;
        }

        Ok(ApplyOutcome::Updated(updated))
    }
}
