//! Card Status Projector
//!
//! One-way fan-out from an order status change onto the card records
//! referenced by the order's line items. No feedback path: nothing here
//! ever reads card state back into order state.

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

use crate::db::repository::{CardRequestRepository, PrintOrderRepository};
use crate::utils::AppResult;
use shared::PrintOrderStatus;

#[derive(Clone)]
pub struct CardStatusProjector {
    orders: PrintOrderRepository,
    cards: CardRequestRepository,
}

impl CardStatusProjector {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            orders: PrintOrderRepository::new(db.clone()),
            cards: CardRequestRepository::new(db),
        }
    }

    /// Mirror an order status onto all linked cards
    ///
    /// Statuses without a card-level mapping propagate nothing. Returns
    /// the number of card rows written.
    pub async fn project(&self, order_id: &str, status: PrintOrderStatus) -> AppResult<usize> {
        let Some(print_status) = status.card_print_status() else {
            return Ok(0);
        };

        let card_ids = self.orders.card_request_ids(order_id).await?;
        if card_ids.is_empty() {
            return Ok(0);
        }

        let updated = self.cards.set_print_status(&card_ids, print_status).await?;
        tracing::info!(
            order_id = %order_id,
            print_status = %print_status,
            cards = updated,
            "Projected order status onto linked cards"
        );
        Ok(updated)
    }
}
