//! Card Request Repository
//!
//! Cards are owned by the card CRUD subsystem; fulfillment only writes
//! `print_status` (batch, via the projection table).

use super::{BaseRepository, RepoResult, make_thing, strip_table_prefix};
use crate::db::models::CardRequest;
use shared::CardPrintStatus;
use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::Thing;

const TABLE: &str = "card_request";

#[derive(Clone)]
pub struct CardRequestRepository {
    base: BaseRepository,
}

impl CardRequestRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Find card by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<CardRequest>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let card: Option<CardRequest> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(card)
    }

    /// Batch-update `print_status` on the given cards
    ///
    /// Returns the number of card rows written. Unknown IDs are skipped by
    /// the database rather than treated as an error; a late webhook may
    /// reference cards that were deleted since the order was placed.
    pub async fn set_print_status(
        &self,
        card_ids: &[String],
        status: CardPrintStatus,
    ) -> RepoResult<usize> {
        if card_ids.is_empty() {
            return Ok(0);
        }

        let targets: Vec<Thing> = card_ids.iter().map(|id| make_thing(TABLE, id)).collect();
        let mut result = self
            .base
            .db()
            .query("UPDATE $targets SET print_status = $status, updated_at = $now")
            .bind(("targets", targets))
            .bind(("status", status))
            .bind(("now", shared::util::now_millis()))
            .await?;

        let updated: Vec<CardRequest> = result.take(0)?;
        Ok(updated.len())
    }
}
