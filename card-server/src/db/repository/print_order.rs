//! Print Order Repository

use super::{BaseRepository, RepoError, RepoResult, make_thing, strip_table_prefix};
use crate::db::models::{PrintOrder, PrintOrderItem, PrintOrderSyncUpdate};
use shared::{PrintOrderStatus, PrintOrderType};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "print_order";
const ITEM_TABLE: &str = "print_order_item";

#[derive(Clone)]
pub struct PrintOrderRepository {
    base: BaseRepository,
}

impl PrintOrderRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Persist an order and its line items
    ///
    /// Items arrive with an empty `print_order_id`; it is filled with the
    /// freshly assigned order ID before each item row is written.
    pub async fn create(
        &self,
        order: PrintOrder,
        items: Vec<PrintOrderItem>,
    ) -> RepoResult<PrintOrder> {
        if items.is_empty() {
            return Err(RepoError::Validation(
                "Print order must contain at least one item".to_string(),
            ));
        }

        let created: Option<PrintOrder> = self.base.db().create(TABLE).content(order).await?;
        let created = created
            .ok_or_else(|| RepoError::Database("Failed to create print order".to_string()))?;

        let order_id = created
            .id
            .as_ref()
            .map(|t| t.to_string())
            .ok_or_else(|| RepoError::Database("Created print order has no ID".to_string()))?;

        for mut item in items {
            item.print_order_id = order_id.clone();
            let _created: Option<PrintOrderItem> =
                self.base.db().create(ITEM_TABLE).content(item).await?;
        }

        Ok(created)
    }

    /// Find order by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<PrintOrder>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let order: Option<PrintOrder> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(order)
    }

    /// Find order by the provider-assigned order ID
    pub async fn find_by_remote_id(&self, remote_order_id: &str) -> RepoResult<Option<PrintOrder>> {
        let remote_owned = remote_order_id.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM print_order WHERE remote_order_id = $remote LIMIT 1")
            .bind(("remote", remote_owned))
            .await?;
        let orders: Vec<PrintOrder> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// Find order by the local order reference
    pub async fn find_by_reference(&self, reference: &str) -> RepoResult<Option<PrintOrder>> {
        let reference_owned = reference.to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM print_order WHERE reference = $reference LIMIT 1")
            .bind(("reference", reference_owned))
            .await?;
        let orders: Vec<PrintOrder> = result.take(0)?;
        Ok(orders.into_iter().next())
    }

    /// List orders, newest first
    pub async fn find_all(&self, limit: i64, offset: i64) -> RepoResult<Vec<PrintOrder>> {
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM print_order ORDER BY created_at DESC LIMIT $limit START $offset")
            .bind(("limit", limit))
            .bind(("offset", offset))
            .await?;
        let orders: Vec<PrintOrder> = result.take(0)?;
        Ok(orders)
    }

    /// Merge a reconciliation update into the order row
    ///
    /// Absent fields are untouched; this is what keeps convergent writes
    /// from the two sync paths safe to repeat.
    pub async fn apply_sync_update(
        &self,
        id: &str,
        update: PrintOrderSyncUpdate,
    ) -> RepoResult<PrintOrder> {
        let thing = make_thing(TABLE, id);
        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", thing))
            .bind(("data", update))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Print order {} not found", id)))
    }

    /// Flip a confirmed draft to a live order in one write
    pub async fn confirm(&self, id: &str) -> RepoResult<PrintOrder> {
        let thing = make_thing(TABLE, id);
        let data = serde_json::json!({
            "status": PrintOrderStatus::Pending,
            "order_type": PrintOrderType::Order,
            "updated_at": shared::util::now_millis(),
        });
        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", thing))
            .bind(("data", data))
            .await?;

        self.find_by_id(id)
            .await?
            .ok_or_else(|| RepoError::NotFound(format!("Print order {} not found", id)))
    }

    /// Line items of an order
    pub async fn find_items(&self, order_id: &str) -> RepoResult<Vec<PrintOrderItem>> {
        let order_ref = make_thing(TABLE, order_id).to_string();
        let mut result = self
            .base
            .db()
            .query("SELECT * FROM print_order_item WHERE print_order_id = $order_id")
            .bind(("order_id", order_ref))
            .await?;
        let items: Vec<PrintOrderItem> = result.take(0)?;
        Ok(items)
    }

    /// Card request IDs linked through this order's items
    pub async fn card_request_ids(&self, order_id: &str) -> RepoResult<Vec<String>> {
        let order_ref = make_thing(TABLE, order_id).to_string();
        let mut result = self
            .base
            .db()
            .query(
                "SELECT VALUE card_request_id FROM print_order_item WHERE print_order_id = $order_id",
            )
            .bind(("order_id", order_ref))
            .await?;
        let ids: Vec<String> = result.take(0)?;
        Ok(ids)
    }
}
