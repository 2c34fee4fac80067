//! Fulfillment Intent Repository

use super::{BaseRepository, RepoError, RepoResult, make_thing, strip_table_prefix};
use crate::db::models::{FulfillmentIntent, IntentState};
use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const TABLE: &str = "fulfillment_intent";

#[derive(Clone)]
pub struct FulfillmentIntentRepository {
    base: BaseRepository,
}

impl FulfillmentIntentRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Record a new intent before the remote call it guards
    pub async fn create(&self, intent: FulfillmentIntent) -> RepoResult<FulfillmentIntent> {
        let created: Option<FulfillmentIntent> =
            self.base.db().create(TABLE).content(intent).await?;
        created.ok_or_else(|| RepoError::Database("Failed to create intent".to_string()))
    }

    /// Find intent by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<FulfillmentIntent>> {
        let pure_id = strip_table_prefix(TABLE, id);
        let intent: Option<FulfillmentIntent> = self.base.db().select((TABLE, pure_id)).await?;
        Ok(intent)
    }

    /// Remote call succeeded; record the provider order ID
    pub async fn mark_remote_done(
        &self,
        id: &str,
        remote_order_id: Option<&str>,
    ) -> RepoResult<()> {
        let mut data = serde_json::json!({
            "state": IntentState::RemoteDone,
            "updated_at": shared::util::now_millis(),
        });
        if let Some(remote) = remote_order_id {
            data["remote_order_id"] = serde_json::Value::String(remote.to_string());
        }
        self.merge(id, data).await
    }

    /// Local write succeeded; the sequence is complete
    pub async fn mark_fulfilled(&self, id: &str) -> RepoResult<()> {
        self.merge(
            id,
            serde_json::json!({
                "state": IntentState::Fulfilled,
                "updated_at": shared::util::now_millis(),
            }),
        )
        .await
    }

    /// Sequence cannot be completed or repaired automatically
    pub async fn mark_failed(&self, id: &str) -> RepoResult<()> {
        self.merge(
            id,
            serde_json::json!({
                "state": IntentState::Failed,
                "updated_at": shared::util::now_millis(),
            }),
        )
        .await
    }

    async fn merge(&self, id: &str, data: serde_json::Value) -> RepoResult<()> {
        let thing = make_thing(TABLE, id);
        self.base
            .db()
            .query("UPDATE $thing MERGE $data")
            .bind(("thing", thing))
            .bind(("data", data))
            .await?;
        Ok(())
    }

    /// Intents stuck in pending/remote_done longer than the cutoff
    pub async fn find_stale(&self, updated_before: i64) -> RepoResult<Vec<FulfillmentIntent>> {
        let mut result = self
            .base
            .db()
            .query(
                "SELECT * FROM fulfillment_intent \
                 WHERE state IN ['pending', 'remote_done'] AND updated_at < $cutoff \
                 ORDER BY updated_at",
            )
            .bind(("cutoff", updated_before))
            .await?;
        let intents: Vec<FulfillmentIntent> = result.take(0)?;
        Ok(intents)
    }
}
