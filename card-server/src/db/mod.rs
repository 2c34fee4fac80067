//! Database Module
//!
//! Embedded SurrealDB (RocksDB engine). Owns connection setup and schema
//! definition; CRUD lives in [`repository`].

pub mod models;
pub mod repository;

use surrealdb::Surreal;
use surrealdb::engine::local::{Db, RocksDb};

use crate::utils::AppError;

const NAMESPACE: &str = "cardplatform";
const DATABASE: &str = "main";

/// Database service — owns the embedded SurrealDB handle
#[derive(Clone)]
pub struct DbService {
    pub db: Surreal<Db>,
}

impl DbService {
    /// Open (or create) the embedded database and apply schema definitions
    pub async fn new(db_path: &str) -> Result<Self, AppError> {
        let db: Surreal<Db> = Surreal::new::<RocksDb>(db_path)
            .await
            .map_err(|e| AppError::database(format!("Failed to open database: {e}")))?;

        db.use_ns(NAMESPACE)
            .use_db(DATABASE)
            .await
            .map_err(|e| AppError::database(format!("Failed to select namespace: {e}")))?;

        define_schema(&db).await?;

        tracing::info!("Database connection established (SurrealDB RocksDB)");

        Ok(Self { db })
    }
}

/// Table and index definitions
///
/// Tables stay schemaless; indexes cover the lookups both sync paths rely
/// on (webhook lookup by remote order id, item fan-out by owning order,
/// stale-intent scans).
pub async fn define_schema(db: &Surreal<Db>) -> Result<(), AppError> {
    db.query(
        r#"
        DEFINE TABLE IF NOT EXISTS print_order SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS idx_print_order_remote ON print_order FIELDS remote_order_id;
        DEFINE INDEX IF NOT EXISTS idx_print_order_reference ON print_order FIELDS reference;

        DEFINE TABLE IF NOT EXISTS print_order_item SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS idx_print_order_item_order ON print_order_item FIELDS print_order_id;

        DEFINE TABLE IF NOT EXISTS card_request SCHEMALESS;

        DEFINE TABLE IF NOT EXISTS fulfillment_intent SCHEMALESS;
        DEFINE INDEX IF NOT EXISTS idx_fulfillment_intent_state ON fulfillment_intent FIELDS state;
        "#,
    )
    .await
    .map_err(|e| AppError::database(format!("Failed to define schema: {e}")))?;

    Ok(())
}
