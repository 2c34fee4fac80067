//! Repository Module
//!
//! CRUD operations for SurrealDB tables.

pub mod card_request;
pub mod fulfillment_intent;
pub mod print_order;

// Re-exports
pub use card_request::CardRequestRepository;
pub use fulfillment_intent::FulfillmentIntentRepository;
pub use print_order::PrintOrderRepository;

use surrealdb::Surreal;
use surrealdb::engine::local::Db;
use surrealdb::sql::Thing;
use thiserror::Error;

/// Repository error types
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<surrealdb::Error> for RepoError {
    fn from(err: surrealdb::Error) -> Self {
        RepoError::Database(err.to_string())
    }
}

/// Result type for repository operations
pub type RepoResult<T> = Result<T, RepoError>;

/// Strip the "table:" prefix from an ID if present
pub fn strip_table_prefix<'a>(table: &str, id: &'a str) -> &'a str {
    id.strip_prefix(table)
        .and_then(|rest| rest.strip_prefix(':'))
        .unwrap_or(id)
}

/// Build a Thing from table name and (possibly prefixed) ID
pub fn make_thing(table: &str, id: &str) -> Thing {
    Thing::from((table.to_string(), strip_table_prefix(table, id).to_string()))
}

/// Base repository with database reference
#[derive(Clone)]
pub struct BaseRepository {
    db: Surreal<Db>,
}

impl BaseRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Surreal<Db> {
        &self.db
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strip_table_prefix_handles_both_forms() {
        assert_eq!(strip_table_prefix("print_order", "print_order:abc"), "abc");
        assert_eq!(strip_table_prefix("print_order", "abc"), "abc");
        // a different table's prefix is left alone
        assert_eq!(
            strip_table_prefix("print_order", "card_request:abc"),
            "card_request:abc"
        );
    }

    #[test]
    fn make_thing_normalizes_prefixed_ids() {
        let thing = make_thing("print_order", "print_order:abc");
        assert_eq!(thing.tb, "print_order");
        assert_eq!(thing.id.to_raw(), "abc");
    }
}
