//! Storage seam that models and factories persist through
//!
//! Records travel as [`Fields`] maps keyed by column name. The store assigns
//! integer primary keys on insert.

use async_trait::async_trait;

use crate::error::OrmResult;
use crate::model::Fields;

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::{PostgresStore, StoreConfig};

/// Table-level persistence operations
#[async_trait]
pub trait Store: Send + Sync {
    /// Insert a row and return its new primary key
    async fn insert(&self, table: &str, fields: Fields) -> OrmResult<i64>;

    /// Fetch a row by primary key, including the key column
    async fn find(&self, table: &str, id: i64) -> OrmResult<Option<Fields>>;

    /// Count rows in a table
    async fn count(&self, table: &str) -> OrmResult<u64>;

    /// Remove every row from a table
    async fn truncate(&self, table: &str) -> OrmResult<()>;

    /// Check whether a row with the given primary key exists
    async fn exists(&self, table: &str, id: i64) -> OrmResult<bool> {
        Ok(self.find(table, id).await?.is_some())
    }

    /// Short backend name for logs
    fn backend_name(&self) -> &'static str;
}
