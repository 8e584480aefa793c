//! In-memory store used by tests and dry-run seeding

use std::collections::BTreeMap;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::json;

use super::Store;
use crate::error::OrmResult;
use crate::model::Fields;

#[derive(Debug, Default)]
struct MemoryTable {
    next_id: i64,
    rows: BTreeMap<i64, Fields>,
}

/// Concurrent in-memory tables with per-table sequential ids starting at 1
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: DashMap<String, MemoryTable>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// All rows of a table ordered by primary key
    pub fn rows(&self, table: &str) -> Vec<Fields> {
        self.tables
            .get(table)
            .map(|t| t.rows.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Names of tables that have received at least one insert
    pub fn table_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.tables.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn insert(&self, table: &str, mut fields: Fields) -> OrmResult<i64> {
        let mut entry = self.tables.entry(table.to_string()).or_default();
        entry.next_id += 1;
        let id = entry.next_id;

        fields.insert("id".to_string(), json!(id));
        entry.rows.insert(id, fields);

        Ok(id)
    }

    async fn find(&self, table: &str, id: i64) -> OrmResult<Option<Fields>> {
        Ok(self
            .tables
            .get(table)
            .and_then(|t| t.rows.get(&id).cloned()))
    }

    async fn count(&self, table: &str) -> OrmResult<u64> {
        Ok(self
            .tables
            .get(table)
            .map(|t| t.rows.len() as u64)
            .unwrap_or(0))
    }

    async fn truncate(&self, table: &str) -> OrmResult<()> {
        self.tables.remove(table);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
