//! PostgreSQL store
//!
//! Field maps are sent as a single JSONB parameter and expanded with
//! `jsonb_populate_record`, so Postgres coerces each value to its column type
//! (timestamps arrive as RFC 3339 strings, foreign keys as numbers).

use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use sqlx::postgres::PgPoolOptions;
use sqlx::types::Json;
use sqlx::{Pool, Postgres};

use super::Store;
use crate::error::{OrmError, OrmResult};
use crate::model::Fields;
use crate::schema;
use crate::security::safe_identifier;

/// Connection pool configuration
#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
    pub idle_timeout_seconds: Option<u64>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            max_connections: 10,
            min_connections: 1,
            acquire_timeout_seconds: 30,
            idle_timeout_seconds: Some(600), // 10 minutes
        }
    }
}

/// Store backed by a sqlx Postgres pool
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: Pool<Postgres>,
}

impl PostgresStore {
    /// Wrap an existing pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Connect to `database_url` with the given pool settings
    pub async fn connect(database_url: &str, config: StoreConfig) -> OrmResult<Self> {
        if !database_url.starts_with("postgresql://") && !database_url.starts_with("postgres://") {
            return Err(OrmError::Connection("Invalid PostgreSQL URL scheme".to_string()));
        }

        let mut options = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_seconds));

        if let Some(idle_timeout) = config.idle_timeout_seconds {
            options = options.idle_timeout(Duration::from_secs(idle_timeout));
        }

        let pool = options
            .connect(database_url)
            .await
            .map_err(|e| OrmError::Connection(format!("Failed to create PostgreSQL pool: {}", e)))?;

        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &Pool<Postgres> {
        &self.pool
    }

    /// Round-trip a trivial query and report its latency
    pub async fn health_check(&self) -> OrmResult<Duration> {
        let start = std::time::Instant::now();

        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| OrmError::Connection(format!("Health check failed: {}", e)))?;

        Ok(start.elapsed())
    }

    /// Create the `users` and `articles` tables if they are missing
    pub async fn migrate(&self) -> OrmResult<()> {
        for statement in schema::create_statements() {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| OrmError::Schema(e.to_string()))?;
        }
        tracing::info!("schema is up to date");
        Ok(())
    }
}

/// Build the INSERT statement for a set of columns
pub(crate) fn insert_sql(table: &str, columns: &[&str]) -> OrmResult<String> {
    let table = safe_identifier(table)?;

    if columns.is_empty() {
        return Ok(format!("INSERT INTO {} DEFAULT VALUES RETURNING id", table));
    }

    let columns = columns
        .iter()
        .map(|c| safe_identifier(c))
        .collect::<OrmResult<Vec<_>>>()?
        .join(", ");

    Ok(format!(
        "INSERT INTO {table} ({columns}) SELECT {columns} FROM jsonb_populate_record(NULL::{table}, $1) RETURNING id",
    ))
}

#[async_trait]
impl Store for PostgresStore {
    async fn insert(&self, table: &str, fields: Fields) -> OrmResult<i64> {
        let mut columns: Vec<&str> = fields.keys().map(String::as_str).collect();
        columns.sort_unstable();
        let sql = insert_sql(table, &columns)?;

        let record: serde_json::Map<String, Value> = fields.into_iter().collect();
        let id: i64 = sqlx::query_scalar(&sql)
            .bind(Json(Value::Object(record)))
            .fetch_one(&self.pool)
            .await?;

        Ok(id)
    }

    async fn find(&self, table: &str, id: i64) -> OrmResult<Option<Fields>> {
        let sql = format!(
            "SELECT to_jsonb(r) FROM {} AS r WHERE r.id = $1",
            safe_identifier(table)?
        );

        let row: Option<Json<Value>> = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(Json(Value::Object(map))) => Ok(Some(map.into_iter().collect())),
            Some(Json(other)) => Err(OrmError::Serialization(format!(
                "row in '{}' decoded to a non-object value: {}",
                table, other
            ))),
            None => Ok(None),
        }
    }

    async fn count(&self, table: &str) -> OrmResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", safe_identifier(table)?);
        let count: i64 = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        Ok(count.max(0) as u64)
    }

    async fn truncate(&self, table: &str) -> OrmResult<()> {
        let sql = format!(
            "TRUNCATE TABLE {} RESTART IDENTITY CASCADE",
            safe_identifier(table)?
        );
        sqlx::query(&sql).execute(&self.pool).await?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
