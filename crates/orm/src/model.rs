//! Base Model System - Core trait and functionality for stored records
//!
//! Implements the Model trait with primary key handling, timestamps,
//! field-map conversion and the CRUD operations factories persist through.

use std::collections::HashMap;
use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::error::{ModelError, ModelResult};
use crate::store::Store;

/// Column name to JSON value map, the shape records take on their way to a store
pub type Fields = HashMap<String, Value>;

/// Trait for stored models
pub trait Model: Send + Sync + Debug + Serialize + DeserializeOwned {
    /// Table name for this model
    fn table_name() -> &'static str;

    /// Primary key field name
    fn primary_key_name() -> &'static str {
        "id"
    }

    /// Get the primary key value for this model instance
    fn primary_key(&self) -> Option<i64>;

    /// Set the primary key value for this model instance
    fn set_primary_key(&mut self, key: i64);

    /// Check if this model uses timestamps (created_at, updated_at)
    fn uses_timestamps() -> bool {
        false
    }

    /// Get created_at timestamp if available
    fn created_at(&self) -> Option<DateTime<Utc>> {
        None
    }

    /// Set created_at timestamp
    fn set_created_at(&mut self, _timestamp: DateTime<Utc>) {}

    /// Set updated_at timestamp
    fn set_updated_at(&mut self, _timestamp: DateTime<Utc>) {}

    /// Check model invariants beyond what deserialization already enforces
    fn validate(&self) -> ModelResult<()> {
        Ok(())
    }

    /// Extra checks that only apply to records about to be stored
    fn validate_for_insert(&self) -> ModelResult<()> {
        Ok(())
    }

    /// Convert the model into a field map
    fn to_fields(&self) -> ModelResult<Fields> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map.into_iter().collect()),
            other => Err(ModelError::Serialization(format!(
                "{} serialized to a non-object value: {}",
                Self::table_name(),
                other
            ))),
        }
    }

    /// Build a model from a field map
    ///
    /// A map that does not describe a valid record is a validation error,
    /// not a serialization one: the values usually come from factories.
    fn from_fields(fields: Fields) -> ModelResult<Self>
    where
        Self: Sized,
    {
        let object: serde_json::Map<String, Value> = fields.into_iter().collect();
        let model: Self = serde_json::from_value(Value::Object(object)).map_err(|e| {
            ModelError::Validation(format!("invalid {} attributes: {}", Self::table_name(), e))
        })?;
        model.validate()?;
        Ok(model)
    }
}

/// Store-backed operations available on every model
#[async_trait::async_trait]
pub trait CrudOperations: Model + Sized {
    /// Insert the model and return it with its primary key set
    async fn create(store: &dyn Store, model: Self) -> ModelResult<Self>;

    /// Find a model by its primary key
    async fn find(store: &dyn Store, id: i64) -> ModelResult<Option<Self>>;

    /// Count stored rows
    async fn count(store: &dyn Store) -> ModelResult<u64>;
}

#[async_trait::async_trait]
impl<T: Model + 'static> CrudOperations for T {
    async fn create(store: &dyn Store, mut model: Self) -> ModelResult<Self> {
        model.validate()?;
        model.validate_for_insert()?;

        if T::uses_timestamps() {
            let now = Utc::now();
            if model.created_at().is_none() {
                model.set_created_at(now);
            }
            model.set_updated_at(now);
        }

        let mut fields = model.to_fields()?;
        fields.remove(T::primary_key_name());

        let id = store.insert(T::table_name(), fields).await?;
        model.set_primary_key(id);

        tracing::debug!(table = T::table_name(), id, "created record");
        Ok(model)
    }

    async fn find(store: &dyn Store, id: i64) -> ModelResult<Option<Self>> {
        match store.find(T::table_name(), id).await? {
            Some(fields) => Ok(Some(T::from_fields(fields)?)),
            None => Ok(None),
        }
    }

    async fn count(store: &dyn Store) -> ModelResult<u64> {
        store.count(T::table_name()).await
    }
}
