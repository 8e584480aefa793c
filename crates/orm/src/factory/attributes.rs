//! Attribute maps produced by factory definitions
//!
//! Most attributes are plain JSON values. A belongs-to column instead holds
//! the parent's factory until the record is built: store-less builds leave
//! the column null, builds against a store create the parent and use its key.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

use serde_json::{json, Value};

use super::relationships::ParentFactory;
use crate::error::{OrmResult, RelationshipError};
use crate::model::Fields;
use crate::store::Store;

/// One column of a pending record
#[derive(Clone)]
pub enum Attribute {
    /// Literal value
    Value(Value),
    /// Parent created on demand through its factory
    BelongsTo(Arc<dyn ParentFactory>),
    /// Explicit key that must reference an existing parent
    ForeignKey {
        key: Value,
        parent: Arc<dyn ParentFactory>,
    },
}

impl Attribute {
    pub fn is_relation(&self) -> bool {
        !matches!(self, Attribute::Value(_))
    }

    /// The literal value, if this attribute is one
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Attribute::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl fmt::Debug for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Value(v) => write!(f, "Value({})", v),
            Attribute::BelongsTo(parent) => write!(f, "BelongsTo({})", parent.parent_table()),
            Attribute::ForeignKey { key, parent } => {
                write!(f, "ForeignKey({}.{})", parent.parent_table(), key)
            }
        }
    }
}

impl From<Value> for Attribute {
    fn from(value: Value) -> Self {
        Attribute::Value(value)
    }
}

impl From<&str> for Attribute {
    fn from(value: &str) -> Self {
        Attribute::Value(json!(value))
    }
}

impl From<String> for Attribute {
    fn from(value: String) -> Self {
        Attribute::Value(Value::String(value))
    }
}

impl From<i64> for Attribute {
    fn from(value: i64) -> Self {
        Attribute::Value(json!(value))
    }
}

impl From<bool> for Attribute {
    fn from(value: bool) -> Self {
        Attribute::Value(Value::Bool(value))
    }
}

/// Ordered column map; ordering keeps parent creation deterministic
#[derive(Debug, Clone, Default)]
pub struct Attributes {
    entries: BTreeMap<String, Attribute>,
}

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a column, keeping the parent link when a relation column gets a literal key
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Attribute>) {
        let key = key.into();
        let value = value.into();

        let value = match (self.entries.get(&key), value) {
            (Some(Attribute::BelongsTo(parent)), Attribute::Value(v))
            | (Some(Attribute::ForeignKey { parent, .. }), Attribute::Value(v))
                if !v.is_null() =>
            {
                Attribute::ForeignKey {
                    key: v,
                    parent: Arc::clone(parent),
                }
            }
            (_, value) => value,
        };

        self.entries.insert(key, value);
    }

    /// Builder-style [`Attributes::set`]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Attribute>) -> Self {
        self.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Attribute> {
        self.entries.get(key)
    }

    /// Literal value of a column, if set to one
    pub fn value(&self, key: &str) -> Option<&Value> {
        self.get(key).and_then(Attribute::as_value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Attribute> {
        self.entries.remove(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Apply every entry of `other` on top of this map
    pub fn merge(&mut self, other: &Attributes) {
        for (key, value) in &other.entries {
            self.set(key.clone(), value.clone());
        }
    }

    /// Resolve without touching storage: pending parents become null
    pub fn resolve_unsaved(self) -> Fields {
        self.entries
            .into_iter()
            .map(|(key, attribute)| {
                let value = match attribute {
                    Attribute::Value(v) => v,
                    Attribute::BelongsTo(_) => Value::Null,
                    Attribute::ForeignKey { key, .. } => key,
                };
                (key, value)
            })
            .collect()
    }

    /// Resolve against a store: check explicit keys, then create pending parents
    ///
    /// Every explicit key is verified before any parent is created, so a
    /// missing parent leaves the store untouched.
    pub async fn resolve(self, store: &dyn Store) -> OrmResult<Fields> {
        for (column, attribute) in &self.entries {
            if let Attribute::ForeignKey { key, parent } = attribute {
                check_foreign_key(store, column, key, parent.as_ref()).await?;
            }
        }

        let mut fields = Fields::with_capacity(self.entries.len());

        for (column, attribute) in self.entries {
            let value = match attribute {
                Attribute::Value(v) => v,
                Attribute::BelongsTo(parent) => {
                    let id = parent.create_key(store).await?;
                    tracing::debug!(column = %column, parent = parent.parent_table(), id, "created parent record");
                    json!(id)
                }
                Attribute::ForeignKey { key, .. } => key,
            };
            fields.insert(column, value);
        }

        Ok(fields)
    }
}

async fn check_foreign_key(
    store: &dyn Store,
    column: &str,
    key: &Value,
    parent: &dyn ParentFactory,
) -> OrmResult<()> {
    let id = key.as_i64().ok_or_else(|| {
        RelationshipError::InvalidKey(format!(
            "'{}' must be an integer key into '{}', got {}",
            column,
            parent.parent_table(),
            key
        ))
    })?;

    if !parent.exists(store, id).await? {
        return Err(RelationshipError::MissingParent {
            table: parent.parent_table().to_string(),
            key: id.to_string(),
        }
        .into());
    }
    Ok(())
}

impl From<HashMap<String, Value>> for Attributes {
    fn from(map: HashMap<String, Value>) -> Self {
        let mut attributes = Attributes::new();
        for (key, value) in map {
            attributes.set(key, value);
        }
        attributes
    }
}
