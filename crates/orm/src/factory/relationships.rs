//! Relationship factory support for creating related models

use async_trait::async_trait;

use super::attributes::Attributes;
use super::{create_with, make_with, Factory};
use crate::error::{ModelError, OrmResult};
use crate::model::Model;
use crate::store::Store;

/// Types of relationships supported by factories
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationshipType {
    BelongsTo,
    HasMany,
}

/// Object-safe handle on a parent model's factory
#[async_trait]
pub trait ParentFactory: Send + Sync {
    /// Table the foreign key points into
    fn parent_table(&self) -> &'static str;

    /// Create a parent record and return its primary key
    async fn create_key(&self, store: &dyn Store) -> OrmResult<i64>;

    /// Check that a parent with this key exists
    async fn exists(&self, store: &dyn Store, id: i64) -> OrmResult<bool> {
        store.exists(self.parent_table(), id).await
    }

    fn relationship_type(&self) -> RelationshipType {
        RelationshipType::BelongsTo
    }
}

/// Factory for creating belongs_to relationships
pub struct BelongsToFactory<F: Factory> {
    factory: F,
}

impl<F: Factory> BelongsToFactory<F> {
    pub fn new(factory: F) -> Self {
        Self { factory }
    }
}

#[async_trait]
impl<F: Factory + 'static> ParentFactory for BelongsToFactory<F> {
    fn parent_table(&self) -> &'static str {
        <F::Model as Model>::table_name()
    }

    async fn create_key(&self, store: &dyn Store) -> OrmResult<i64> {
        let parent = self.factory.create(store).await?;
        parent.primary_key().ok_or(ModelError::MissingPrimaryKey)
    }
}

/// Factory for creating has_many relationships
pub struct HasManyFactory<F: Factory> {
    factory: F,
    foreign_key: String,
    count: usize,
}

impl<F: Factory> HasManyFactory<F> {
    pub fn new(factory: F, foreign_key: impl Into<String>, count: usize) -> Self {
        Self {
            factory,
            foreign_key: foreign_key.into(),
            count,
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn relationship_type(&self) -> RelationshipType {
        RelationshipType::HasMany
    }

    fn overrides_for<P: Model>(&self, parent: &P) -> OrmResult<Attributes> {
        let id = parent.primary_key().ok_or(ModelError::MissingPrimaryKey)?;
        Ok(Attributes::new().with(self.foreign_key.clone(), id))
    }

    /// Create `count` children owned by a stored parent
    pub async fn create_for_parent<P: Model>(
        &self,
        parent: &P,
        store: &dyn Store,
    ) -> OrmResult<Vec<F::Model>> {
        let overrides = self.overrides_for(parent)?;
        let mut children = Vec::with_capacity(self.count);
        for _ in 0..self.count {
            children.push(create_with(&self.factory, &[], &overrides, store).await?);
        }
        Ok(children)
    }

    /// Build `count` unsaved children pointing at a stored parent
    pub async fn make_for_parent<P: Model>(&self, parent: &P) -> OrmResult<Vec<F::Model>> {
        let overrides = self.overrides_for(parent)?;
        let mut children = Vec::with_capacity(self.count);
        for _ in 0..self.count {
            children.push(make_with(&self.factory, &[], &overrides).await?);
        }
        Ok(children)
    }
}
