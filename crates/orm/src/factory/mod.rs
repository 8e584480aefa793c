//! Database Factory System
//!
//! Factories describe the default attributes of a model. Building a record
//! runs the definition, applies states in order, applies explicit overrides,
//! resolves belongs-to parents and finally converts the attributes into the
//! model (which validates them). `make` skips parent resolution, `make_in`
//! resolves parents against a store and `create` also saves the model.

use std::collections::HashMap;

use serde_json::Value;

use crate::error::{OrmError, OrmResult};
use crate::model::{CrudOperations, Model};
use crate::store::Store;

pub mod attributes;
pub mod fake_data;
pub mod relationships;
pub mod seeder;
pub mod states;
pub mod traits;

pub use attributes::{Attribute, Attributes};
pub use relationships::{BelongsToFactory, HasManyFactory, ParentFactory, RelationshipType};
pub use seeder::{Environment, Seeder, SeederManager};
pub use traits::{configure_factories, factory_config, FactoryConfig, FactoryState, Factoryable};

/// Core factory trait that all model factories implement
#[async_trait::async_trait]
pub trait Factory: Send + Sync {
    /// The model this factory builds
    type Model: Model + 'static;

    /// Define the default attributes for the model
    async fn definition(&self) -> OrmResult<Attributes>;

    /// Build a single model without a store; pending parents stay null
    async fn make(&self) -> OrmResult<Self::Model> {
        make_with(self, &[], &Attributes::new()).await
    }

    /// Build a single model whose parents exist in `store`, without saving the model
    async fn make_in(&self, store: &dyn Store) -> OrmResult<Self::Model> {
        make_in_with(self, &[], &Attributes::new(), store).await
    }

    /// Create and save a single model instance
    async fn create(&self, store: &dyn Store) -> OrmResult<Self::Model> {
        create_with(self, &[], &Attributes::new(), store).await
    }

    /// Create multiple model instances without saving
    async fn make_many(&self, count: usize) -> OrmResult<Vec<Self::Model>> {
        check_batch_size(count)?;
        let mut models = Vec::with_capacity(count);
        for _ in 0..count {
            models.push(self.make().await?);
        }
        Ok(models)
    }

    /// Build multiple models against `store` without saving them
    async fn make_many_in(&self, store: &dyn Store, count: usize) -> OrmResult<Vec<Self::Model>> {
        check_batch_size(count)?;
        let mut models = Vec::with_capacity(count);
        for _ in 0..count {
            models.push(self.make_in(store).await?);
        }
        Ok(models)
    }

    /// Create and save multiple model instances
    async fn create_many(&self, store: &dyn Store, count: usize) -> OrmResult<Vec<Self::Model>> {
        check_batch_size(count)?;
        let mut models = Vec::with_capacity(count);
        for _ in 0..count {
            models.push(self.create(store).await?);
        }
        Ok(models)
    }

    /// Start a builder from this factory
    fn builder(self) -> FactoryBuilder<Self>
    where
        Self: Sized,
    {
        FactoryBuilder::new(self)
    }

    /// Override specific attributes for the built instances
    fn with_attributes(self, attributes: HashMap<String, Value>) -> FactoryBuilder<Self>
    where
        Self: Sized,
    {
        FactoryBuilder::new(self).with_attributes(attributes)
    }

    /// Override a single attribute
    fn with(self, key: &str, value: impl Into<Attribute>) -> FactoryBuilder<Self>
    where
        Self: Sized,
    {
        FactoryBuilder::new(self).with(key, value)
    }

    /// Apply a factory state
    fn state<S>(self, state: S) -> FactoryBuilder<Self>
    where
        Self: Sized,
        S: FactoryState<Self::Model> + 'static,
    {
        FactoryBuilder::new(self).state(state)
    }

    /// Point a foreign key column at an existing parent
    fn for_parent<P: Model>(self, column: &str, parent: &P) -> FactoryBuilder<Self>
    where
        Self: Sized,
    {
        FactoryBuilder::new(self).for_parent(column, parent)
    }

    /// Use this factory as the pending parent of a belongs-to column
    fn as_parent(self) -> Attribute
    where
        Self: Sized + 'static,
    {
        Attribute::BelongsTo(std::sync::Arc::new(BelongsToFactory::new(self)))
    }
}

fn check_batch_size(count: usize) -> OrmResult<()> {
    let max = factory_config().max_batch_size;
    if count > max {
        return Err(OrmError::Validation(format!(
            "requested {} records, batch limit is {}",
            count, max
        )));
    }
    Ok(())
}

/// Definition, then states in order, then overrides
async fn build_attributes<F>(
    factory: &F,
    states: &[Box<dyn FactoryState<F::Model>>],
    overrides: &Attributes,
) -> OrmResult<Attributes>
where
    F: Factory + ?Sized,
{
    let table = <F::Model as Model>::table_name();
    let mut attributes = factory.definition().await?;

    for state in states {
        state.apply(&mut attributes).await?;
        tracing::trace!(table, state = state.state_name(), "applied factory state");
    }

    attributes.merge(overrides);
    Ok(attributes)
}

/// Build one unsaved model
pub(crate) async fn make_with<F>(
    factory: &F,
    states: &[Box<dyn FactoryState<F::Model>>],
    overrides: &Attributes,
) -> OrmResult<F::Model>
where
    F: Factory + ?Sized,
{
    let attributes = build_attributes(factory, states, overrides).await?;
    <F::Model as Model>::from_fields(attributes.resolve_unsaved())
}

/// Build one model with resolved parents, leaving it unsaved
pub(crate) async fn make_in_with<F>(
    factory: &F,
    states: &[Box<dyn FactoryState<F::Model>>],
    overrides: &Attributes,
    store: &dyn Store,
) -> OrmResult<F::Model>
where
    F: Factory + ?Sized,
{
    let attributes = build_attributes(factory, states, overrides).await?;
    let fields = attributes.resolve(store).await?;
    <F::Model as Model>::from_fields(fields)
}

/// Build and store one model, creating pending parents first
pub(crate) async fn create_with<F>(
    factory: &F,
    states: &[Box<dyn FactoryState<F::Model>>],
    overrides: &Attributes,
    store: &dyn Store,
) -> OrmResult<F::Model>
where
    F: Factory + ?Sized,
{
    let model = make_in_with(factory, states, overrides, store).await?;
    <F::Model as CrudOperations>::create(store, model).await
}

/// Builder for factory instances with states and custom attributes
pub struct FactoryBuilder<F: Factory> {
    factory: F,
    states: Vec<Box<dyn FactoryState<F::Model>>>,
    attributes: Attributes,
}

impl<F: Factory> FactoryBuilder<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            states: Vec::new(),
            attributes: Attributes::new(),
        }
    }

    /// Add or override an attribute
    pub fn with(mut self, key: &str, value: impl Into<Attribute>) -> Self {
        self.attributes.set(key, value);
        self
    }

    /// Add or override several attributes
    pub fn with_attributes(mut self, attributes: HashMap<String, Value>) -> Self {
        for (key, value) in attributes {
            self.attributes.set(key, value);
        }
        self
    }

    /// Apply a state after the ones already added
    pub fn state<S: FactoryState<F::Model> + 'static>(mut self, state: S) -> Self {
        self.states.push(Box::new(state));
        self
    }

    /// Point a foreign key column at an existing parent (null if it was never saved)
    pub fn for_parent<P: Model>(self, column: &str, parent: &P) -> Self {
        let key = parent
            .primary_key()
            .map(Value::from)
            .unwrap_or(Value::Null);
        self.with(column, key)
    }

    /// Overrides collected so far
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    /// Names of the states in application order
    pub fn state_names(&self) -> Vec<&str> {
        self.states.iter().map(|s| s.state_name()).collect()
    }

    /// Create model without saving or resolving parents
    pub async fn make(&self) -> OrmResult<F::Model> {
        make_with(&self.factory, &self.states, &self.attributes).await
    }

    /// Create model with its parents in `store`, without saving it
    pub async fn make_in(&self, store: &dyn Store) -> OrmResult<F::Model> {
        make_in_with(&self.factory, &self.states, &self.attributes, store).await
    }

    /// Create and save model
    pub async fn create(&self, store: &dyn Store) -> OrmResult<F::Model> {
        create_with(&self.factory, &self.states, &self.attributes, store).await
    }

    /// Create several models without saving
    pub async fn make_many(&self, count: usize) -> OrmResult<Vec<F::Model>> {
        check_batch_size(count)?;
        let mut models = Vec::with_capacity(count);
        for _ in 0..count {
            models.push(self.make().await?);
        }
        Ok(models)
    }

    /// Create several models with resolved parents, without saving them
    pub async fn make_many_in(&self, store: &dyn Store, count: usize) -> OrmResult<Vec<F::Model>> {
        check_batch_size(count)?;
        let mut models = Vec::with_capacity(count);
        for _ in 0..count {
            models.push(self.make_in(store).await?);
        }
        Ok(models)
    }

    /// Create and save several models
    pub async fn create_many(&self, store: &dyn Store, count: usize) -> OrmResult<Vec<F::Model>> {
        check_batch_size(count)?;
        let mut models = Vec::with_capacity(count);
        for _ in 0..count {
            models.push(self.create(store).await?);
        }
        Ok(models)
    }
}
