//! Factory trait definitions and core abstractions

use std::sync::{RwLock, RwLockReadGuard};

use once_cell::sync::Lazy;

use super::attributes::Attributes;
use super::fake_data::seed_fake_data;
use crate::error::OrmResult;

/// Trait for factory states that can modify model attributes
#[async_trait::async_trait]
pub trait FactoryState<T>: Send + Sync {
    /// Apply state modifications to the attributes
    async fn apply(&self, attributes: &mut Attributes) -> OrmResult<()>;

    /// Get the name of this state for debugging
    fn state_name(&self) -> &str;
}

/// Trait for models that can be created by factories
pub trait Factoryable: crate::model::Model + Sized {
    /// Get the factory type for this model
    type Factory: super::Factory<Model = Self>;

    /// Create a new factory instance
    fn factory() -> Self::Factory;
}

/// Configuration for factory behavior
#[derive(Debug, Clone, PartialEq)]
pub struct FactoryConfig {
    /// Maximum count accepted by `make_many` / `create_many`
    pub max_batch_size: usize,
    /// Seed for deterministic fake data generation
    pub seed: Option<u64>,
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            max_batch_size: 1000,
            seed: None,
        }
    }
}

/// Global factory configuration
static FACTORY_CONFIG: Lazy<RwLock<FactoryConfig>> =
    Lazy::new(|| RwLock::new(FactoryConfig::default()));

/// Get a read guard for the global factory configuration.
pub fn factory_config() -> RwLockReadGuard<'static, FactoryConfig> {
    FACTORY_CONFIG.read().unwrap_or_else(|e| e.into_inner())
}

/// Set the global factory configuration
pub fn set_factory_config(config: FactoryConfig) {
    *FACTORY_CONFIG.write().unwrap_or_else(|e| e.into_inner()) = config;
}

/// Install a configuration and seed this thread's generator when it names a seed
pub fn configure_factories(config: FactoryConfig) {
    if let Some(seed) = config.seed {
        seed_fake_data(seed);
        tracing::debug!(seed, "seeded fake data generator");
    }
    set_factory_config(config);
}

/// Macro for easily implementing the Factory trait
///
/// The definition block evaluates to `OrmResult<Attributes>`.
#[macro_export]
macro_rules! impl_factory {
    ($factory:ident for $model:ty {
        definition: |$def_self:ident| $definition:block
    }) => {
        #[async_trait::async_trait]
        impl $crate::factory::Factory for $factory {
            type Model = $model;

            async fn definition(&self) -> $crate::error::OrmResult<$crate::factory::Attributes> {
                let $def_self = self;
                $definition
            }
        }
    };
}
