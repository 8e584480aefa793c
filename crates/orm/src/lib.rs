//! # quill-orm: Models, factories and seeders
//!
//! Builds `User` and `Article` records with realistic fake data, either in
//! memory or persisted through a [`Store`] (Postgres or the in-memory store
//! used by tests), and runs environment-aware seeders on top of the factories.
//!
//! ```no_run
//! use quill_orm::{ArticleFactory, Factory, MemoryStore};
//!
//! # async fn demo() -> quill_orm::OrmResult<()> {
//! let store = MemoryStore::new();
//! let article = ArticleFactory::new().published().create(&store).await?;
//! assert!(article.user_id.is_some());
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod factories;
pub mod factory;
pub mod model;
pub mod models;
pub mod schema;
pub mod security;
pub mod store;

// Re-export core traits and types
pub use error::*;
pub use factories::{ArticleFactory, DatabaseSeeder, UserFactory};
pub use factory::{
    Attribute, Attributes, Factory, FactoryBuilder, FactoryConfig, FactoryState, Factoryable,
    SeederManager,
};
pub use model::{CrudOperations, Fields, Model};
pub use models::{Article, ArticleState, User};
pub use store::{MemoryStore, PostgresStore, Store, StoreConfig};
