//! Factory definitions for the application's models
//!
//! `ArticleFactory` builds articles owned by a user created through
//! `UserFactory`; `DatabaseSeeder` wires both into a seeding run.

pub mod article;
pub mod database_seeder;
pub mod user;

pub use article::ArticleFactory;
pub use database_seeder::DatabaseSeeder;
pub use user::{UserFactory, DEFAULT_PASSWORD_HASH};
