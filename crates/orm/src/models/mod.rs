//! Records the factories produce

pub mod article;
pub mod user;

pub use article::{Article, ArticleState};
pub use user::User;
