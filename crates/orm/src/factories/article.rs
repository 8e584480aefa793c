use crate::error::{OrmError, OrmResult};
use crate::factory::fake_data::{fake_paragraph, fake_sentence, random_element};
use crate::factory::states::{DraftState, PublishedState};
use crate::factory::{Attributes, Factory, FactoryBuilder, Factoryable};
use crate::models::{Article, ArticleState, User};

use super::user::UserFactory;

/// Sentences in an article body before variation
pub const CONTENT_SENTENCES: usize = 6;

/// Sentences in an article excerpt before variation
pub const EXCERPT_SENTENCES: usize = 3;

/// Builds articles with lorem text and a random publication state
///
/// Unless a `user_id` is given, the owner is created through [`UserFactory`]
/// by `make_in` and `create`. Store-less `make` previews leave it null.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArticleFactory;

impl ArticleFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn draft(self) -> FactoryBuilder<Self> {
        self.state(DraftState)
    }

    pub fn published(self) -> FactoryBuilder<Self> {
        self.state(PublishedState)
    }

    /// Articles owned by an existing user
    pub fn for_user(self, user: &User) -> FactoryBuilder<Self> {
        self.for_parent("user_id", user)
    }
}

#[async_trait::async_trait]
impl Factory for ArticleFactory {
    type Model = Article;

    async fn definition(&self) -> OrmResult<Attributes> {
        let states: Vec<&str> = ArticleState::ALL.iter().map(ArticleState::as_str).collect();
        let state = random_element(&states)
            .ok_or_else(|| OrmError::Validation("no article states to pick from".to_string()))?;

        Ok(Attributes::new()
            .with("user_id", UserFactory::new().as_parent())
            .with("title", fake_sentence())
            .with("content", fake_paragraph(CONTENT_SENTENCES))
            .with("excerpt", fake_paragraph(EXCERPT_SENTENCES))
            .with("state", state))
    }
}

impl Factoryable for Article {
    type Factory = ArticleFactory;

    fn factory() -> Self::Factory {
        ArticleFactory::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::Attribute;
    use crate::store::{MemoryStore, Store};

    #[tokio::test]
    async fn test_definition_shape() {
        let attributes = ArticleFactory::new().definition().await.unwrap();

        assert!(matches!(attributes.get("user_id"), Some(Attribute::BelongsTo(_))));
        for column in ["title", "content", "excerpt", "state"] {
            assert!(attributes.value(column).is_some(), "missing {}", column);
        }
        assert_eq!(attributes.len(), 5);
    }

    #[tokio::test]
    async fn test_make_does_not_touch_users() {
        let article = ArticleFactory::new().make().await.unwrap();

        assert!(article.id.is_none());
        assert!(article.user_id.is_none());
        assert!(article.title.ends_with('.'));
        assert!(!article.content.is_empty());
        assert!(!article.excerpt.is_empty());
    }

    #[tokio::test]
    async fn test_make_in_creates_owner_but_not_article() {
        let store = MemoryStore::new();
        let article = ArticleFactory::new().make_in(&store).await.unwrap();

        assert!(article.id.is_none());
        assert_eq!(article.user_id, Some(1));
        assert_eq!(store.count("users").await.unwrap(), 1);
        assert_eq!(store.count("articles").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_create_makes_one_owner() {
        let store = MemoryStore::new();
        let article = ArticleFactory::new().create(&store).await.unwrap();

        assert_eq!(article.id, Some(1));
        assert_eq!(article.user_id, Some(1));
        assert_eq!(store.count("users").await.unwrap(), 1);
        assert_eq!(store.count("articles").await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_draft_and_published_helpers() {
        let draft = ArticleFactory::new().draft().make().await.unwrap();
        let published = ArticleFactory::new().published().make().await.unwrap();

        assert_eq!(draft.state, ArticleState::Draft);
        assert!(published.is_published());
    }

    #[tokio::test]
    async fn test_for_user() {
        let store = MemoryStore::new();
        let user = UserFactory::new().create(&store).await.unwrap();

        let articles = Article::factory()
            .for_user(&user)
            .create_many(&store, 3)
            .await
            .unwrap();

        assert!(articles.iter().all(|a| a.user_id == user.id));
        assert_eq!(store.count("users").await.unwrap(), 1);
    }
}
