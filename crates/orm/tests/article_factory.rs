use std::collections::HashSet;

use quill_orm::factory::fake_data::{reset_unique, seed_fake_data};
use quill_orm::factory::states::{CustomState, PublishedState, Sequence};
use quill_orm::factory::HasManyFactory;
use quill_orm::{
    Article, ArticleFactory, ArticleState, Factory, Factoryable, MemoryStore, ModelError, Store,
    User, UserFactory,
};
use serde_json::json;

#[tokio::test]
async fn make_builds_unsaved_articles_without_touching_the_store() {
    let store = MemoryStore::new();
    let articles = ArticleFactory::new().make_many(10).await.unwrap();

    assert_eq!(articles.len(), 10);
    for article in &articles {
        assert!(article.id.is_none());
        assert!(article.user_id.is_none());
        assert!(article.created_at.is_none());
    }
    assert!(store.table_names().is_empty());
}

#[tokio::test]
async fn make_in_gives_every_article_an_existing_owner() {
    let store = MemoryStore::new();
    let articles = ArticleFactory::new().make_many_in(&store, 4).await.unwrap();

    assert_eq!(store.count("users").await.unwrap(), 4);
    assert_eq!(store.count("articles").await.unwrap(), 0);
    for article in &articles {
        assert!(article.id.is_none());
        let owner = article.user_id.expect("owner resolved");
        assert!(store.exists("users", owner).await.unwrap());
    }
}

#[tokio::test]
async fn make_in_keeps_an_explicit_owner() {
    let store = MemoryStore::new();
    let user = UserFactory::new().create(&store).await.unwrap();

    let article = ArticleFactory::new()
        .for_user(&user)
        .make_in(&store)
        .await
        .unwrap();

    assert_eq!(article.user_id, user.id);
    assert_eq!(store.count("users").await.unwrap(), 1);
    assert_eq!(store.count("articles").await.unwrap(), 0);
}

#[tokio::test]
async fn both_states_are_generated() {
    let articles = ArticleFactory::new().make_many(200).await.unwrap();
    let states: HashSet<ArticleState> = articles.iter().map(|a| a.state).collect();

    assert_eq!(states.len(), 2);
}

#[tokio::test]
async fn text_fields_follow_faker_shapes() {
    for article in ArticleFactory::new().make_many(50).await.unwrap() {
        let title_words = article.title.split_whitespace().count();
        assert!((4..=9).contains(&title_words), "title: {}", article.title);
        assert!(article.title.ends_with('.'));

        let content_sentences = article.content.matches('.').count();
        assert!((4..=9).contains(&content_sentences), "content: {}", article.content);

        let excerpt_sentences = article.excerpt.matches('.').count();
        assert!((2..=5).contains(&excerpt_sentences), "excerpt: {}", article.excerpt);
    }
}

#[tokio::test]
async fn create_makes_exactly_one_user_per_article() {
    let store = MemoryStore::new();
    let articles = ArticleFactory::new().create_many(&store, 5).await.unwrap();

    assert_eq!(store.count("users").await.unwrap(), 5);
    assert_eq!(store.count("articles").await.unwrap(), 5);

    let owners: HashSet<i64> = articles.iter().map(|a| a.user_id.unwrap()).collect();
    assert_eq!(owners.len(), 5);
    for owner in owners {
        assert!(store.exists("users", owner).await.unwrap());
    }
}

#[tokio::test]
async fn explicit_owner_is_reused() {
    let store = MemoryStore::new();
    let user = UserFactory::new().create(&store).await.unwrap();

    let article = ArticleFactory::new()
        .with("user_id", user.id.unwrap())
        .create(&store)
        .await
        .unwrap();

    assert_eq!(article.user_id, user.id);
    assert_eq!(store.count("users").await.unwrap(), 1);
}

#[tokio::test]
async fn missing_owner_is_a_relationship_error() {
    let store = MemoryStore::new();

    let result = ArticleFactory::new()
        .with("user_id", 999i64)
        .create(&store)
        .await;

    match result {
        Err(ModelError::Relationship(message)) => {
            assert!(message.contains("users"));
            assert!(message.contains("999"));
        }
        other => panic!("expected a relationship error, got {:?}", other),
    }
    assert_eq!(store.count("articles").await.unwrap(), 0);
    assert_eq!(store.count("users").await.unwrap(), 0);
}

#[tokio::test]
async fn unsaved_owner_cannot_be_persisted() {
    let store = MemoryStore::new();
    let user: User = UserFactory::new().make().await.unwrap();

    let made = ArticleFactory::new().for_user(&user).make().await.unwrap();
    assert!(made.user_id.is_none());

    let result = ArticleFactory::new().for_user(&user).create(&store).await;
    assert!(matches!(result, Err(ModelError::Relationship(_))));
}

#[tokio::test]
async fn overrides_beat_states_and_states_beat_the_definition() {
    let featured = CustomState::new("featured").with("title", "From state.");

    let article = ArticleFactory::new()
        .state(PublishedState)
        .state(featured.clone())
        .with("state", "draft")
        .make()
        .await
        .unwrap();
    assert_eq!(article.state, ArticleState::Draft);
    assert_eq!(article.title, "From state.");

    let article = ArticleFactory::new()
        .state(featured)
        .with("title", "From override.")
        .make()
        .await
        .unwrap();
    assert_eq!(article.title, "From override.");
}

#[tokio::test]
async fn sequence_state_alternates_values() {
    let articles = ArticleFactory::new()
        .state(Sequence::new("state", vec![json!("draft"), json!("published")]))
        .make_many(4)
        .await
        .unwrap();

    let states: Vec<ArticleState> = articles.iter().map(|a| a.state).collect();
    assert_eq!(
        states,
        vec![
            ArticleState::Draft,
            ArticleState::Published,
            ArticleState::Draft,
            ArticleState::Published
        ]
    );
}

#[tokio::test]
async fn same_seed_gives_same_articles() {
    seed_fake_data(2024);
    let first = ArticleFactory::new().make_many(3).await.unwrap();

    seed_fake_data(2024);
    let second = ArticleFactory::new().make_many(3).await.unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn seeded_users_repeat_once_unique_emails_are_reset() {
    reset_unique();
    seed_fake_data(7);
    let first = UserFactory::new().make().await.unwrap();

    reset_unique();
    seed_fake_data(7);
    let second = UserFactory::new().make().await.unwrap();

    assert_eq!(first.name, second.name);
    assert_eq!(first.email, second.email);
}

#[tokio::test]
async fn has_many_creates_children_for_a_stored_parent() {
    let store = MemoryStore::new();
    let user = User::factory().create(&store).await.unwrap();

    let articles = HasManyFactory::new(Article::factory(), "user_id", 3)
        .create_for_parent(&user, &store)
        .await
        .unwrap();

    assert_eq!(articles.len(), 3);
    assert!(articles.iter().all(|a| a.user_id == user.id));
    assert_eq!(store.count("users").await.unwrap(), 1);
    assert_eq!(store.count("articles").await.unwrap(), 3);
}

#[tokio::test]
async fn has_many_requires_a_saved_parent() {
    let user = UserFactory::new().make().await.unwrap();

    let result = HasManyFactory::new(ArticleFactory::new(), "user_id", 2)
        .make_for_parent(&user)
        .await;

    assert!(matches!(result, Err(ModelError::MissingPrimaryKey)));
}
