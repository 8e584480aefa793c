//! Default seeding run: a pool of users, then articles spread across them

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::error::OrmResult;
use crate::factory::fake_data::random_element;
use crate::factory::{Environment, Factory, Seeder, SeederManager};
use crate::model::Model;
use crate::models::{Article, User};
use crate::store::Store;

use super::{ArticleFactory, UserFactory};

/// Environments the default seeders are registered for; production still needs a forced run
fn seeding_environments() -> Vec<Environment> {
    vec![
        Environment::Development,
        Environment::Testing,
        Environment::Staging,
        Environment::Production,
    ]
}

/// Builds the [`SeederManager`] behind `db seed`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DatabaseSeeder {
    pub users: usize,
    pub articles: usize,
}

impl Default for DatabaseSeeder {
    fn default() -> Self {
        Self {
            users: 10,
            articles: 50,
        }
    }
}

impl DatabaseSeeder {
    pub fn new(users: usize, articles: usize) -> Self {
        Self { users, articles }
    }

    /// `users` runs first; `articles` picks owners among the users it created
    pub fn manager(&self) -> SeederManager {
        let owners = Arc::new(Mutex::new(Vec::new()));

        SeederManager::new()
            .add(UsersSeeder {
                count: self.users,
                owners: Arc::clone(&owners),
            })
            .add(ArticlesSeeder {
                count: self.articles,
                owners,
            })
    }
}

struct UsersSeeder {
    count: usize,
    owners: Arc<Mutex<Vec<i64>>>,
}

#[async_trait::async_trait]
impl Seeder for UsersSeeder {
    fn name(&self) -> &str {
        "users"
    }

    fn environments(&self) -> Vec<Environment> {
        seeding_environments()
    }

    fn priority(&self) -> i32 {
        10
    }

    async fn run(&self, store: &dyn Store) -> OrmResult<usize> {
        let users = UserFactory::new().create_many(store, self.count).await?;

        let mut owners = self.owners.lock().await;
        owners.extend(users.iter().filter_map(Model::primary_key));

        tracing::debug!(created = users.len(), "seeded users");
        Ok(users.len())
    }

    async fn rollback(&self, store: &dyn Store) -> OrmResult<()> {
        self.owners.lock().await.clear();
        store.truncate(User::table_name()).await
    }
}

struct ArticlesSeeder {
    count: usize,
    owners: Arc<Mutex<Vec<i64>>>,
}

#[async_trait::async_trait]
impl Seeder for ArticlesSeeder {
    fn name(&self) -> &str {
        "articles"
    }

    fn environments(&self) -> Vec<Environment> {
        seeding_environments()
    }

    fn priority(&self) -> i32 {
        20
    }

    fn dependencies(&self) -> Vec<String> {
        vec!["users".to_string()]
    }

    async fn run(&self, store: &dyn Store) -> OrmResult<usize> {
        let owners = self.owners.lock().await.clone();

        // Without seeded users every article creates its own owner
        if owners.is_empty() {
            let articles = ArticleFactory::new().create_many(store, self.count).await?;
            return Ok(articles.len());
        }

        let mut created = 0;
        for _ in 0..self.count {
            let builder = match random_element(&owners) {
                Some(owner) => ArticleFactory::new().with("user_id", owner),
                None => ArticleFactory::new().builder(),
            };
            builder.create(store).await?;
            created += 1;
        }

        tracing::debug!(created, owners = owners.len(), "seeded articles");
        Ok(created)
    }

    async fn rollback(&self, store: &dyn Store) -> OrmResult<()> {
        store.truncate(Article::table_name()).await
    }
}
