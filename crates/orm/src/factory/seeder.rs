//! Database seeding system with environment controls

use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::pin::Pin;

use super::Factory;
use crate::error::{OrmError, OrmResult};
use crate::model::Model;
use crate::store::Store;

/// Environment types for seeding control
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Testing,
    Staging,
    Production,
    Custom(String),
}

impl Environment {
    /// Parse environment from string
    pub fn from_str(env: &str) -> Self {
        match env.to_lowercase().as_str() {
            "development" | "dev" | "local" => Environment::Development,
            "testing" | "test" => Environment::Testing,
            "staging" | "stage" => Environment::Staging,
            "production" | "prod" => Environment::Production,
            custom => Environment::Custom(custom.to_string()),
        }
    }

    /// Get environment name as string
    pub fn as_str(&self) -> &str {
        match self {
            Environment::Development => "development",
            Environment::Testing => "testing",
            Environment::Staging => "staging",
            Environment::Production => "production",
            Environment::Custom(name) => name,
        }
    }

    /// Production and unknown environments need an explicit opt-in
    pub fn is_safe_for_seeding(&self) -> bool {
        matches!(
            self,
            Environment::Development | Environment::Testing | Environment::Staging
        )
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seeder trait for implementing database seeders
#[async_trait::async_trait]
pub trait Seeder: Send + Sync {
    /// Get the seeder name for logging and tracking
    fn name(&self) -> &str;

    /// Get environments where this seeder should run
    fn environments(&self) -> Vec<Environment> {
        vec![Environment::Development, Environment::Testing]
    }

    /// Check if this seeder should run in the given environment
    fn should_run(&self, env: &Environment) -> bool {
        self.environments().contains(env)
    }

    /// Run the seeder, returning how many records it created
    async fn run(&self, store: &dyn Store) -> OrmResult<usize>;

    /// Remove data created by this seeder
    async fn rollback(&self, _store: &dyn Store) -> OrmResult<()> {
        Ok(())
    }

    /// Get seeder priority (lower numbers run first)
    fn priority(&self) -> i32 {
        100
    }

    /// Names of seeders that must run first
    fn dependencies(&self) -> Vec<String> {
        vec![]
    }
}

/// Outcome of a seeding run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeederReport {
    pub environment: Environment,
    /// Seeder name and records created, in execution order
    pub seeders: Vec<(String, usize)>,
}

impl SeederReport {
    fn new(environment: Environment) -> Self {
        Self {
            environment,
            seeders: Vec::new(),
        }
    }

    /// Records created across every seeder
    pub fn total(&self) -> usize {
        self.seeders.iter().map(|(_, created)| created).sum()
    }

    /// Records created by one seeder, if it ran
    pub fn created_by(&self, name: &str) -> Option<usize> {
        self.seeders
            .iter()
            .find(|(seeder, _)| seeder == name)
            .map(|(_, created)| *created)
    }
}

/// Factory-based seeder for easy model creation
pub struct FactorySeeder<F: Factory> {
    name: String,
    factory: F,
    count: usize,
    environments: Vec<Environment>,
    priority: i32,
    dependencies: Vec<String>,
}

impl<F: Factory> FactorySeeder<F> {
    pub fn new(name: impl Into<String>, factory: F, count: usize) -> Self {
        Self {
            name: name.into(),
            factory,
            count,
            environments: vec![Environment::Development, Environment::Testing],
            priority: 100,
            dependencies: vec![],
        }
    }

    pub fn environments(mut self, envs: Vec<Environment>) -> Self {
        self.environments = envs;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn depends_on(mut self, dependencies: Vec<String>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn count(&self) -> usize {
        self.count
    }
}

#[async_trait::async_trait]
impl<F: Factory> Seeder for FactorySeeder<F> {
    fn name(&self) -> &str {
        &self.name
    }

    fn environments(&self) -> Vec<Environment> {
        self.environments.clone()
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn dependencies(&self) -> Vec<String> {
        self.dependencies.clone()
    }

    async fn run(&self, store: &dyn Store) -> OrmResult<usize> {
        let table = <F::Model as Model>::table_name();
        tracing::info!(seeder = %self.name, table, count = self.count, "running factory seeder");

        let models = self.factory.create_many(store, self.count).await?;

        tracing::info!(seeder = %self.name, created = models.len(), "factory seeder completed");
        Ok(models.len())
    }

    /// Empties the seeded table; rows in other tables are left to the store's cascade rules
    async fn rollback(&self, store: &dyn Store) -> OrmResult<()> {
        let table = <F::Model as Model>::table_name();
        tracing::info!(seeder = %self.name, table, "rolling back factory seeder");
        store.truncate(table).await
    }
}

/// Future returned by a [`CustomSeeder`] body
pub type SeedFuture<'a> = Pin<Box<dyn Future<Output = OrmResult<usize>> + Send + 'a>>;

type SeedFn = Box<dyn for<'a> Fn(&'a dyn Store) -> SeedFuture<'a> + Send + Sync>;

/// Custom seeder implementation for complex seeding logic
pub struct CustomSeeder {
    name: String,
    environments: Vec<Environment>,
    priority: i32,
    dependencies: Vec<String>,
    run_fn: SeedFn,
}

impl CustomSeeder {
    pub fn new<F>(name: impl Into<String>, run_fn: F) -> Self
    where
        F: for<'a> Fn(&'a dyn Store) -> SeedFuture<'a> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            environments: vec![Environment::Development, Environment::Testing],
            priority: 100,
            dependencies: vec![],
            run_fn: Box::new(run_fn),
        }
    }

    pub fn environments(mut self, envs: Vec<Environment>) -> Self {
        self.environments = envs;
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn depends_on(mut self, dependencies: Vec<String>) -> Self {
        self.dependencies = dependencies;
        self
    }
}

#[async_trait::async_trait]
impl Seeder for CustomSeeder {
    fn name(&self) -> &str {
        &self.name
    }

    fn environments(&self) -> Vec<Environment> {
        self.environments.clone()
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn dependencies(&self) -> Vec<String> {
        self.dependencies.clone()
    }

    async fn run(&self, store: &dyn Store) -> OrmResult<usize> {
        (self.run_fn)(store).await
    }
}

/// Seeder manager for running multiple seeders
#[derive(Default)]
pub struct SeederManager {
    seeders: Vec<Box<dyn Seeder>>,
}

impl SeederManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a seeder to the manager
    pub fn add<S: Seeder + 'static>(mut self, seeder: S) -> Self {
        self.seeders.push(Box::new(seeder));
        self
    }

    /// Add a factory seeder
    pub fn add_factory<F>(self, name: impl Into<String>, factory: F, count: usize) -> Self
    where
        F: Factory + 'static,
    {
        self.add(FactorySeeder::new(name, factory, count))
    }

    pub fn len(&self) -> usize {
        self.seeders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeders.is_empty()
    }

    /// Names in the order they would run for `env`
    pub fn plan(&self, env: &Environment) -> OrmResult<Vec<String>> {
        let ordered = self.resolve_dependencies(self.applicable(env))?;
        Ok(ordered.iter().map(|s| s.name().to_string()).collect())
    }

    /// Run all seeders for the given environment
    pub async fn run_for_environment(
        &self,
        store: &dyn Store,
        env: &Environment,
    ) -> OrmResult<SeederReport> {
        if !env.is_safe_for_seeding() {
            return Err(OrmError::Seeding(format!(
                "environment '{}' is not safe for automatic seeding, use a forced run",
                env
            )));
        }

        let ordered = self.resolve_dependencies(self.applicable(env))?;
        tracing::info!(environment = %env, seeders = ordered.len(), "running seeders");

        let mut report = SeederReport::new(env.clone());
        for seeder in ordered {
            tracing::info!(seeder = seeder.name(), "running seeder");
            let created = seeder.run(store).await?;
            report.seeders.push((seeder.name().to_string(), created));
        }

        tracing::info!(total = report.total(), "all seeders completed");
        Ok(report)
    }

    /// Run seeders in development environment
    pub async fn run_development(&self, store: &dyn Store) -> OrmResult<SeederReport> {
        self.run_for_environment(store, &Environment::Development)
            .await
    }

    /// Run seeders in testing environment
    pub async fn run_testing(&self, store: &dyn Store) -> OrmResult<SeederReport> {
        self.run_for_environment(store, &Environment::Testing).await
    }

    /// Run seeders for any environment, skipping the safety check
    pub async fn run_forced(
        &self,
        store: &dyn Store,
        env: &Environment,
    ) -> OrmResult<SeederReport> {
        let ordered = self.resolve_dependencies(self.applicable(env))?;

        tracing::warn!(
            environment = %env,
            seeders = ordered.len(),
            "force running seeders"
        );

        let mut report = SeederReport::new(env.clone());
        for seeder in ordered {
            tracing::warn!(seeder = seeder.name(), environment = %env, "running forced seeder");
            let created = seeder.run(store).await?;
            report.seeders.push((seeder.name().to_string(), created));
        }

        Ok(report)
    }

    /// Roll back applicable seeders in reverse execution order
    pub async fn rollback(&self, store: &dyn Store, env: &Environment) -> OrmResult<()> {
        let ordered = self.resolve_dependencies(self.applicable(env))?;
        for seeder in ordered.into_iter().rev() {
            tracing::info!(seeder = seeder.name(), "rolling back seeder");
            seeder.rollback(store).await?;
        }
        Ok(())
    }

    fn applicable(&self, env: &Environment) -> Vec<&dyn Seeder> {
        self.seeders
            .iter()
            .map(|seeder| seeder.as_ref())
            .filter(|seeder| seeder.should_run(env))
            .collect()
    }

    /// Kahn's algorithm; among ready seeders the lowest priority runs first,
    /// then registration order
    fn resolve_dependencies<'a>(&self, seeders: Vec<&'a dyn Seeder>) -> OrmResult<Vec<&'a dyn Seeder>> {
        let mut index_of: HashMap<String, usize> = HashMap::new();
        for (index, seeder) in seeders.iter().enumerate() {
            if index_of.insert(seeder.name().to_string(), index).is_some() {
                return Err(OrmError::Seeding(format!(
                    "seeder '{}' is registered twice",
                    seeder.name()
                )));
            }
        }

        let mut in_degree = vec![0usize; seeders.len()];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); seeders.len()];

        for (index, seeder) in seeders.iter().enumerate() {
            for dep in seeder.dependencies() {
                let dep_index = index_of.get(&dep).copied().ok_or_else(|| {
                    OrmError::Seeding(format!(
                        "seeder '{}' depends on '{}', but '{}' was not found",
                        seeder.name(),
                        dep,
                        dep
                    ))
                })?;
                in_degree[index] += 1;
                dependents[dep_index].push(index);
            }
        }

        let mut ready: Vec<usize> = (0..seeders.len()).filter(|&i| in_degree[i] == 0).collect();
        let mut processed = HashSet::new();
        let mut result = Vec::with_capacity(seeders.len());

        while !ready.is_empty() {
            ready.sort_by_key(|&i| (seeders[i].priority(), i));
            let current = ready.remove(0);
            processed.insert(current);
            result.push(seeders[current]);

            for &dependent in &dependents[current] {
                in_degree[dependent] -= 1;
                if in_degree[dependent] == 0 {
                    ready.push(dependent);
                }
            }
        }

        if result.len() != seeders.len() {
            let unprocessed: Vec<&str> = seeders
                .iter()
                .enumerate()
                .filter(|(i, _)| !processed.contains(i))
                .map(|(_, s)| s.name())
                .collect();

            return Err(OrmError::Seeding(format!(
                "circular dependency detected in seeders: {}",
                unprocessed.join(", ")
            )));
        }

        Ok(result)
    }

    /// Get current environment from `QUILL_ENV`, `ENV` or `ENVIRONMENT`
    pub fn current_environment() -> Environment {
        std::env::var("QUILL_ENV")
            .or_else(|_| std::env::var("ENV"))
            .or_else(|_| std::env::var("ENVIRONMENT"))
            .map(|env| Environment::from_str(&env))
            .unwrap_or(Environment::Development)
    }

    /// Run seeders for current environment
    pub async fn run(&self, store: &dyn Store) -> OrmResult<SeederReport> {
        let env = Self::current_environment();
        self.run_for_environment(store, &env).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use serial_test::serial;

    fn noop(name: &str) -> CustomSeeder {
        CustomSeeder::new(name, |_store| Box::pin(async { Ok(0) }))
    }

    #[test]
    fn test_environment_parsing() {
        assert_eq!(
            Environment::from_str("development"),
            Environment::Development
        );
        assert_eq!(Environment::from_str("dev"), Environment::Development);
        assert_eq!(Environment::from_str("local"), Environment::Development);
        assert_eq!(Environment::from_str("testing"), Environment::Testing);
        assert_eq!(Environment::from_str("TEST"), Environment::Testing);
        assert_eq!(Environment::from_str("production"), Environment::Production);
        assert_eq!(Environment::from_str("prod"), Environment::Production);
        assert_eq!(
            Environment::from_str("custom"),
            Environment::Custom("custom".to_string())
        );
    }

    #[test]
    fn test_environment_safety() {
        assert!(Environment::Development.is_safe_for_seeding());
        assert!(Environment::Testing.is_safe_for_seeding());
        assert!(Environment::Staging.is_safe_for_seeding());
        assert!(!Environment::Production.is_safe_for_seeding());
        assert!(!Environment::Custom("custom".to_string()).is_safe_for_seeding());
    }

    #[test]
    fn test_seeder_manager_creation() {
        let manager = SeederManager::new();
        assert!(manager.is_empty());
    }

    #[test]
    #[serial]
    fn test_current_environment() {
        std::env::remove_var("QUILL_ENV");
        std::env::remove_var("ENV");
        std::env::remove_var("ENVIRONMENT");
        assert_eq!(SeederManager::current_environment(), Environment::Development);

        std::env::set_var("ENVIRONMENT", "staging");
        assert_eq!(SeederManager::current_environment(), Environment::Staging);

        std::env::set_var("QUILL_ENV", "testing");
        assert_eq!(SeederManager::current_environment(), Environment::Testing);

        std::env::remove_var("QUILL_ENV");
        std::env::remove_var("ENVIRONMENT");
    }

    #[test]
    fn test_plan_orders_dependencies_before_priority() {
        let manager = SeederManager::new()
            .add(noop("articles").depends_on(vec!["users".to_string()]).with_priority(1))
            .add(noop("users").with_priority(50))
            .add(noop("settings").with_priority(10));

        let plan = manager.plan(&Environment::Development).unwrap();
        assert_eq!(plan, vec!["settings", "users", "articles"]);
    }

    #[test]
    fn test_plan_detects_cycles() {
        let manager = SeederManager::new()
            .add(noop("a").depends_on(vec!["b".to_string()]))
            .add(noop("b").depends_on(vec!["a".to_string()]))
            .add(noop("c"));

        match manager.plan(&Environment::Development) {
            Err(OrmError::Seeding(message)) => {
                assert!(message.contains("circular"));
                assert!(message.contains("a"));
                assert!(message.contains("b"));
            }
            other => panic!("expected a cycle error, got {:?}", other),
        }
    }

    #[test]
    fn test_plan_detects_missing_dependency() {
        let manager = SeederManager::new().add(noop("articles").depends_on(vec!["users".to_string()]));

        let result = manager.plan(&Environment::Development);
        assert!(matches!(result, Err(OrmError::Seeding(m)) if m.contains("'users' was not found")));
    }

    #[test]
    fn test_environment_filter() {
        let manager = SeederManager::new()
            .add(noop("dev_only").environments(vec![Environment::Development]))
            .add(noop("everywhere").environments(vec![
                Environment::Development,
                Environment::Testing,
            ]));

        assert_eq!(
            manager.plan(&Environment::Testing).unwrap(),
            vec!["everywhere"]
        );
    }

    #[tokio::test]
    async fn test_production_refused_unless_forced() {
        let store = MemoryStore::new();
        let manager = SeederManager::new().add(
            CustomSeeder::new("counted", |_store| Box::pin(async { Ok(3) }))
                .environments(vec![Environment::Production]),
        );

        let refused = manager
            .run_for_environment(&store, &Environment::Production)
            .await;
        assert!(matches!(refused, Err(OrmError::Seeding(_))));

        let report = manager
            .run_forced(&store, &Environment::Production)
            .await
            .unwrap();
        assert_eq!(report.created_by("counted"), Some(3));
        assert_eq!(report.total(), 3);
    }

    #[tokio::test]
    async fn test_custom_seeder_uses_store() {
        let store = MemoryStore::new();
        let seeder = CustomSeeder::new("tags", |store| {
            Box::pin(async move {
                let mut fields = crate::model::Fields::new();
                fields.insert("name".to_string(), serde_json::json!("rust"));
                store.insert("tags", fields).await?;
                Ok::<usize, OrmError>(1)
            })
        });

        assert_eq!(seeder.name(), "tags");
        assert_eq!(Seeder::priority(&seeder), 100);
        assert!(seeder.should_run(&Environment::Development));

        assert_eq!(seeder.run(&store).await.unwrap(), 1);
        assert_eq!(store.count("tags").await.unwrap(), 1);
    }
}
