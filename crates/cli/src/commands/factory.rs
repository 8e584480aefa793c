use clap::ValueEnum;
use serde_json::Value;

use quill_orm::factory::fake_data::reset_unique;
use quill_orm::factory::{configure_factories, FactoryConfig};
use quill_orm::{ArticleFactory, ArticleState, Factory, MemoryStore, UserFactory};

use crate::error::CliError;

/// Record kinds `quill factory make` can build
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FactoryKind {
    Article,
    User,
}

/// Options for `quill factory make`
#[derive(Debug, Clone)]
pub struct MakeOptions {
    pub kind: FactoryKind,
    pub count: usize,
    pub state: Option<String>,
    pub seed: Option<u64>,
    pub persist: bool,
}

/// Print generated records as a JSON array
pub async fn make(options: MakeOptions) -> Result<(), CliError> {
    let records = generate(&options).await?;
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}

/// Build the records against an in-memory store so owners always exist; `persist` also inserts them
pub async fn generate(options: &MakeOptions) -> Result<Vec<Value>, CliError> {
    if let Some(seed) = options.seed {
        reset_unique();
        configure_factories(FactoryConfig {
            seed: Some(seed),
            ..FactoryConfig::default()
        });
    }

    let store = MemoryStore::new();

    let records = match options.kind {
        FactoryKind::Article => {
            let mut builder = ArticleFactory::new().builder();
            if let Some(state) = &options.state {
                let state: ArticleState = state
                    .parse()
                    .map_err(|e| CliError::InvalidArgument(format!("{}", e)))?;
                builder = builder.with("state", state.as_str());
            }

            let articles = if options.persist {
                builder.create_many(&store, options.count).await?
            } else {
                builder.make_many_in(&store, options.count).await?
            };
            serde_json::to_value(articles)?
        }
        FactoryKind::User => {
            if options.state.is_some() {
                return Err(CliError::InvalidArgument(
                    "--state only applies to articles".to_string(),
                ));
            }

            let users = if options.persist {
                UserFactory::new().create_many(&store, options.count).await?
            } else {
                UserFactory::new().make_many_in(&store, options.count).await?
            };
            serde_json::to_value(users)?
        }
    };

    tracing::debug!(kind = ?options.kind, count = options.count, persist = options.persist, "generated records");

    match records {
        Value::Array(records) => Ok(records),
        other => Ok(vec![other]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    fn options(kind: FactoryKind) -> MakeOptions {
        MakeOptions {
            kind,
            count: 3,
            state: None,
            seed: None,
            persist: false,
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_make_articles_resolves_owners_without_ids() {
        let records = generate(&options(FactoryKind::Article)).await.unwrap();

        assert_eq!(records.len(), 3);
        let owners: Vec<i64> = records
            .iter()
            .map(|r| r["user_id"].as_i64().unwrap())
            .collect();
        assert_eq!(owners, vec![1, 2, 3]);
        for record in &records {
            assert!(record["id"].is_null());
            let state = record["state"].as_str().unwrap();
            assert!(state == "draft" || state == "published");
        }
    }

    #[tokio::test]
    #[serial]
    async fn test_persisted_articles_get_owners() {
        let mut opts = options(FactoryKind::Article);
        opts.persist = true;
        opts.state = Some("draft".to_string());

        let records = generate(&opts).await.unwrap();

        let ids: Vec<i64> = records.iter().map(|r| r["id"].as_i64().unwrap()).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert!(records.iter().all(|r| r["user_id"].is_i64()));
        assert!(records.iter().all(|r| r["state"] == "draft"));
    }

    #[tokio::test]
    #[serial]
    async fn test_invalid_state() {
        let mut opts = options(FactoryKind::Article);
        opts.state = Some("archived".to_string());
        assert!(matches!(
            generate(&opts).await,
            Err(CliError::InvalidArgument(_))
        ));

        let mut opts = options(FactoryKind::User);
        opts.state = Some("draft".to_string());
        assert!(matches!(
            generate(&opts).await,
            Err(CliError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    #[serial]
    async fn test_seed_makes_output_repeatable() {
        let mut opts = options(FactoryKind::Article);
        opts.seed = Some(42);

        let first = generate(&opts).await.unwrap();
        let second = generate(&opts).await.unwrap();

        let titles = |records: &[Value]| -> Vec<String> {
            records
                .iter()
                .map(|r| r["title"].as_str().unwrap().to_string())
                .collect()
        };
        assert_eq!(titles(&first), titles(&second));

        configure_factories(FactoryConfig::default());
    }
}
