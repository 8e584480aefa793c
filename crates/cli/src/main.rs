mod commands;
mod error;
mod logging;

use clap::{Parser, Subcommand};
use quill_orm::factory::SeederManager;

use commands::db::{self, SeedOptions};
use commands::factory::{self, FactoryKind, MakeOptions};
use logging::{init_logging, LoggingConfig};

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Seed databases and preview factory output for users and articles")]
#[command(version)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    /// Log level used when RUST_LOG is unset, replacing the preset's filter
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Debug logging outside production
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Preset for the current environment, then the explicit logging flags
    fn logging_config(&self) -> LoggingConfig {
        let mut config =
            LoggingConfig::for_environment(&SeederManager::current_environment(), self.verbose);
        if let Some(level) = &self.log_level {
            config = config.with_level(level.as_str());
        }
        if self.log_json {
            config = config.with_json(true);
        }
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Database seeding and schema management
    Db {
        #[command(subcommand)]
        db_command: DbCommands,
    },

    /// Build records with the model factories
    Factory {
        #[command(subcommand)]
        factory_command: FactoryCommands,
    },
}

#[derive(Subcommand)]
enum DbCommands {
    /// Run the default seeders
    Seed {
        /// Environment to run seeders for (development, testing, staging, production)
        #[arg(long, short)]
        env: Option<String>,

        /// Run even when the environment is not safe for seeding
        #[arg(long)]
        force: bool,

        /// Number of users to create
        #[arg(long, default_value = "10")]
        users: usize,

        /// Number of articles to create
        #[arg(long, default_value = "50")]
        articles: usize,

        /// Seed for reproducible fake data
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Show connection health and row counts
    Status {
        #[arg(long, short)]
        env: Option<String>,
    },

    /// Create the users and articles tables
    Migrate {
        #[arg(long, short)]
        env: Option<String>,
    },
}

#[derive(Subcommand)]
enum FactoryCommands {
    /// Print generated records as JSON
    Make {
        #[arg(value_enum)]
        kind: FactoryKind,

        /// Number of records to build
        #[arg(long, short, default_value = "1")]
        count: usize,

        /// Article state (draft or published)
        #[arg(long)]
        state: Option<String>,

        /// Seed for reproducible fake data
        #[arg(long)]
        seed: Option<u64>,

        /// Insert the records into the in-memory store so they get ids
        #[arg(long)]
        persist: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_logging(&cli.logging_config())?;

    match cli.command {
        Commands::Db { db_command } => match db_command {
            DbCommands::Seed {
                env,
                force,
                users,
                articles,
                seed,
            } => {
                db::seed(SeedOptions {
                    env,
                    force,
                    users,
                    articles,
                    seed,
                })
                .await?;
            }
            DbCommands::Status { env } => db::status(env.as_deref()).await?,
            DbCommands::Migrate { env } => db::migrate(env.as_deref()).await?,
        },
        Commands::Factory { factory_command } => match factory_command {
            FactoryCommands::Make {
                kind,
                count,
                state,
                seed,
                persist,
            } => {
                factory::make(MakeOptions {
                    kind,
                    count,
                    state,
                    seed,
                    persist,
                })
                .await?;
            }
        },
    }

    Ok(())
}
