use quill_orm::factory::Environment;
use quill_orm::OrmError;
use thiserror::Error;

/// Errors surfaced by `quill` commands
#[derive(Debug, Error)]
pub enum CliError {
    #[error("database error: {0}")]
    Database(String),

    #[error("environment '{0}' is not safe for seeding, pass --force to run anyway")]
    UnsafeEnvironment(Environment),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("failed to initialize logging: {0}")]
    Logging(String),

    #[error(transparent)]
    Orm(#[from] OrmError),

    #[error("failed to encode output: {0}")]
    Json(#[from] serde_json::Error),
}
