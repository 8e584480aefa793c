//! Tracing subscriber setup for the `quill` binary

use std::io;

use quill_orm::factory::Environment;
use tracing_subscriber::{fmt::Layer, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::error::CliError;

/// Logging configuration for the CLI
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Fallback level when neither `RUST_LOG` nor `env_filter` is set
    pub level: String,
    /// One JSON object per event instead of text
    pub json_format: bool,
    /// Directive string such as `quill_orm=debug,sqlx=warn`
    pub env_filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            json_format: false,
            env_filter: None,
        }
    }
}

impl LoggingConfig {
    /// Verbose text output
    pub fn development() -> Self {
        Self {
            level: "debug".to_string(),
            json_format: false,
            env_filter: Some("quill_orm=debug,quill=debug,sqlx=warn".to_string()),
        }
    }

    /// JSON output at info level
    pub fn production() -> Self {
        Self {
            level: "info".to_string(),
            json_format: true,
            env_filter: Some("quill_orm=info,quill=info,sqlx=warn".to_string()),
        }
    }

    /// Preset for a run: production logs JSON at info, `verbose` gives the development preset
    pub fn for_environment(environment: &Environment, verbose: bool) -> Self {
        match environment {
            Environment::Production => Self::production(),
            _ if verbose => Self::development(),
            _ => Self::default(),
        }
    }

    pub fn with_json(mut self, json_format: bool) -> Self {
        self.json_format = json_format;
        self
    }

    pub fn with_level<S: Into<String>>(mut self, level: S) -> Self {
        self.level = level.into();
        self.env_filter = None;
        self
    }

    /// Directives used when `RUST_LOG` is unset
    pub fn directives(&self) -> &str {
        self.env_filter.as_deref().unwrap_or(&self.level)
    }
}

/// Install the global subscriber; logs go to stderr so command output stays clean
pub fn init_logging(config: &LoggingConfig) -> Result<(), CliError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.directives()))
        .map_err(|e| CliError::Logging(e.to_string()))?;

    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.json_format {
        registry
            .with(Layer::new().with_writer(io::stderr).json())
            .try_init()
    } else {
        registry
            .with(Layer::new().with_writer(io::stderr))
            .try_init()
    };

    result.map_err(|e| CliError::Logging(e.to_string()))?;

    tracing::debug!(
        level = %config.level,
        format = if config.json_format { "json" } else { "text" },
        "logging initialized"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directives_prefer_filter() {
        assert_eq!(LoggingConfig::default().directives(), "warn");
        assert_eq!(
            LoggingConfig::development().directives(),
            "quill_orm=debug,quill=debug,sqlx=warn"
        );
        assert_eq!(LoggingConfig::production().with_level("trace").directives(), "trace");
    }

    #[test]
    fn test_for_environment_presets() {
        assert_eq!(
            LoggingConfig::for_environment(&Environment::Production, false),
            LoggingConfig::production()
        );
        assert_eq!(
            LoggingConfig::for_environment(&Environment::Development, true),
            LoggingConfig::development()
        );
        assert_eq!(
            LoggingConfig::for_environment(&Environment::Staging, false),
            LoggingConfig::default()
        );
        assert!(LoggingConfig::for_environment(&Environment::Production, true).json_format);
    }

    #[test]
    fn test_production_uses_json() {
        assert!(LoggingConfig::production().json_format);
        assert!(!LoggingConfig::default().with_json(false).json_format);
    }
}
