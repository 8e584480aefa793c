//! Error types for the ORM system
//!
//! Provides error handling for store operations, model validation,
//! factory relationships and seeding.

use std::fmt;

/// Result type alias for model operations
pub type ModelResult<T> = Result<T, ModelError>;

/// ORM error type alias
pub type OrmError = ModelError;

/// ORM result type alias
pub type OrmResult<T> = ModelResult<T>;

/// Error types for ORM operations
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Database connection or query error
    Database(String),
    /// Model not found in the store
    NotFound(String),
    /// Model validation failed
    Validation(String),
    /// Primary key is missing or invalid
    MissingPrimaryKey,
    /// Relationship resolution failed
    Relationship(String),
    /// Serialization/deserialization error
    Serialization(String),
    /// Connection pool error
    Connection(String),
    /// Schema error
    Schema(String),
    /// Seeding error
    Seeding(String),
    /// Configuration error
    Configuration(String),
}

impl fmt::Display for ModelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelError::Database(msg) => write!(f, "Database error: {}", msg),
            ModelError::NotFound(table) => write!(f, "Record not found in table '{}'", table),
            ModelError::Validation(msg) => write!(f, "Validation error: {}", msg),
            ModelError::MissingPrimaryKey => write!(f, "Primary key is missing or invalid"),
            ModelError::Relationship(msg) => write!(f, "Relationship error: {}", msg),
            ModelError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            ModelError::Connection(msg) => write!(f, "Connection error: {}", msg),
            ModelError::Schema(msg) => write!(f, "Schema error: {}", msg),
            ModelError::Seeding(msg) => write!(f, "Seeding error: {}", msg),
            ModelError::Configuration(msg) => write!(f, "Configuration error: {}", msg),
        }
    }
}

impl std::error::Error for ModelError {}

// Convert from sqlx errors
impl From<sqlx::Error> for ModelError {
    fn from(err: sqlx::Error) -> Self {
        ModelError::Database(err.to_string())
    }
}

// Convert from serde_json errors
impl From<serde_json::Error> for ModelError {
    fn from(err: serde_json::Error) -> Self {
        ModelError::Serialization(err.to_string())
    }
}

// Convert from anyhow errors
impl From<anyhow::Error> for ModelError {
    fn from(err: anyhow::Error) -> Self {
        ModelError::Database(err.to_string())
    }
}

/// Error types for relationship resolution
#[derive(Debug, Clone)]
pub enum RelationshipError {
    /// Referenced parent record does not exist
    MissingParent { table: String, key: String },
    /// Foreign key value has the wrong shape
    InvalidKey(String),
}

impl fmt::Display for RelationshipError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelationshipError::MissingParent { table, key } => {
                write!(f, "Parent record {} not found in table '{}'", key, table)
            }
            RelationshipError::InvalidKey(msg) => write!(f, "Invalid foreign key: {}", msg),
        }
    }
}

impl std::error::Error for RelationshipError {}

impl From<RelationshipError> for ModelError {
    fn from(err: RelationshipError) -> Self {
        ModelError::Relationship(err.to_string())
    }
}
