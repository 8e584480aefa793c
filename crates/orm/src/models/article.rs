use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::model::Model;

/// Publication state of an article
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArticleState {
    Draft,
    Published,
}

impl ArticleState {
    pub const ALL: [ArticleState; 2] = [ArticleState::Draft, ArticleState::Published];

    pub fn as_str(&self) -> &'static str {
        match self {
            ArticleState::Draft => "draft",
            ArticleState::Published => "published",
        }
    }
}

impl fmt::Display for ArticleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArticleState {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ArticleState::Draft),
            "published" => Ok(ArticleState::Published),
            other => Err(ModelError::Validation(format!(
                "unknown article state '{}', expected one of: draft, published",
                other
            ))),
        }
    }
}

/// A user's article
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Article {
    #[serde(default)]
    pub id: Option<i64>,
    /// Owning user; `None` only on unsaved instances whose owner was never resolved
    #[serde(default)]
    pub user_id: Option<i64>,
    pub title: String,
    pub content: String,
    pub excerpt: String,
    pub state: ArticleState,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Article {
    pub fn is_published(&self) -> bool {
        self.state == ArticleState::Published
    }
}

impl Model for Article {
    fn table_name() -> &'static str {
        "articles"
    }

    fn primary_key(&self) -> Option<i64> {
        self.id
    }

    fn set_primary_key(&mut self, key: i64) {
        self.id = Some(key);
    }

    fn uses_timestamps() -> bool {
        true
    }

    fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    fn set_created_at(&mut self, timestamp: DateTime<Utc>) {
        self.created_at = Some(timestamp);
    }

    fn set_updated_at(&mut self, timestamp: DateTime<Utc>) {
        self.updated_at = Some(timestamp);
    }

    fn validate(&self) -> ModelResult<()> {
        if self.title.trim().is_empty() {
            return Err(ModelError::Validation("article title cannot be empty".to_string()));
        }
        Ok(())
    }

    fn validate_for_insert(&self) -> ModelResult<()> {
        if self.user_id.is_none() {
            return Err(ModelError::Relationship(
                "article has no owning user".to_string(),
            ));
        }
        Ok(())
    }
}
