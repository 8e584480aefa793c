use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, ModelResult};
use crate::model::Model;

/// Account that owns articles
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub email_verified_at: Option<DateTime<Utc>>,
    pub password: String,
    #[serde(default)]
    pub remember_token: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn is_verified(&self) -> bool {
        self.email_verified_at.is_some()
    }
}

impl Model for User {
    fn table_name() -> &'static str {
        "users"
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
        if !self.email.contains('@') {
            return Err(ModelError::Validation(format!(
                "'{}' is not an email address",
                self.email
            )));
        }
        Ok(())
    }
}
