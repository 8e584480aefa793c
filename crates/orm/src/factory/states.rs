//! Factory states for applying common model variations

use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{DateTime, Utc};
use serde_json::{json, Value};

use super::attributes::{Attribute, Attributes};
use super::traits::FactoryState;
use crate::error::{OrmError, OrmResult};
use crate::models::ArticleState;

/// Draft article state
#[derive(Debug, Clone)]
pub struct DraftState;

#[async_trait::async_trait]
impl<T> FactoryState<T> for DraftState {
    async fn apply(&self, attributes: &mut Attributes) -> OrmResult<()> {
        attributes.set("state", ArticleState::Draft.as_str());
        Ok(())
    }

    fn state_name(&self) -> &str {
        "Draft"
    }
}

/// Published article state
#[derive(Debug, Clone)]
pub struct PublishedState;

#[async_trait::async_trait]
impl<T> FactoryState<T> for PublishedState {
    async fn apply(&self, attributes: &mut Attributes) -> OrmResult<()> {
        attributes.set("state", ArticleState::Published.as_str());
        Ok(())
    }

    fn state_name(&self) -> &str {
        "Published"
    }
}

/// User whose email address was never verified
#[derive(Debug, Clone)]
pub struct UnverifiedState;

#[async_trait::async_trait]
impl<T> FactoryState<T> for UnverifiedState {
    async fn apply(&self, attributes: &mut Attributes) -> OrmResult<()> {
        attributes.set("email_verified_at", Value::Null);
        Ok(())
    }

    fn state_name(&self) -> &str {
        "Unverified"
    }
}

/// Cycles one column through a fixed list of values, one per built record
#[derive(Debug)]
pub struct Sequence {
    column: String,
    values: Vec<Value>,
    next: AtomicUsize,
}

impl Sequence {
    pub fn new(column: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            column: column.into(),
            values,
            next: AtomicUsize::new(0),
        }
    }

    /// Number of records built through this sequence so far
    pub fn position(&self) -> usize {
        self.next.load(Ordering::Relaxed)
    }
}

#[async_trait::async_trait]
impl<T> FactoryState<T> for Sequence {
    async fn apply(&self, attributes: &mut Attributes) -> OrmResult<()> {
        if self.values.is_empty() {
            return Err(OrmError::Validation(format!(
                "sequence for '{}' has no values",
                self.column
            )));
        }

        let index = self.next.fetch_add(1, Ordering::Relaxed) % self.values.len();
        attributes.set(self.column.clone(), self.values[index].clone());
        Ok(())
    }

    fn state_name(&self) -> &str {
        "Sequence"
    }
}

/// Custom state builder for flexible state creation
#[derive(Debug, Clone)]
pub struct CustomState {
    modifications: Attributes,
    name: String,
}

impl CustomState {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            modifications: Attributes::new(),
            name: name.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Attribute>) -> Self {
        self.modifications.set(key, value);
        self
    }

    pub fn with_state(self, state: ArticleState) -> Self {
        self.with("state", state.as_str())
    }

    pub fn with_timestamp(self, field: impl Into<String>, datetime: DateTime<Utc>) -> Self {
        self.with(field, json!(datetime.to_rfc3339()))
    }

    pub fn with_null(self, field: impl Into<String>) -> Self {
        self.with(field, Value::Null)
    }
}

#[async_trait::async_trait]
impl<T> FactoryState<T> for CustomState {
    async fn apply(&self, attributes: &mut Attributes) -> OrmResult<()> {
        attributes.merge(&self.modifications);
        Ok(())
    }

    fn state_name(&self) -> &str {
        &self.name
    }
}

/// Macro for creating custom states easily
#[macro_export]
macro_rules! factory_state {
    ($name:ident { $($field:ident: $value:expr),* $(,)? }) => {
        #[derive(Debug, Clone)]
        pub struct $name;

        #[async_trait::async_trait]
        impl<T> $crate::factory::FactoryState<T> for $name {
            async fn apply(
                &self,
                attributes: &mut $crate::factory::Attributes,
            ) -> $crate::error::OrmResult<()> {
                $(
                    attributes.set(stringify!($field), serde_json::json!($value));
                )*
                Ok(())
            }

            fn state_name(&self) -> &str {
                stringify!($name)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_draft_and_published_states() {
        let mut attributes = Attributes::new().with("state", "published");

        FactoryState::<()>::apply(&DraftState, &mut attributes).await.unwrap();
        assert_eq!(attributes.value("state"), Some(&json!("draft")));

        FactoryState::<()>::apply(&PublishedState, &mut attributes).await.unwrap();
        assert_eq!(attributes.value("state"), Some(&json!("published")));
        assert_eq!(FactoryState::<()>::state_name(&PublishedState), "Published");
    }

    #[tokio::test]
    async fn test_unverified_state() {
        let mut attributes = Attributes::new().with("email_verified_at", "2024-01-01T00:00:00Z");

        FactoryState::<()>::apply(&UnverifiedState, &mut attributes).await.unwrap();

        assert!(attributes.value("email_verified_at").unwrap().is_null());
    }

    #[tokio::test]
    async fn test_sequence_cycles_values() {
        let sequence = Sequence::new("state", vec![json!("draft"), json!("published")]);
        let mut seen = Vec::new();

        for _ in 0..4 {
            let mut attributes = Attributes::new();
            FactoryState::<()>::apply(&sequence, &mut attributes).await.unwrap();
            seen.push(attributes.value("state").cloned().unwrap());
        }

        assert_eq!(
            seen,
            vec![json!("draft"), json!("published"), json!("draft"), json!("published")]
        );
        assert_eq!(sequence.position(), 4);
    }

    #[tokio::test]
    async fn test_empty_sequence_is_rejected() {
        let sequence = Sequence::new("state", vec![]);
        let mut attributes = Attributes::new();

        let result = FactoryState::<()>::apply(&sequence, &mut attributes).await;
        assert!(matches!(result, Err(OrmError::Validation(_))));
    }

    #[tokio::test]
    async fn test_custom_state() {
        let state = CustomState::new("featured")
            .with("title", "Pinned")
            .with_state(ArticleState::Published)
            .with_null("excerpt");

        let mut attributes = Attributes::new().with("title", "Original");
        FactoryState::<()>::apply(&state, &mut attributes).await.unwrap();

        assert_eq!(attributes.value("title"), Some(&json!("Pinned")));
        assert_eq!(attributes.value("state"), Some(&json!("published")));
        assert!(attributes.value("excerpt").unwrap().is_null());
        assert_eq!(state.name(), "featured");
        assert_eq!(FactoryState::<()>::state_name(&state), "featured");
    }

    factory_state!(ArchivedTitle { title: "Archived" });

    #[tokio::test]
    async fn test_factory_state_macro() {
        let mut attributes = Attributes::new();
        FactoryState::<()>::apply(&ArchivedTitle, &mut attributes).await.unwrap();

        assert_eq!(attributes.value("title"), Some(&json!("Archived")));
        assert_eq!(FactoryState::<()>::state_name(&ArchivedTitle), "ArchivedTitle");
    }
}
