use chrono::Utc;

use crate::error::OrmError;
use crate::factory::fake_data::{fake_name, random_string, unique_safe_email};
use crate::factory::states::UnverifiedState;
use crate::factory::{Attributes, Factory, FactoryBuilder, Factoryable};
use crate::impl_factory;
use crate::models::User;

/// Bcrypt hash of the string `password`
pub const DEFAULT_PASSWORD_HASH: &str =
    "$2y$10$92IXUNpkjO0rOQ5byMi.Ye4oKoEa3Ro9llC/.og/at2.uheWG/igi";

/// Builds verified users with unique email addresses
#[derive(Debug, Clone, Copy, Default)]
pub struct UserFactory;

impl UserFactory {
    pub fn new() -> Self {
        Self
    }

    /// Users whose email address is not verified
    pub fn unverified(self) -> FactoryBuilder<Self> {
        self.state(UnverifiedState)
    }
}

impl_factory!(UserFactory for User {
    definition: |_factory| {
        let name = fake_name();
        let email = unique_safe_email().ok_or_else(|| {
            OrmError::Validation("ran out of unique email addresses".to_string())
        })?;

        Ok(Attributes::new()
            .with("name", name)
            .with("email", email)
            .with("email_verified_at", Utc::now().to_rfc3339())
            .with("password", DEFAULT_PASSWORD_HASH)
            .with("remember_token", random_string(10)))
    }
});

impl Factoryable for User {
    type Factory = UserFactory;

    fn factory() -> Self::Factory {
        UserFactory::new()
    }
}
