use async_trait::async_trait;

use super::domain::User;
use crate::store::StoreError;

/// Storage abstraction for registered users.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts the user unless the email is already registered.
    async fn insert(&self, user: User) -> Result<User, StoreError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
}
