//! User repository trait definition.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{DeliverymanDeliveries, Role, User};
use crate::money::Money;

/// Repository for user accounts.
///
/// # Design Rules
///
/// - No `sqlx` types in signatures
/// - Returns `RepositoryError::NotFound` for missing usernames
/// - Credit changes go through `adjust_credit` so they are applied atomically
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Get a user by username.
    async fn get(&self, username: &str) -> Result<User, RepositoryError>;

    /// List users, optionally only those with the given role, ordered by username.
    async fn list(&self, role: Option<Role>) -> Result<Vec<User>, RepositoryError>;

    /// Count users with the given role.
    async fn count_by_role(&self, role: Role) -> Result<u64, RepositoryError>;

    /// Insert a new user.
    ///
    /// Returns `AlreadyExists` if the username is taken.
    async fn insert(&self, user: &User) -> Result<(), RepositoryError>;

    /// Delete a user. Used to roll back a half-finished registration.
    async fn delete(&self, username: &str) -> Result<(), RepositoryError>;

    /// Replace the stored password hash.
    async fn update_password(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<(), RepositoryError>;

    /// Add `delta` (which may be negative) to the user's credit and return
    /// the new balance.
    ///
    /// Returns `Constraint` if the balance would go negative or the account
    /// has no credit (admins), `NotFound` if the user does not exist.
    async fn adjust_credit(&self, username: &str, delta: Money) -> Result<Money, RepositoryError>;

    /// The deliveryman with the most delivered orders, if any.
    async fn top_deliveryman(&self) -> Result<Option<DeliverymanDeliveries>, RepositoryError>;
}
