//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `sqlx` types in any signature
//! - Traits are CRUD-focused; operations that must be atomic (placing an
//!   order, moving an order and its money together) are single methods so
//!   the adapter can wrap them in one transaction

pub mod menu_repository;
pub mod order_repository;
pub mod restaurant_repository;
pub mod review_repository;
pub mod settings_repository;
pub mod user_repository;

use std::sync::Arc;
use thiserror::Error;

pub use menu_repository::MenuRepository;
pub use order_repository::OrderRepository;
pub use restaurant_repository::RestaurantRepository;
pub use review_repository::ReviewRepository;
pub use settings_repository::SettingsRepository;
pub use user_repository::UserRepository;

#[cfg(test)]
pub use user_repository::MockUserRepository;

use crate::domain::ValidationError;
use crate::money::MoneyError;
use crate::password::PasswordError;
use crate::paths::PathError;

/// Container for all repository trait objects.
///
/// Lives in `lorma-core` so that `AppCore` can accept it without depending
/// on `lorma-db`.
///
/// # Example
///
/// ```ignore
/// // In lorma-db factory:
/// let repos = CoreFactory::build_repos(&pool);
///
/// // In adapter bootstrap:
/// let core = AppCore::new(repos);
/// ```
#[derive(Clone)]
pub struct Repos {
    pub users: Arc<dyn UserRepository>,
    pub restaurants: Arc<dyn RestaurantRepository>,
    pub menu: Arc<dyn MenuRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub reviews: Arc<dyn ReviewRepository>,
    pub settings: Arc<dyn SettingsRepository>,
}

impl Repos {
    /// Create a new Repos container.
    pub fn new(
        users: Arc<dyn UserRepository>,
        restaurants: Arc<dyn RestaurantRepository>,
        menu: Arc<dyn MenuRepository>,
        orders: Arc<dyn OrderRepository>,
        reviews: Arc<dyn ReviewRepository>,
        settings: Arc<dyn SettingsRepository>,
    ) -> Self {
        Self {
            users,
            restaurants,
            menu,
            orders,
            reviews,
            settings,
        }
    }
}

/// Domain-specific errors for repository operations.
///
/// This error type abstracts away storage implementation details (e.g., sqlx errors)
/// and provides a clean interface for services to handle storage failures.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// The requested entity was not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An entity with the same identifier already exists.
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Storage backend error (database, filesystem, etc.).
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization or deserialization failed.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// A constraint was violated (e.g., foreign key, insufficient credit,
    /// an order that changed state underneath the caller).
    #[error("Constraint violation: {0}")]
    Constraint(String),
}

/// Core error type for semantic domain errors.
///
/// This is the canonical error type used across the core domain.
/// Adapters map it to their own error types (CLI exit codes).
#[derive(Debug, Error)]
pub enum CoreError {
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Settings validation error.
    #[error(transparent)]
    Settings(#[from] crate::settings::SettingsError),

    /// Data directory or database path could not be resolved.
    #[error(transparent)]
    Path(#[from] PathError),

    /// A stored password hash is corrupt.
    #[error(transparent)]
    Password(#[from] PasswordError),

    /// Validation error (invalid input).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Wrong username or password.
    #[error("Invalid username or password")]
    Authentication,

    /// The signed-in user may not perform this action.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// The account cannot cover the amount.
    #[error("Insufficient credit: {needed} needed, {available} available")]
    InsufficientCredit {
        needed: crate::money::Money,
        available: crate::money::Money,
    },

    /// The order is not in a state that allows the requested change.
    #[error("Invalid order transition: {0}")]
    InvalidTransition(String),

    /// Internal error (unexpected condition).
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<ValidationError> for CoreError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<MoneyError> for CoreError {
    fn from(err: MoneyError) -> Self {
        match err {
            MoneyError::Overflow => Self::Internal(err.to_string()),
            MoneyError::Empty | MoneyError::Invalid(_) => Self::Validation(err.to_string()),
        }
    }
}

impl CoreError {
    pub(crate) fn denied(reason: impl Into<String>) -> Self {
        Self::PermissionDenied(reason.into())
    }

    /// Whether this error means the requested entity does not exist.
    #[must_use]
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Repository(RepositoryError::NotFound(_)))
    }
}
