//! `SQLite` persistence for RistoranteLorMa.
//!
//! Implements every repository port of `lorma-core` on top of `sqlx`, plus
//! schema setup and the factory that wires repositories into an `AppCore`.

#![deny(unsafe_code)]

pub mod factory;
pub mod repositories;
pub mod setup;

// Re-export factory for convenient access
pub use factory::CoreFactory;

// Re-export TestDb for integration tests
#[cfg(any(test, feature = "test-utils"))]
pub use factory::TestDb;

// Re-export repository implementations
pub use repositories::{
    SqliteMenuRepository, SqliteOrderRepository, SqliteRestaurantRepository,
    SqliteReviewRepository, SqliteSettingsRepository, SqliteUserRepository,
};

// Re-export setup functions for convenient access
pub use setup::setup_database;
#[cfg(any(test, feature = "test-utils"))]
pub use setup::setup_test_database;
