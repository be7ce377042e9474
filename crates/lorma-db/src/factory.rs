//! Composition utilities for building `AppCore` with `SQLite` backends.
//!
//! This module provides factory functions for wiring up the application
//! with `SQLite` repositories. It is focused purely on construction and
//! should not contain any domain logic.

use sqlx::SqlitePool;
use std::sync::Arc;

use lorma_core::Repos;
use lorma_core::services::AppCore;

use crate::repositories::{
    SqliteMenuRepository, SqliteOrderRepository, SqliteRestaurantRepository,
    SqliteReviewRepository, SqliteSettingsRepository, SqliteUserRepository,
};

/// Factory for creating repository instances with `SQLite` backends.
pub struct CoreFactory;

impl CoreFactory {
    /// Build all `SQLite` repositories from a pool.
    ///
    /// Returns a `Repos` struct from `lorma-core` containing trait-object-wrapped
    /// repositories that all share the same pool.
    pub fn build_repos(pool: SqlitePool) -> Repos {
        Repos::new(
            Arc::new(SqliteUserRepository::new(pool.clone())),
            Arc::new(SqliteRestaurantRepository::new(pool.clone())),
            Arc::new(SqliteMenuRepository::new(pool.clone())),
            Arc::new(SqliteOrderRepository::new(pool.clone())),
            Arc::new(SqliteReviewRepository::new(pool.clone())),
            Arc::new(SqliteSettingsRepository::new(pool)),
        )
    }

    /// Build a complete `AppCore` instance from a pool.
    ///
    /// ```ignore
    /// use lorma_db::{CoreFactory, setup_database};
    ///
    /// let pool = setup_database(&db_path).await?;
    /// let core = CoreFactory::build_app_core(pool);
    /// ```
    pub fn build_app_core(pool: SqlitePool) -> AppCore {
        AppCore::new(Self::build_repos(pool))
    }
}

/// Test database helper for integration tests.
///
/// Provides an in-memory `SQLite` database with the production schema and a
/// few seeding shortcuts that bypass the services.
#[cfg(any(test, feature = "test-utils"))]
pub struct TestDb {
    pool: SqlitePool,
}

#[cfg(any(test, feature = "test-utils"))]
impl TestDb {
    /// Password of every account created by the seeding helpers.
    pub const PASSWORD: &'static str = "P@ssw0rd";

    /// Create a new in-memory test database with full schema.
    pub async fn new() -> anyhow::Result<Self> {
        let pool = crate::setup::setup_test_database().await?;
        Ok(Self { pool })
    }

    /// Get a reference to the pool.
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn repos(&self) -> Repos {
        CoreFactory::build_repos(self.pool.clone())
    }

    pub fn core(&self) -> AppCore {
        CoreFactory::build_app_core(self.pool.clone())
    }

    /// Insert an account with a zero balance (no balance for admins).
    pub async fn seed_user(
        &self,
        username: &str,
        role: lorma_core::Role,
    ) -> anyhow::Result<lorma_core::User> {
        use lorma_core::{Money, User, UserProfile, encode_password};

        let user = User {
            username: username.to_string(),
            password_hash: encode_password(Self::PASSWORD, b"lorma-test-salt-18"),
            profile: UserProfile {
                name: "Test".into(),
                surname: "User".into(),
                phone: "0547 123456".into(),
                email: format!("{username}@example.it"),
                city: "Cesena".into(),
                street: "Via Emilia".into(),
                house_number: "1".into(),
            },
            role,
            credit: role.has_credit().then_some(Money::ZERO),
        };
        self.repos().users.insert(&user).await?;
        Ok(user)
    }

    /// Insert a restaurant account and a restaurant that never closes.
    pub async fn seed_restaurant(
        &self,
        name: &str,
        owner: &str,
    ) -> anyhow::Result<(lorma_core::User, lorma_core::Restaurant)> {
        use chrono::NaiveTime;
        use lorma_core::{Restaurant, Role};

        let user = self.seed_user(owner, Role::Restaurant).await?;
        let restaurant = Restaurant {
            name: name.to_string(),
            owner: owner.to_string(),
            vat_id: "01234567890".into(),
            opening_time: NaiveTime::MIN,
            closing_time: NaiveTime::MIN,
        };
        self.repos().restaurants.insert(&restaurant).await?;
        Ok((user, restaurant))
    }
}
