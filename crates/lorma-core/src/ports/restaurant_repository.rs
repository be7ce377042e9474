//! Restaurant repository trait definition.

use async_trait::async_trait;
use chrono::NaiveTime;

use super::RepositoryError;
use crate::domain::{Restaurant, RestaurantOrderCount, RestaurantRating};

/// Repository for restaurants.
#[async_trait]
pub trait RestaurantRepository: Send + Sync {
    /// Get a restaurant by name.
    async fn get(&self, name: &str) -> Result<Restaurant, RepositoryError>;

    /// Get the restaurant owned by `username`.
    async fn get_by_owner(&self, username: &str) -> Result<Restaurant, RepositoryError>;

    /// List all restaurants ordered by name.
    async fn list(&self) -> Result<Vec<Restaurant>, RepositoryError>;

    /// Insert a restaurant.
    ///
    /// Returns `AlreadyExists` if the name is taken or the owner already
    /// runs a restaurant.
    async fn insert(&self, restaurant: &Restaurant) -> Result<(), RepositoryError>;

    /// Change opening and closing times.
    async fn update_hours(
        &self,
        name: &str,
        opening_time: NaiveTime,
        closing_time: NaiveTime,
    ) -> Result<(), RepositoryError>;

    /// The restaurant with the most orders (cancelled orders excluded).
    async fn most_ordered(&self) -> Result<Option<RestaurantOrderCount>, RepositoryError>;

    /// The restaurant with the lowest average review vote.
    async fn lowest_rated(&self) -> Result<Option<RestaurantRating>, RepositoryError>;
}
