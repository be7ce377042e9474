//! Menu repository trait definition.
//!
//! Covers both the shared food type catalogue and each restaurant's foods.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{Food, FoodPurchases, FoodType, FoodTypePurchases, FoodUpdate, NewFood};

#[async_trait]
pub trait MenuRepository: Send + Sync {
    // ─── Food types ───

    async fn get_food_type(&self, name: &str) -> Result<FoodType, RepositoryError>;

    async fn list_food_types(&self) -> Result<Vec<FoodType>, RepositoryError>;

    /// Returns `AlreadyExists` if a food type with this name exists.
    async fn insert_food_type(&self, food_type: &FoodType) -> Result<(), RepositoryError>;

    // ─── Foods ───

    async fn get_food(&self, id: i64) -> Result<Food, RepositoryError>;

    /// Find a food by its name within one restaurant.
    async fn find_food(&self, restaurant: &str, name: &str) -> Result<Food, RepositoryError>;

    async fn list_foods(&self, restaurant: &str) -> Result<Vec<Food>, RepositoryError>;

    /// Insert a food and return it with its generated id.
    ///
    /// Returns `AlreadyExists` if the restaurant already has a food with
    /// this name, `NotFound` if the food type does not exist.
    async fn insert_food(&self, food: &NewFood) -> Result<Food, RepositoryError>;

    /// Apply a partial update and return the updated food.
    async fn update_food(&self, id: i64, update: &FoodUpdate) -> Result<Food, RepositoryError>;

    /// Delete a food.
    ///
    /// Returns `Constraint` if any order still references it.
    async fn delete_food(&self, id: i64) -> Result<(), RepositoryError>;

    // ─── Statistics ───

    /// The food with the highest ordered quantity, cancelled orders excluded.
    async fn most_purchased_food(&self) -> Result<Option<FoodPurchases>, RepositoryError>;

    /// The food type with the highest ordered quantity, cancelled orders excluded.
    async fn most_purchased_food_type(&self)
    -> Result<Option<FoodTypePurchases>, RepositoryError>;
}
