//! Menu service - food types and each restaurant's menu.

use std::sync::Arc;

use tracing::info;

use crate::domain::{Food, FoodType, FoodUpdate, MacroType, NewFood, Role, User};
use crate::money::Money;
use crate::ports::{CoreError, MenuRepository, OrderRepository, RepositoryError, RestaurantRepository};

/// Service for food types and menus.
pub struct MenuService {
    menu: Arc<dyn MenuRepository>,
    restaurants: Arc<dyn RestaurantRepository>,
    orders: Arc<dyn OrderRepository>,
}

impl MenuService {
    pub fn new(
        menu: Arc<dyn MenuRepository>,
        restaurants: Arc<dyn RestaurantRepository>,
        orders: Arc<dyn OrderRepository>,
    ) -> Self {
        Self {
            menu,
            restaurants,
            orders,
        }
    }

    // ─── Food types ───

    /// Add a food type to the shared catalogue (admins and restaurants).
    pub async fn add_food_type(
        &self,
        actor: &User,
        name: &str,
        macro_type: MacroType,
    ) -> Result<FoodType, CoreError> {
        if !(actor.is(Role::Admin) || actor.is(Role::Restaurant)) {
            return Err(CoreError::denied("only admins and restaurants can add food types"));
        }
        let food_type = FoodType::new(name, macro_type)?;
        self.menu
            .insert_food_type(&food_type)
            .await
            .map_err(|e| match e {
                RepositoryError::AlreadyExists(_) => {
                    CoreError::Validation(format!("Food type '{}' already exists", food_type.name))
                }
                other => other.into(),
            })?;
        info!(food_type = %food_type.name, macro_type = %food_type.macro_type, "Added food type");
        Ok(food_type)
    }

    pub async fn list_food_types(&self) -> Result<Vec<FoodType>, CoreError> {
        Ok(self.menu.list_food_types().await?)
    }

    // ─── Menus ───

    /// The current menu of a restaurant.
    pub async fn list_menu(&self, restaurant: &str) -> Result<Vec<Food>, CoreError> {
        self.restaurants.get(restaurant).await?;
        Ok(self.menu.list_foods(restaurant).await?)
    }

    /// Add an item to the actor's own menu.
    pub async fn add_food(
        &self,
        actor: &User,
        name: &str,
        price: Money,
        food_type: &str,
    ) -> Result<Food, CoreError> {
        let restaurant = self.own_restaurant(actor).await?;
        let new_food = NewFood {
            name: name.trim().to_string(),
            restaurant,
            price,
            food_type: food_type.trim().to_lowercase(),
        };
        new_food.validate()?;
        self.ensure_food_type(&new_food.food_type).await?;

        let food = self.menu.insert_food(&new_food).await.map_err(|e| match e {
            RepositoryError::AlreadyExists(_) => CoreError::Validation(format!(
                "'{}' is already on the menu of {}",
                new_food.name, new_food.restaurant
            )),
            other => other.into(),
        })?;
        info!(restaurant = %food.restaurant, food = %food.name, price = %food.price, "Added food");
        Ok(food)
    }

    /// Change name, price or type of one of the actor's foods.
    pub async fn update_food(
        &self,
        actor: &User,
        food_id: i64,
        mut update: FoodUpdate,
    ) -> Result<Food, CoreError> {
        if update.is_empty() {
            return Err(CoreError::Validation("Nothing to update".into()));
        }
        update.validate()?;
        self.owned_food(actor, food_id).await?;

        update.name = update.name.map(|n| n.trim().to_string());
        update.food_type = update.food_type.map(|t| t.trim().to_lowercase());
        if let Some(food_type) = &update.food_type {
            self.ensure_food_type(food_type).await?;
        }

        let food = self
            .menu
            .update_food(food_id, &update)
            .await
            .map_err(|e| match e {
                RepositoryError::AlreadyExists(name) => {
                    CoreError::Validation(format!("'{name}' is already on the menu"))
                }
                other => other.into(),
            })?;
        info!(restaurant = %food.restaurant, food = %food.name, "Updated food");
        Ok(food)
    }

    /// Take one of the actor's foods off the menu.
    ///
    /// Refused while an order that is still in progress contains it.
    pub async fn remove_food(&self, actor: &User, food_id: i64) -> Result<Food, CoreError> {
        let food = self.owned_food(actor, food_id).await?;
        if self.orders.food_in_open_orders(food_id).await? {
            return Err(CoreError::Validation(format!(
                "'{}' is part of orders still in progress",
                food.name
            )));
        }
        self.menu.delete_food(food_id).await?;
        info!(restaurant = %food.restaurant, food = %food.name, "Removed food");
        Ok(food)
    }

    async fn own_restaurant(&self, actor: &User) -> Result<String, CoreError> {
        if !actor.is(Role::Restaurant) {
            return Err(CoreError::denied("only restaurant accounts can edit a menu"));
        }
        Ok(self.restaurants.get_by_owner(&actor.username).await?.name)
    }

    async fn owned_food(&self, actor: &User, food_id: i64) -> Result<Food, CoreError> {
        let restaurant = self.own_restaurant(actor).await?;
        let food = self.menu.get_food(food_id).await?;
        if food.restaurant != restaurant || !food.available {
            return Err(CoreError::denied(format!(
                "food {food_id} is not on the menu of {restaurant}"
            )));
        }
        Ok(food)
    }

    async fn ensure_food_type(&self, name: &str) -> Result<(), CoreError> {
        match self.menu.get_food_type(name).await {
            Ok(_) => Ok(()),
            Err(RepositoryError::NotFound(_)) => Err(CoreError::Validation(format!(
                "Unknown food type '{name}', add it first"
            ))),
            Err(e) => Err(e.into()),
        }
    }
}
