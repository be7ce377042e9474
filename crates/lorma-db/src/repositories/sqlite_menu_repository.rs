//! `SQLite` implementation of the `MenuRepository` trait.
//!
//! Removing a food only clears its `available` flag, so orders placed
//! earlier keep resolving their lines.

use async_trait::async_trait;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use lorma_core::{
    Food, FoodPurchases, FoodType, FoodTypePurchases, FoodUpdate, MenuRepository, NewFood,
    RepositoryError,
};

use super::row_mappers::{FOOD_SELECT, count, row_to_food, row_to_food_type, storage, write_error};

pub struct SqliteMenuRepository {
    pool: SqlitePool,
}

impl SqliteMenuRepository {
    /// Create a new `SQLite` menu repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MenuRepository for SqliteMenuRepository {
    // ─── Food types ───

    async fn get_food_type(&self, name: &str) -> Result<FoodType, RepositoryError> {
        let row = sqlx::query("SELECT name, macro_type FROM food_types WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?
            .ok_or_else(|| RepositoryError::NotFound(format!("Food type '{name}'")))?;

        row_to_food_type(&row)
    }

    async fn list_food_types(&self) -> Result<Vec<FoodType>, RepositoryError> {
        let rows = sqlx::query("SELECT name, macro_type FROM food_types ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;

        rows.iter().map(row_to_food_type).collect()
    }

    async fn insert_food_type(&self, food_type: &FoodType) -> Result<(), RepositoryError> {
        sqlx::query("INSERT INTO food_types (name, macro_type) VALUES (?, ?)")
            .bind(&food_type.name)
            .bind(food_type.macro_type.as_str())
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(e, &food_type.name))?;

        Ok(())
    }

    // ─── Foods ───

    async fn get_food(&self, id: i64) -> Result<Food, RepositoryError> {
        let row = sqlx::query(&format!("{FOOD_SELECT} WHERE f.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?
            .ok_or_else(|| RepositoryError::NotFound(format!("Food with ID {id}")))?;

        row_to_food(&row)
    }

    async fn find_food(&self, restaurant: &str, name: &str) -> Result<Food, RepositoryError> {
        let row = sqlx::query(&format!(
            "{FOOD_SELECT} WHERE f.restaurant = ? AND f.name = ? AND f.available = 1"
        ))
        .bind(restaurant)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?
        .ok_or_else(|| RepositoryError::NotFound(format!("'{name}' at {restaurant}")))?;

        row_to_food(&row)
    }

    async fn list_foods(&self, restaurant: &str) -> Result<Vec<Food>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "{FOOD_SELECT} WHERE f.restaurant = ? AND f.available = 1 ORDER BY f.id"
        ))
        .bind(restaurant)
        .fetch_all(&self.pool)
        .await
        .map_err(storage)?;

        rows.iter().map(row_to_food).collect()
    }

    async fn insert_food(&self, food: &NewFood) -> Result<Food, RepositoryError> {
        let row = sqlx::query(
            "INSERT INTO foods (name, restaurant, price_cents, food_type, available) \
             VALUES (?, ?, ?, ?, 1) RETURNING id",
        )
        .bind(&food.name)
        .bind(&food.restaurant)
        .bind(food.price.cents())
        .bind(&food.food_type)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, &food.name))?;

        let id: i64 = row.try_get("id").map_err(storage)?;
        self.get_food(id).await
    }

    async fn update_food(&self, id: i64, update: &FoodUpdate) -> Result<Food, RepositoryError> {
        if update.is_empty() {
            return self.get_food(id).await;
        }

        let mut builder: QueryBuilder<'_, Sqlite> = QueryBuilder::new("UPDATE foods SET ");
        let mut fields = builder.separated(", ");
        if let Some(name) = &update.name {
            fields.push("name = ").push_bind_unseparated(name);
        }
        if let Some(price) = update.price {
            fields.push("price_cents = ").push_bind_unseparated(price.cents());
        }
        if let Some(food_type) = &update.food_type {
            fields.push("food_type = ").push_bind_unseparated(food_type);
        }
        builder.push(" WHERE id = ").push_bind(id);

        let what = update.name.clone().unwrap_or_else(|| format!("food {id}"));
        let result = builder
            .build()
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(e, what))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Food with ID {id}")));
        }
        self.get_food(id).await
    }

    async fn delete_food(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE foods SET available = 0 WHERE id = ? AND available = 1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Food with ID {id}")));
        }
        Ok(())
    }

    // ─── Statistics ───

    async fn most_purchased_food(&self) -> Result<Option<FoodPurchases>, RepositoryError> {
        let row = sqlx::query(
            "SELECT l.food_id, SUM(l.quantity) AS n FROM order_lines l \
             JOIN orders o ON o.id = l.order_id WHERE o.state != 'cancelled' \
             GROUP BY l.food_id ORDER BY n DESC, l.food_id LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let food = self
            .get_food(row.try_get("food_id").map_err(storage)?)
            .await?;
        Ok(Some(FoodPurchases {
            food,
            quantity: count(&row, "n")?,
        }))
    }

    async fn most_purchased_food_type(
        &self,
    ) -> Result<Option<FoodTypePurchases>, RepositoryError> {
        let row = sqlx::query(
            "SELECT f.food_type, SUM(l.quantity) AS n FROM order_lines l \
             JOIN orders o ON o.id = l.order_id JOIN foods f ON f.id = l.food_id \
             WHERE o.state != 'cancelled' \
             GROUP BY f.food_type ORDER BY n DESC, f.food_type LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        let Some(row) = row else {
            return Ok(None);
        };
        let name: String = row.try_get("food_type").map_err(storage)?;
        Ok(Some(FoodTypePurchases {
            food_type: self.get_food_type(&name).await?,
            quantity: count(&row, "n")?,
        }))
    }
}
