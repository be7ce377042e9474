//! `SQLite` implementation of the `RestaurantRepository` trait.

use async_trait::async_trait;
use chrono::NaiveTime;
use sqlx::{Row, SqlitePool};

use lorma_core::{
    RepositoryError, Restaurant, RestaurantOrderCount, RestaurantRating, RestaurantRepository,
};

use super::row_mappers::{
    RESTAURANT_SELECT_COLUMNS, count, format_time, row_to_restaurant, storage, write_error,
};

pub struct SqliteRestaurantRepository {
    pool: SqlitePool,
}

impl SqliteRestaurantRepository {
    /// Create a new `SQLite` restaurant repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn fetch_one_by(&self, column: &str, value: &str) -> Result<Restaurant, RepositoryError> {
        let query = format!("SELECT {RESTAURANT_SELECT_COLUMNS} FROM restaurants WHERE {column} = ?");

        let row = sqlx::query(&query)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?
            .ok_or_else(|| RepositoryError::NotFound(format!("Restaurant with {column} '{value}'")))?;

        row_to_restaurant(&row)
    }
}

#[async_trait]
impl RestaurantRepository for SqliteRestaurantRepository {
    async fn get(&self, name: &str) -> Result<Restaurant, RepositoryError> {
        self.fetch_one_by("name", name).await
    }

    async fn get_by_owner(&self, username: &str) -> Result<Restaurant, RepositoryError> {
        self.fetch_one_by("owner", username).await
    }

    async fn list(&self) -> Result<Vec<Restaurant>, RepositoryError> {
        let query = format!("SELECT {RESTAURANT_SELECT_COLUMNS} FROM restaurants ORDER BY name");
        let rows = sqlx::query(&query)
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;

        rows.iter().map(row_to_restaurant).collect()
    }

    async fn insert(&self, restaurant: &Restaurant) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO restaurants (name, owner, vat_id, opening_time, closing_time) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&restaurant.name)
        .bind(&restaurant.owner)
        .bind(&restaurant.vat_id)
        .bind(format_time(restaurant.opening_time))
        .bind(format_time(restaurant.closing_time))
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, &restaurant.name))?;

        Ok(())
    }

    async fn update_hours(
        &self,
        name: &str,
        opening_time: NaiveTime,
        closing_time: NaiveTime,
    ) -> Result<(), RepositoryError> {
        let result =
            sqlx::query("UPDATE restaurants SET opening_time = ?, closing_time = ? WHERE name = ?")
                .bind(format_time(opening_time))
                .bind(format_time(closing_time))
                .bind(name)
                .execute(&self.pool)
                .await
                .map_err(storage)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Restaurant '{name}'")));
        }
        Ok(())
    }

    async fn most_ordered(&self) -> Result<Option<RestaurantOrderCount>, RepositoryError> {
        let row = sqlx::query(
            "SELECT restaurant, COUNT(*) AS n FROM orders WHERE state != 'cancelled' \
             GROUP BY restaurant ORDER BY n DESC, restaurant LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        row.map(|r| -> Result<_, RepositoryError> {
            Ok(RestaurantOrderCount {
                restaurant: r.try_get("restaurant").map_err(storage)?,
                orders: count(&r, "n")?,
            })
        })
        .transpose()
    }

    async fn lowest_rated(&self) -> Result<Option<RestaurantRating>, RepositoryError> {
        let row = sqlx::query(
            "SELECT restaurant, AVG(vote) AS average_vote, COUNT(*) AS n FROM reviews \
             GROUP BY restaurant ORDER BY average_vote ASC, restaurant LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        row.map(|r| -> Result<_, RepositoryError> {
            Ok(RestaurantRating {
                restaurant: r.try_get("restaurant").map_err(storage)?,
                average_vote: r.try_get("average_vote").map_err(storage)?,
                reviews: count(&r, "n")?,
            })
        })
        .transpose()
    }
}
