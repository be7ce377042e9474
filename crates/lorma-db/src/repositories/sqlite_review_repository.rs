//! `SQLite` implementation of the `ReviewRepository` trait.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Row, SqlitePool};

use lorma_core::{NewReview, RepositoryError, Review, ReviewRepository};

use super::row_mappers::{REVIEW_SELECT_COLUMNS, format_date, row_to_review, storage, write_error};

pub struct SqliteReviewRepository {
    pool: SqlitePool,
}

impl SqliteReviewRepository {
    /// Create a new `SQLite` review repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReviewRepository for SqliteReviewRepository {
    async fn get(&self, id: i64) -> Result<Review, RepositoryError> {
        let query = format!("SELECT {REVIEW_SELECT_COLUMNS} FROM reviews WHERE id = ?");
        let row = sqlx::query(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?
            .ok_or_else(|| RepositoryError::NotFound(format!("Review with ID {id}")))?;

        row_to_review(&row)
    }

    async fn list_by_restaurant(&self, restaurant: &str) -> Result<Vec<Review>, RepositoryError> {
        let query = format!(
            "SELECT {REVIEW_SELECT_COLUMNS} FROM reviews WHERE restaurant = ? ORDER BY id DESC"
        );
        let rows = sqlx::query(&query)
            .bind(restaurant)
            .fetch_all(&self.pool)
            .await
            .map_err(storage)?;

        rows.iter().map(row_to_review).collect()
    }

    async fn insert(
        &self,
        review: &NewReview,
        author: &str,
        date: NaiveDate,
    ) -> Result<Review, RepositoryError> {
        let row = sqlx::query(
            "INSERT INTO reviews (restaurant, author, date, vote, comment) VALUES (?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(&review.restaurant)
        .bind(author)
        .bind(format_date(date))
        .bind(i64::from(review.vote.value()))
        .bind(review.normalized_comment())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| write_error(e, format!("review of {}", review.restaurant)))?;

        let id: i64 = row.try_get("id").map_err(storage)?;
        self.get(id).await
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM reviews WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(storage)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("Review with ID {id}")));
        }
        Ok(())
    }
}
