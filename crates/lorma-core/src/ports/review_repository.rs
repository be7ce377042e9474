//! Review repository trait definition.

use async_trait::async_trait;
use chrono::NaiveDate;

use super::RepositoryError;
use crate::domain::{NewReview, Review};

#[async_trait]
pub trait ReviewRepository: Send + Sync {
    async fn get(&self, id: i64) -> Result<Review, RepositoryError>;

    /// Reviews of one restaurant, newest first.
    async fn list_by_restaurant(&self, restaurant: &str) -> Result<Vec<Review>, RepositoryError>;

    /// Insert a review written by `author` on `date`.
    async fn insert(
        &self,
        review: &NewReview,
        author: &str,
        date: NaiveDate,
    ) -> Result<Review, RepositoryError>;

    async fn delete(&self, id: i64) -> Result<(), RepositoryError>;
}
