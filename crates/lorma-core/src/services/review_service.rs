//! Review service.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::{NewReview, Review, Role, User};
use crate::ports::{CoreError, RestaurantRepository, ReviewRepository};

/// Service for restaurant reviews.
pub struct ReviewService {
    reviews: Arc<dyn ReviewRepository>,
    restaurants: Arc<dyn RestaurantRepository>,
}

impl ReviewService {
    pub fn new(
        reviews: Arc<dyn ReviewRepository>,
        restaurants: Arc<dyn RestaurantRepository>,
    ) -> Self {
        Self {
            reviews,
            restaurants,
        }
    }

    /// Write a review as the signed-in client.
    pub async fn add(&self, actor: &User, review: NewReview) -> Result<Review, CoreError> {
        if !actor.is(Role::Client) {
            return Err(CoreError::denied("only clients can review restaurants"));
        }
        review.validate()?;
        self.restaurants.get(&review.restaurant).await?;

        let stored = self
            .reviews
            .insert(&review, &actor.username, Utc::now().date_naive())
            .await?;
        info!(review = stored.id, restaurant = %stored.restaurant, vote = stored.vote.value(), "Added review");
        Ok(stored)
    }

    /// Reviews of a restaurant, newest first.
    pub async fn list(&self, restaurant: &str) -> Result<Vec<Review>, CoreError> {
        self.restaurants.get(restaurant).await?;
        Ok(self.reviews.list_by_restaurant(restaurant).await?)
    }

    /// Delete a review. Authors can delete their own; admins any.
    pub async fn delete(&self, actor: &User, id: i64) -> Result<(), CoreError> {
        let review = self.reviews.get(id).await?;
        if review.author != actor.username && !actor.is(Role::Admin) {
            return Err(CoreError::denied("you can only delete your own reviews"));
        }
        self.reviews.delete(id).await?;
        info!(review = id, by = %actor.username, "Deleted review");
        Ok(())
    }
}
