//! Statistics for the admin dashboard.

use std::sync::Arc;

use crate::domain::{Dashboard, Role, User};
use crate::ports::{CoreError, MenuRepository, RestaurantRepository, UserRepository};

/// Service computing dashboard aggregates.
pub struct StatsService {
    users: Arc<dyn UserRepository>,
    restaurants: Arc<dyn RestaurantRepository>,
    menu: Arc<dyn MenuRepository>,
}

impl StatsService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        restaurants: Arc<dyn RestaurantRepository>,
        menu: Arc<dyn MenuRepository>,
    ) -> Self {
        Self {
            users,
            restaurants,
            menu,
        }
    }

    /// Build the dashboard (admin only).
    pub async fn dashboard(&self, actor: &User) -> Result<Dashboard, CoreError> {
        if !actor.is(Role::Admin) {
            return Err(CoreError::denied("only admins can see statistics"));
        }
        Ok(Dashboard {
            most_ordered_restaurant: self.restaurants.most_ordered().await?,
            worst_rated_restaurant: self.restaurants.lowest_rated().await?,
            top_deliveryman: self.users.top_deliveryman().await?,
            most_purchased_food: self.menu.most_purchased_food().await?,
            most_purchased_food_type: self.menu.most_purchased_food_type().await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NewOrder, NewReview, Vote};
    use crate::money::Money;
    use crate::services::test_support::MemoryStore;
    use crate::services::{OrderService, ReviewService};

    #[tokio::test]
    async fn test_empty_dashboard() {
        let store = MemoryStore::new();
        let repos = store.repos();
        let stats = StatsService::new(repos.users, repos.restaurants, repos.menu);
        let admin = store.seed_user("boss", Role::Admin, None);

        assert_eq!(stats.dashboard(&admin).await.unwrap(), Dashboard::default());
    }

    #[tokio::test]
    async fn test_dashboard_requires_admin() {
        let store = MemoryStore::new();
        let repos = store.repos();
        let stats = StatsService::new(repos.users, repos.restaurants, repos.menu);
        let client = store.seed_user("mario", Role::Client, Some(Money::ZERO));

        assert!(matches!(
            stats.dashboard(&client).await,
            Err(CoreError::PermissionDenied(_))
        ));
    }

    #[tokio::test]
    async fn test_dashboard_aggregates() {
        let store = MemoryStore::new();
        let repos = store.repos();
        let stats = StatsService::new(
            repos.users.clone(),
            repos.restaurants.clone(),
            repos.menu.clone(),
        );
        let orders = OrderService::new(
            repos.orders.clone(),
            repos.menu.clone(),
            repos.restaurants.clone(),
            repos.settings.clone(),
        );
        let reviews = ReviewService::new(repos.reviews.clone(), repos.restaurants.clone());

        let admin = store.seed_user("boss", Role::Admin, None);
        let client = store.seed_user("mario", Role::Client, Some(Money::from_euros(100)));
        let rider = store.seed_user("luigi", Role::Deliveryman, Some(Money::ZERO));
        let (owner, _) = store.seed_restaurant("Da Lorenzo", "lorenzo");
        store.seed_restaurant("Da Gino", "gino");
        let pizza = store.seed_food("Da Lorenzo", "Margherita", 650);
        let pasta = store.seed_food("Da Gino", "Carbonara", 900);

        let delivered = orders
            .place(
                &client,
                NewOrder {
                    restaurant: "Da Lorenzo".into(),
                    lines: vec![(pizza.id, 3)],
                },
            )
            .await
            .unwrap();
        orders.mark_ready(&owner, delivered.id).await.unwrap();
        orders.accept(&rider, delivered.id).await.unwrap();
        orders.deliver(&rider, delivered.id).await.unwrap();

        let client = repos.users.get("mario").await.unwrap();
        let cancelled = orders
            .place(
                &client,
                NewOrder {
                    restaurant: "Da Gino".into(),
                    lines: vec![(pasta.id, 5)],
                },
            )
            .await
            .unwrap();
        orders.cancel(&client, cancelled.id).await.unwrap();

        for (restaurant, vote) in [("Da Lorenzo", Vote::Five), ("Da Gino", Vote::Two)] {
            reviews
                .add(
                    &client,
                    NewReview {
                        restaurant: restaurant.into(),
                        vote,
                        comment: None,
                    },
                )
                .await
                .unwrap();
        }

        let dashboard = stats.dashboard(&admin).await.unwrap();
        let most_ordered = dashboard.most_ordered_restaurant.unwrap();
        assert_eq!(most_ordered.restaurant, "Da Lorenzo");
        assert_eq!(most_ordered.orders, 1);

        let worst = dashboard.worst_rated_restaurant.unwrap();
        assert_eq!(worst.restaurant, "Da Gino");
        assert!((worst.average_vote - 2.0).abs() < f64::EPSILON);

        assert_eq!(dashboard.top_deliveryman.unwrap().username, "luigi");

        let food = dashboard.most_purchased_food.unwrap();
        assert_eq!(food.food.name, "Margherita");
        assert_eq!(food.quantity, 3);
        assert_eq!(dashboard.most_purchased_food_type.unwrap().quantity, 3);
    }
}
