//! Restaurant service - registration and opening hours.

use std::sync::Arc;

use chrono::NaiveTime;
use tracing::{info, warn};

use super::AuthService;
use crate::domain::{NewRestaurant, NewUser, Restaurant, Role, User};
use crate::ports::{CoreError, RepositoryError, RestaurantRepository};

/// Service for restaurants.
pub struct RestaurantService {
    restaurants: Arc<dyn RestaurantRepository>,
    auth: AuthService,
}

impl RestaurantService {
    pub fn new(restaurants: Arc<dyn RestaurantRepository>, auth: AuthService) -> Self {
        Self { restaurants, auth }
    }

    /// Register a restaurant owner account together with its restaurant.
    ///
    /// If the restaurant cannot be stored the freshly created account is
    /// removed again.
    pub async fn register_owner(
        &self,
        owner: NewUser,
        restaurant: NewRestaurant,
    ) -> Result<(User, Restaurant), CoreError> {
        if owner.role != Role::Restaurant {
            return Err(CoreError::Validation(
                "Restaurant owners must have the restaurant role".into(),
            ));
        }
        restaurant.validate()?;
        if self.get(restaurant.name.trim()).await?.is_some() {
            return Err(CoreError::Validation(format!(
                "Restaurant '{}' already exists",
                restaurant.name.trim()
            )));
        }

        let user = self.auth.register(None, owner).await?;
        match self.store(restaurant.into_restaurant(&user.username)).await {
            Ok(restaurant) => Ok((user, restaurant)),
            Err(e) => {
                warn!(username = %user.username, error = %e, "Restaurant registration failed, removing owner account");
                self.auth.discard(&user.username).await;
                Err(e)
            }
        }
    }

    /// Register a restaurant for an existing restaurant account.
    pub async fn register(
        &self,
        actor: &User,
        restaurant: NewRestaurant,
    ) -> Result<Restaurant, CoreError> {
        if !actor.is(Role::Restaurant) {
            return Err(CoreError::denied("only restaurant accounts can open a restaurant"));
        }
        restaurant.validate()?;
        self.store(restaurant.into_restaurant(&actor.username)).await
    }

    async fn store(&self, restaurant: Restaurant) -> Result<Restaurant, CoreError> {
        self.restaurants
            .insert(&restaurant)
            .await
            .map_err(|e| match e {
                RepositoryError::AlreadyExists(_) => CoreError::Validation(format!(
                    "Restaurant '{}' already exists or '{}' already runs one",
                    restaurant.name, restaurant.owner
                )),
                other => other.into(),
            })?;
        info!(restaurant = %restaurant.name, owner = %restaurant.owner, "Registered restaurant");
        Ok(restaurant)
    }

    /// List all restaurants.
    pub async fn list(&self) -> Result<Vec<Restaurant>, CoreError> {
        Ok(self.restaurants.list().await?)
    }

    /// Get a restaurant by name, returning `None` if it does not exist.
    pub async fn get(&self, name: &str) -> Result<Option<Restaurant>, CoreError> {
        match self.restaurants.get(name).await {
            Ok(r) => Ok(Some(r)),
            Err(RepositoryError::NotFound(_)) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// The restaurant run by `actor`.
    pub async fn owned_by(&self, actor: &User) -> Result<Restaurant, CoreError> {
        if !actor.is(Role::Restaurant) {
            return Err(CoreError::denied("only restaurant accounts own a restaurant"));
        }
        self.restaurants
            .get_by_owner(&actor.username)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound(_) => CoreError::Validation(format!(
                    "'{}' has not registered a restaurant yet",
                    actor.username
                )),
                other => other.into(),
            })
    }

    /// Change the opening hours of the actor's restaurant.
    pub async fn update_hours(
        &self,
        actor: &User,
        opening_time: NaiveTime,
        closing_time: NaiveTime,
    ) -> Result<Restaurant, CoreError> {
        let mut restaurant = self.owned_by(actor).await?;
        self.restaurants
            .update_hours(&restaurant.name, opening_time, closing_time)
            .await?;
        restaurant.opening_time = opening_time;
        restaurant.closing_time = closing_time;
        info!(restaurant = %restaurant.name, %opening_time, %closing_time, "Updated opening hours");
        Ok(restaurant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use crate::services::test_support::{MemoryStore, PASSWORD, sample_profile};

    fn service(store: &Arc<MemoryStore>) -> RestaurantService {
        let repos = store.repos();
        RestaurantService::new(
            repos.restaurants,
            AuthService::new(repos.users, repos.settings),
        )
    }

    fn owner(username: &str) -> NewUser {
        NewUser {
            username: username.into(),
            password: PASSWORD.into(),
            profile: sample_profile(),
            role: Role::Restaurant,
        }
    }

    fn at(h: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, 0, 0).unwrap()
    }

    fn new_restaurant(name: &str) -> NewRestaurant {
        NewRestaurant {
            name: name.into(),
            vat_id: "01234567890".into(),
            opening_time: at(11),
            closing_time: at(23),
        }
    }

    #[tokio::test]
    async fn test_register_owner_creates_both() {
        let store = MemoryStore::new();
        let service = service(&store);

        let (user, restaurant) = service
            .register_owner(owner("lorenzo"), new_restaurant("Da Lorenzo"))
            .await
            .unwrap();
        assert_eq!(user.credit, Some(Money::ZERO));
        assert_eq!(restaurant.owner, "lorenzo");
        assert_eq!(service.owned_by(&user).await.unwrap().name, "Da Lorenzo");
    }

    #[tokio::test]
    async fn test_register_owner_rejects_taken_name_without_creating_user() {
        let store = MemoryStore::new();
        let service = service(&store);
        service
            .register_owner(owner("lorenzo"), new_restaurant("Da Lorenzo"))
            .await
            .unwrap();

        let err = service
            .register_owner(owner("copycat"), new_restaurant("Da Lorenzo"))
            .await;
        assert!(matches!(err, Err(CoreError::Validation(_))));
        assert_eq!(store.credit_of("copycat"), None);
    }

    #[tokio::test]
    async fn test_register_owner_requires_restaurant_role() {
        let store = MemoryStore::new();
        let mut client = owner("mario");
        client.role = Role::Client;
        let err = service(&store)
            .register_owner(client, new_restaurant("Da Mario"))
            .await;
        assert!(matches!(err, Err(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_one_restaurant_per_owner() {
        let store = MemoryStore::new();
        let service = service(&store);
        let (user, _) = store.seed_restaurant("Da Lorenzo", "lorenzo");

        let err = service.register(&user, new_restaurant("Lorenzo Bis")).await;
        assert!(matches!(err, Err(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_hours_only_for_owner() {
        let store = MemoryStore::new();
        let service = service(&store);
        let (owner, _) = store.seed_restaurant("Da Lorenzo", "lorenzo");
        let client = store.seed_user("mario", Role::Client, Some(Money::ZERO));

        let updated = service.update_hours(&owner, at(18), at(2)).await.unwrap();
        assert_eq!(updated.opening_time, at(18));
        assert!(updated.is_open_at(at(1)));
        assert_eq!(
            service.get("Da Lorenzo").await.unwrap().unwrap().closing_time,
            at(2)
        );

        assert!(matches!(
            service.update_hours(&client, at(9), at(17)).await,
            Err(CoreError::PermissionDenied(_))
        ));
    }
}
