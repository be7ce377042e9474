//! In-memory repositories shared by the service tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveTime, Utc};

use crate::domain::{
    DeliverymanDeliveries, Food, FoodPurchases, FoodType, FoodTypePurchases, FoodUpdate, MacroType,
    NewFood, NewReview, Order, OrderFilter, OrderLine, OrderScope, OrderState, PlacedOrder,
    Restaurant, RestaurantOrderCount, RestaurantRating, Review, Role, StateChange, User,
    UserProfile,
};
use crate::money::Money;
use crate::password::encode_password;
use crate::ports::{
    MenuRepository, OrderRepository, Repos, RepositoryError, RestaurantRepository,
    ReviewRepository, SettingsRepository, UserRepository,
};
use crate::settings::Settings;

pub const PASSWORD: &str = "P@ssw0rd";

#[derive(Default)]
struct State {
    users: BTreeMap<String, User>,
    restaurants: BTreeMap<String, Restaurant>,
    food_types: BTreeMap<String, FoodType>,
    foods: BTreeMap<i64, Food>,
    orders: BTreeMap<i64, Order>,
    reviews: BTreeMap<i64, Review>,
    settings: Option<Settings>,
    next_id: i64,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn adjust(&mut self, username: &str, delta: Money) -> Result<Money, RepositoryError> {
        let user = self
            .users
            .get_mut(username)
            .ok_or_else(|| RepositoryError::NotFound(format!("user '{username}'")))?;
        let current = user
            .credit
            .ok_or_else(|| RepositoryError::Constraint(format!("'{username}' has no credit")))?;
        let next = current
            .checked_add(delta)
            .map_err(|e| RepositoryError::Constraint(e.to_string()))?;
        if next.is_negative() {
            return Err(RepositoryError::Constraint("insufficient credit".into()));
        }
        user.credit = Some(next);
        Ok(next)
    }
}

/// One shared store implementing every port, so that money moved by the
/// order repository is visible through the user repository.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn repos(self: &Arc<Self>) -> Repos {
        Repos::new(
            self.clone(),
            self.clone(),
            self.clone(),
            self.clone(),
            self.clone(),
            self.clone(),
        )
    }

    /// Seed a user directly, bypassing the services.
    pub fn seed_user(&self, username: &str, role: Role, credit: Option<Money>) -> User {
        let user = User {
            username: username.to_string(),
            password_hash: encode_password(PASSWORD, b"012345678901234567"),
            profile: sample_profile(),
            role,
            credit,
        };
        self.lock().users.insert(username.to_string(), user.clone());
        user
    }

    /// Seed a restaurant open around the clock, owned by a new restaurant user.
    pub fn seed_restaurant(&self, name: &str, owner: &str) -> (User, Restaurant) {
        let user = self.seed_user(owner, Role::Restaurant, Some(Money::ZERO));
        let midnight = NaiveTime::MIN;
        let restaurant = Restaurant {
            name: name.to_string(),
            owner: owner.to_string(),
            vat_id: "01234567890".into(),
            opening_time: midnight,
            closing_time: midnight,
        };
        self.lock()
            .restaurants
            .insert(name.to_string(), restaurant.clone());
        (user, restaurant)
    }

    pub fn seed_food(&self, restaurant: &str, name: &str, cents: i64) -> Food {
        let mut state = self.lock();
        let food_type = state
            .food_types
            .entry("pizza".into())
            .or_insert_with(|| FoodType::new("pizza", MacroType::Dish).unwrap())
            .clone();
        let food = Food {
            id: state.next_id(),
            name: name.to_string(),
            restaurant: restaurant.to_string(),
            price: Money::from_cents(cents),
            food_type,
            available: true,
        };
        state.foods.insert(food.id, food.clone());
        food
    }

    pub fn credit_of(&self, username: &str) -> Option<Money> {
        self.lock().users.get(username).and_then(|u| u.credit)
    }
}

pub fn sample_profile() -> UserProfile {
    UserProfile {
        name: "Mario".into(),
        surname: "Rossi".into(),
        phone: "+39 333 1234567".into(),
        email: "mario@example.it".into(),
        city: "Cesena".into(),
        street: "Via Roma".into(),
        house_number: "12".into(),
    }
}

fn not_found(what: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::NotFound(what.to_string())
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn get(&self, username: &str) -> Result<User, RepositoryError> {
        self.lock()
            .users
            .get(username)
            .cloned()
            .ok_or_else(|| not_found(username))
    }

    async fn list(&self, role: Option<Role>) -> Result<Vec<User>, RepositoryError> {
        Ok(self
            .lock()
            .users
            .values()
            .filter(|u| role.is_none_or(|r| u.role == r))
            .cloned()
            .collect())
    }

    async fn count_by_role(&self, role: Role) -> Result<u64, RepositoryError> {
        Ok(self.lock().users.values().filter(|u| u.role == role).count() as u64)
    }

    async fn insert(&self, user: &User) -> Result<(), RepositoryError> {
        let mut state = self.lock();
        if state.users.contains_key(&user.username) {
            return Err(RepositoryError::AlreadyExists(user.username.clone()));
        }
        state.users.insert(user.username.clone(), user.clone());
        Ok(())
    }

    async fn delete(&self, username: &str) -> Result<(), RepositoryError> {
        self.lock()
            .users
            .remove(username)
            .map(|_| ())
            .ok_or_else(|| not_found(username))
    }

    async fn update_password(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let mut state = self.lock();
        let user = state.users.get_mut(username).ok_or_else(|| not_found(username))?;
        user.password_hash = password_hash.to_string();
        Ok(())
    }

    async fn adjust_credit(&self, username: &str, delta: Money) -> Result<Money, RepositoryError> {
        self.lock().adjust(username, delta)
    }

    async fn top_deliveryman(&self) -> Result<Option<DeliverymanDeliveries>, RepositoryError> {
        let state = self.lock();
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for order in state.orders.values() {
            if let (OrderState::Delivered, Some(d)) = (order.state, &order.deliveryman) {
                *counts.entry(d.clone()).or_default() += 1;
            }
        }
        Ok(counts
            .into_iter()
            .max_by_key(|(_, n)| *n)
            .map(|(username, deliveries)| DeliverymanDeliveries {
                username,
                deliveries,
            }))
    }
}

#[async_trait]
impl RestaurantRepository for MemoryStore {
    async fn get(&self, name: &str) -> Result<Restaurant, RepositoryError> {
        self.lock()
            .restaurants
            .get(name)
            .cloned()
            .ok_or_else(|| not_found(name))
    }

    async fn get_by_owner(&self, username: &str) -> Result<Restaurant, RepositoryError> {
        self.lock()
            .restaurants
            .values()
            .find(|r| r.owner == username)
            .cloned()
            .ok_or_else(|| not_found(username))
    }

    async fn list(&self) -> Result<Vec<Restaurant>, RepositoryError> {
        Ok(self.lock().restaurants.values().cloned().collect())
    }

    async fn insert(&self, restaurant: &Restaurant) -> Result<(), RepositoryError> {
        let mut state = self.lock();
        if state.restaurants.contains_key(&restaurant.name)
            || state.restaurants.values().any(|r| r.owner == restaurant.owner)
        {
            return Err(RepositoryError::AlreadyExists(restaurant.name.clone()));
        }
        state
            .restaurants
            .insert(restaurant.name.clone(), restaurant.clone());
        Ok(())
    }

    async fn update_hours(
        &self,
        name: &str,
        opening_time: NaiveTime,
        closing_time: NaiveTime,
    ) -> Result<(), RepositoryError> {
        let mut state = self.lock();
        let restaurant = state.restaurants.get_mut(name).ok_or_else(|| not_found(name))?;
        restaurant.opening_time = opening_time;
        restaurant.closing_time = closing_time;
        Ok(())
    }

    async fn most_ordered(&self) -> Result<Option<RestaurantOrderCount>, RepositoryError> {
        let state = self.lock();
        let mut counts: BTreeMap<String, u64> = BTreeMap::new();
        for order in state.orders.values() {
            if order.state != OrderState::Cancelled {
                *counts.entry(order.restaurant.clone()).or_default() += 1;
            }
        }
        Ok(counts
            .into_iter()
            .max_by_key(|(_, n)| *n)
            .map(|(restaurant, orders)| RestaurantOrderCount { restaurant, orders }))
    }

    async fn lowest_rated(&self) -> Result<Option<RestaurantRating>, RepositoryError> {
        let state = self.lock();
        let mut sums: BTreeMap<String, (u64, u64)> = BTreeMap::new();
        for review in state.reviews.values() {
            let entry = sums.entry(review.restaurant.clone()).or_default();
            entry.0 += u64::from(review.vote.value());
            entry.1 += 1;
        }
        #[allow(clippy::cast_precision_loss)]
        let ratings = sums.into_iter().map(|(restaurant, (sum, n))| RestaurantRating {
            restaurant,
            average_vote: sum as f64 / n as f64,
            reviews: n,
        });
        Ok(ratings.min_by(|a, b| a.average_vote.total_cmp(&b.average_vote)))
    }
}

#[async_trait]
impl MenuRepository for MemoryStore {
    async fn get_food_type(&self, name: &str) -> Result<FoodType, RepositoryError> {
        self.lock()
            .food_types
            .get(name)
            .cloned()
            .ok_or_else(|| not_found(name))
    }

    async fn list_food_types(&self) -> Result<Vec<FoodType>, RepositoryError> {
        Ok(self.lock().food_types.values().cloned().collect())
    }

    async fn insert_food_type(&self, food_type: &FoodType) -> Result<(), RepositoryError> {
        let mut state = self.lock();
        if state.food_types.contains_key(&food_type.name) {
            return Err(RepositoryError::AlreadyExists(food_type.name.clone()));
        }
        state
            .food_types
            .insert(food_type.name.clone(), food_type.clone());
        Ok(())
    }

    async fn get_food(&self, id: i64) -> Result<Food, RepositoryError> {
        self.lock()
            .foods
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn find_food(&self, restaurant: &str, name: &str) -> Result<Food, RepositoryError> {
        self.lock()
            .foods
            .values()
            .find(|f| f.available && f.restaurant == restaurant && f.name == name)
            .cloned()
            .ok_or_else(|| not_found(name))
    }

    async fn list_foods(&self, restaurant: &str) -> Result<Vec<Food>, RepositoryError> {
        Ok(self
            .lock()
            .foods
            .values()
            .filter(|f| f.available && f.restaurant == restaurant)
            .cloned()
            .collect())
    }

    async fn insert_food(&self, food: &NewFood) -> Result<Food, RepositoryError> {
        let mut state = self.lock();
        let food_type = state
            .food_types
            .get(&food.food_type)
            .cloned()
            .ok_or_else(|| not_found(&food.food_type))?;
        if state
            .foods
            .values()
            .any(|f| f.available && f.restaurant == food.restaurant && f.name == food.name)
        {
            return Err(RepositoryError::AlreadyExists(food.name.clone()));
        }
        let stored = Food {
            id: state.next_id(),
            name: food.name.clone(),
            restaurant: food.restaurant.clone(),
            price: food.price,
            food_type,
            available: true,
        };
        state.foods.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn update_food(&self, id: i64, update: &FoodUpdate) -> Result<Food, RepositoryError> {
        let mut state = self.lock();
        let food_type = match &update.food_type {
            Some(name) => Some(
                state
                    .food_types
                    .get(name)
                    .cloned()
                    .ok_or_else(|| not_found(name))?,
            ),
            None => None,
        };
        let food = state.foods.get_mut(&id).ok_or_else(|| not_found(id))?;
        if let Some(name) = &update.name {
            food.name.clone_from(name);
        }
        if let Some(price) = update.price {
            food.price = price;
        }
        if let Some(food_type) = food_type {
            food.food_type = food_type;
        }
        Ok(food.clone())
    }

    async fn delete_food(&self, id: i64) -> Result<(), RepositoryError> {
        let mut state = self.lock();
        let food = state
            .foods
            .get_mut(&id)
            .filter(|f| f.available)
            .ok_or_else(|| not_found(id))?;
        food.available = false;
        Ok(())
    }

    async fn most_purchased_food(&self) -> Result<Option<FoodPurchases>, RepositoryError> {
        let state = self.lock();
        let mut totals: BTreeMap<i64, (Food, u64)> = BTreeMap::new();
        for line in live_lines(&state) {
            let entry = totals
                .entry(line.food.id)
                .or_insert_with(|| (line.food.clone(), 0));
            entry.1 += u64::from(line.quantity);
        }
        Ok(totals
            .into_values()
            .max_by_key(|(_, q)| *q)
            .map(|(food, quantity)| FoodPurchases { food, quantity }))
    }

    async fn most_purchased_food_type(
        &self,
    ) -> Result<Option<FoodTypePurchases>, RepositoryError> {
        let state = self.lock();
        let mut totals: BTreeMap<String, (FoodType, u64)> = BTreeMap::new();
        for line in live_lines(&state) {
            let ft = &line.food.food_type;
            let entry = totals
                .entry(ft.name.clone())
                .or_insert_with(|| (ft.clone(), 0));
            entry.1 += u64::from(line.quantity);
        }
        Ok(totals
            .into_values()
            .max_by_key(|(_, q)| *q)
            .map(|(food_type, quantity)| FoodTypePurchases {
                food_type,
                quantity,
            }))
    }
}

fn live_lines(state: &State) -> impl Iterator<Item = &OrderLine> {
    state
        .orders
        .values()
        .filter(|o| o.state != OrderState::Cancelled)
        .flat_map(|o| o.lines.iter())
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn get(&self, id: i64) -> Result<Order, RepositoryError> {
        self.lock()
            .orders
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, RepositoryError> {
        let state = self.lock();
        let mut orders: Vec<Order> = state
            .orders
            .values()
            .filter(|o| match &filter.scope {
                OrderScope::All => true,
                OrderScope::Client(c) => &o.client == c,
                OrderScope::Restaurant(r) => &o.restaurant == r,
                OrderScope::Deliveryman(d) => {
                    o.state == OrderState::Ready || o.deliveryman.as_ref() == Some(d)
                }
            })
            .filter(|o| filter.state.is_none_or(|s| o.state == s))
            .cloned()
            .collect();
        orders.reverse();
        Ok(orders)
    }

    async fn place(&self, order: &PlacedOrder) -> Result<Order, RepositoryError> {
        let mut state = self.lock();
        let mut lines = Vec::with_capacity(order.lines.len());
        for (food_id, quantity) in &order.lines {
            let food = state
                .foods
                .get(food_id)
                .cloned()
                .ok_or_else(|| not_found(food_id))?;
            lines.push(OrderLine {
                food,
                quantity: *quantity,
            });
        }
        let stored = Order {
            id: state.next_id(),
            restaurant: order.restaurant.clone(),
            client: order.client.clone(),
            created_at: order.created_at,
            shipping_rate: order.shipping_rate,
            lines,
            state: OrderState::Waiting,
            deliveryman: None,
            accepted_at: None,
            delivered_at: None,
            cancelled_at: None,
        };
        let debit = stored
            .total()
            .and_then(Money::checked_neg)
            .map_err(|e| RepositoryError::Constraint(e.to_string()))?;
        state.adjust(&order.client, debit)?;
        state.orders.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn apply_transition(
        &self,
        id: i64,
        change: &StateChange,
    ) -> Result<Order, RepositoryError> {
        let mut state = self.lock();
        let mut order = state.orders.get(&id).cloned().ok_or_else(|| not_found(id))?;
        if order.state != change.from {
            return Err(RepositoryError::Constraint(format!(
                "order {id} is {}, expected {}",
                order.state, change.from
            )));
        }
        order
            .apply(&change.transition, change.at)
            .map_err(|e| RepositoryError::Constraint(e.to_string()))?;
        for movement in &change.movements {
            state.adjust(&movement.username, movement.delta)?;
        }
        state.orders.insert(id, order.clone());
        Ok(order)
    }

    async fn food_in_open_orders(&self, food_id: i64) -> Result<bool, RepositoryError> {
        Ok(self
            .lock()
            .orders
            .values()
            .filter(|o| !o.state.is_terminal())
            .any(|o| o.lines.iter().any(|l| l.food.id == food_id)))
    }
}

#[async_trait]
impl ReviewRepository for MemoryStore {
    async fn get(&self, id: i64) -> Result<Review, RepositoryError> {
        self.lock()
            .reviews
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found(id))
    }

    async fn list_by_restaurant(&self, restaurant: &str) -> Result<Vec<Review>, RepositoryError> {
        Ok(self
            .lock()
            .reviews
            .values()
            .rev()
            .filter(|r| r.restaurant == restaurant)
            .cloned()
            .collect())
    }

    async fn insert(
        &self,
        review: &NewReview,
        author: &str,
        date: NaiveDate,
    ) -> Result<Review, RepositoryError> {
        let mut state = self.lock();
        let stored = Review {
            id: state.next_id(),
            restaurant: review.restaurant.clone(),
            author: author.to_string(),
            date,
            vote: review.vote,
            comment: review.normalized_comment(),
        };
        state.reviews.insert(stored.id, stored.clone());
        Ok(stored)
    }

    async fn delete(&self, id: i64) -> Result<(), RepositoryError> {
        self.lock()
            .reviews
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found(id))
    }
}

#[async_trait]
impl SettingsRepository for MemoryStore {
    async fn load(&self) -> Result<Settings, RepositoryError> {
        Ok(self
            .lock()
            .settings
            .clone()
            .unwrap_or_else(Settings::with_defaults))
    }

    async fn save(&self, settings: &Settings) -> Result<(), RepositoryError> {
        self.lock().settings = Some(settings.clone());
        Ok(())
    }
}
