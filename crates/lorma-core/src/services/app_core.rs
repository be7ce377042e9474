//! `AppCore` - the primary application facade.
//!
//! This is the composition root for core services. Adapters (the CLI today)
//! receive an `AppCore` instance and use it to access all functionality.

use crate::ports::Repos;

use super::{
    AuthService, MenuService, OrderService, RestaurantService, ReviewService, SettingsService,
    StatsService,
};

/// The core application facade.
///
/// # Example
///
/// ```ignore
/// let core = AppCore::new(repos);
/// let user = core.auth().login("mario", "P@ssw0rd").await?;
/// let orders = core.orders().list_for(&user, None).await?;
/// ```
pub struct AppCore {
    auth: AuthService,
    restaurants: RestaurantService,
    menu: MenuService,
    orders: OrderService,
    reviews: ReviewService,
    stats: StatsService,
    settings: SettingsService,
}

impl AppCore {
    /// Wire every service to the given repositories.
    pub fn new(repos: Repos) -> Self {
        let auth = AuthService::new(repos.users.clone(), repos.settings.clone());
        Self {
            restaurants: RestaurantService::new(repos.restaurants.clone(), auth.clone()),
            menu: MenuService::new(
                repos.menu.clone(),
                repos.restaurants.clone(),
                repos.orders.clone(),
            ),
            orders: OrderService::new(
                repos.orders,
                repos.menu.clone(),
                repos.restaurants.clone(),
                repos.settings.clone(),
            ),
            reviews: ReviewService::new(repos.reviews, repos.restaurants.clone()),
            stats: StatsService::new(repos.users, repos.restaurants, repos.menu),
            settings: SettingsService::new(repos.settings),
            auth,
        }
    }

    pub const fn auth(&self) -> &AuthService {
        &self.auth
    }

    pub const fn restaurants(&self) -> &RestaurantService {
        &self.restaurants
    }

    pub const fn menu(&self) -> &MenuService {
        &self.menu
    }

    pub const fn orders(&self) -> &OrderService {
        &self.orders
    }

    pub const fn reviews(&self) -> &ReviewService {
        &self.reviews
    }

    /// Access the dashboard statistics.
    pub const fn stats(&self) -> &StatsService {
        &self.stats
    }

    pub const fn settings(&self) -> &SettingsService {
        &self.settings
    }
}
