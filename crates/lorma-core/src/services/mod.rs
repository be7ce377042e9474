//! Core services - the application's business logic layer.
//!
//! Services check who is asking, validate input and orchestrate the ports.
//! They never know which storage backend sits behind the ports.

mod app_core;
mod auth_service;
mod menu_service;
mod order_service;
mod restaurant_service;
mod review_service;
mod settings_service;
mod stats_service;

#[cfg(test)]
mod test_support;

pub use app_core::AppCore;
pub use auth_service::AuthService;
pub use menu_service::MenuService;
pub use order_service::OrderService;
pub use restaurant_service::RestaurantService;
pub use review_service::ReviewService;
pub use settings_service::SettingsService;
pub use stats_service::StatsService;
