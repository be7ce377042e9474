//! Repository implementations for `SQLite`.
//!
//! Each repository implements a port trait from `lorma-core` and owns a clone
//! of the shared connection pool.

mod row_mappers;
mod sqlite_menu_repository;
mod sqlite_order_repository;
mod sqlite_restaurant_repository;
mod sqlite_review_repository;
mod sqlite_settings_repository;
mod sqlite_user_repository;

pub use sqlite_menu_repository::SqliteMenuRepository;
pub use sqlite_order_repository::SqliteOrderRepository;
pub use sqlite_restaurant_repository::SqliteRestaurantRepository;
pub use sqlite_review_repository::SqliteReviewRepository;
pub use sqlite_settings_repository::SqliteSettingsRepository;
pub use sqlite_user_repository::SqliteUserRepository;
