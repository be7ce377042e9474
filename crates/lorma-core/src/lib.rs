//! Core of the RistoranteLorMa food delivery system.
//!
//! Holds the domain model (users, restaurants, menus, orders, reviews), the
//! money and password primitives, the repository ports and the services
//! that enforce every business rule. Storage lives in `lorma-db`; the
//! command-line front end lives in `lorma-cli`.

#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod money;
pub mod password;
pub mod paths;
pub mod ports;
pub mod services;
pub mod settings;

// Re-export commonly used types for convenience
pub use domain::{
    CreditMovement, Dashboard, DeliverymanDeliveries, Food, FoodPurchases, FoodType,
    FoodTypePurchases, FoodUpdate, MacroType, NewFood, NewOrder, NewRestaurant, NewReview, NewUser,
    Order, OrderFilter, OrderLine, OrderScope, OrderState, OrderTransition, PlacedOrder,
    Restaurant, RestaurantOrderCount, RestaurantRating, Review, Role, StateChange, User,
    UserProfile, ValidationError, Vote,
};
pub use money::{Money, MoneyError};
pub use password::{PasswordError, check_password, encode_password, new_encoded_password};
pub use ports::{
    CoreError, MenuRepository, OrderRepository, Repos, RepositoryError, RestaurantRepository,
    ReviewRepository, SettingsRepository, UserRepository,
};
pub use services::{
    AppCore, AuthService, MenuService, OrderService, RestaurantService, ReviewService,
    SettingsService, StatsService,
};
pub use settings::{
    DEFAULT_CLIENT_STARTING_CREDIT_CENTS, DEFAULT_MAX_QUANTITY_PER_ITEM,
    DEFAULT_SHIPPING_RATE_CENTS, Settings, SettingsError, SettingsUpdate, validate_settings,
};

// Re-export path utilities
pub use paths::{
    DATA_DIR_ENV_VAR, DATABASE_ENV_VAR, PathError, data_root, database_path, env_file_path,
    persist_env_value,
};
