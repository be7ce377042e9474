//! Aggregates for the admin dashboard.

use serde::{Deserialize, Serialize};

use super::menu::{Food, FoodType};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantOrderCount {
    pub restaurant: String,
    pub orders: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RestaurantRating {
    pub restaurant: String,
    pub average_vote: f64,
    pub reviews: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliverymanDeliveries {
    pub username: String,
    pub deliveries: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodPurchases {
    pub food: Food,
    pub quantity: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FoodTypePurchases {
    pub food_type: FoodType,
    pub quantity: u64,
}

/// Everything shown on the admin dashboard. Each entry is `None` when there
/// is no data yet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Dashboard {
    pub most_ordered_restaurant: Option<RestaurantOrderCount>,
    pub worst_rated_restaurant: Option<RestaurantRating>,
    pub top_deliveryman: Option<DeliverymanDeliveries>,
    pub most_purchased_food: Option<FoodPurchases>,
    pub most_purchased_food_type: Option<FoodTypePurchases>,
}
