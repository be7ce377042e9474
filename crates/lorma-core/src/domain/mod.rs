//! Core domain types.
//!
//! These types represent the pure domain model, independent of any
//! infrastructure concerns (database, terminal, etc.).
//!
//! # Structure
//!
//! - `user` - Accounts and roles (`User`, `NewUser`, `Role`)
//! - `restaurant` - Restaurants and opening hours
//! - `menu` - Food types and menu entries
//! - `order` - Orders and their delivery lifecycle
//! - `review` - Restaurant reviews and votes
//! - `stats` - Aggregates shown on the admin dashboard

mod menu;
mod order;
mod restaurant;
mod review;
mod stats;
mod user;

use thiserror::Error;

pub use menu::{Food, FoodType, FoodUpdate, MacroType, NewFood};
pub use order::{
    CreditMovement, NewOrder, Order, OrderFilter, OrderLine, OrderScope, OrderState,
    OrderTransition, PlacedOrder, StateChange,
};
pub use restaurant::{NewRestaurant, Restaurant};
pub use review::{NewReview, Review, Vote};
pub use stats::{
    Dashboard, DeliverymanDeliveries, FoodPurchases, FoodTypePurchases, RestaurantOrderCount,
    RestaurantRating,
};
pub use user::{NewUser, Role, User, UserProfile};

/// A domain value failed validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required text field was blank.
    #[error("{0} cannot be empty")]
    Empty(&'static str),

    /// A field was present but malformed.
    #[error("Invalid {field}: {reason}")]
    Invalid { field: &'static str, reason: String },

    /// An enumerated value was not recognised.
    #[error("Unknown {kind} '{value}'")]
    Unknown { kind: &'static str, value: String },
}

impl ValidationError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn unknown(kind: &'static str, value: &str) -> Self {
        Self::Unknown {
            kind,
            value: value.to_string(),
        }
    }
}

/// Reject blank text and return it trimmed.
pub(crate) fn require_text<'a>(
    field: &'static str,
    value: &'a str,
) -> Result<&'a str, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ValidationError::Empty(field))
    } else {
        Ok(trimmed)
    }
}
