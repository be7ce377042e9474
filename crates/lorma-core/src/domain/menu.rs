//! Food types and menu entries.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{ValidationError, require_text};
use crate::money::Money;

/// Broad classification of a food type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MacroType {
    Dish,
    Drink,
}

impl MacroType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Dish => "dish",
            Self::Drink => "drink",
        }
    }
}

impl fmt::Display for MacroType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MacroType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "dish" | "food" | "cibo" => Ok(Self::Dish),
            "drink" | "bevanda" => Ok(Self::Drink),
            _ => Err(ValidationError::unknown("macro type", s)),
        }
    }
}

/// A named category of food shared by all restaurants, e.g. "pizza".
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FoodType {
    pub name: String,
    pub macro_type: MacroType,
}

impl FoodType {
    /// Build a food type, normalising the name to trimmed lowercase.
    pub fn new(name: &str, macro_type: MacroType) -> Result<Self, ValidationError> {
        let name = require_text("food type", name)?;
        Ok(Self {
            name: name.to_lowercase(),
            macro_type,
        })
    }
}

/// An item on a restaurant's menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Food {
    pub id: i64,
    pub name: String,
    pub restaurant: String,
    pub price: Money,
    pub food_type: FoodType,
    /// `false` once removed from the menu; kept so past orders still resolve.
    pub available: bool,
}

/// Input for adding a menu item. The food type is referenced by name.
#[derive(Debug, Clone)]
pub struct NewFood {
    pub name: String,
    pub restaurant: String,
    pub price: Money,
    pub food_type: String,
}

impl NewFood {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require_text("food name", &self.name)?;
        require_text("food type", &self.food_type)?;
        validate_price(self.price)
    }
}

/// Partial update of a menu item; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default)]
pub struct FoodUpdate {
    pub name: Option<String>,
    pub price: Option<Money>,
    pub food_type: Option<String>,
}

impl FoodUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.food_type.is_none()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(name) = &self.name {
            require_text("food name", name)?;
        }
        if let Some(food_type) = &self.food_type {
            require_text("food type", food_type)?;
        }
        if let Some(price) = self.price {
            validate_price(price)?;
        }
        Ok(())
    }
}

fn validate_price(price: Money) -> Result<(), ValidationError> {
    if price.is_positive() {
        Ok(())
    } else {
        Err(ValidationError::invalid("price", "must be greater than zero"))
    }
}
