//! Settings domain types and validation.
//!
//! Business settings that an admin can change at runtime. These are pure
//! domain types with no infrastructure dependencies.

use serde::{Deserialize, Serialize};

use crate::money::Money;

/// Flat delivery fee charged on every order, in cents.
pub const DEFAULT_SHIPPING_RATE_CENTS: i64 = 250;

/// Credit given to a newly registered client, in cents.
pub const DEFAULT_CLIENT_STARTING_CREDIT_CENTS: i64 = 2_000;

/// Highest quantity of a single item in one order.
pub const DEFAULT_MAX_QUANTITY_PER_ITEM: u32 = 99;

/// Application settings structure.
///
/// All fields are optional to support partial updates and graceful defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Delivery fee added to each order and paid to the deliveryman.
    pub shipping_rate: Option<Money>,

    /// Credit a client account starts with.
    pub client_starting_credit: Option<Money>,

    /// Upper bound for the quantity of one menu item per order (1-999).
    pub max_quantity_per_item: Option<u32>,
}

impl Settings {
    /// Create settings with sensible defaults.
    #[must_use]
    pub const fn with_defaults() -> Self {
        Self {
            shipping_rate: Some(Money::from_cents(DEFAULT_SHIPPING_RATE_CENTS)),
            client_starting_credit: Some(Money::from_cents(DEFAULT_CLIENT_STARTING_CREDIT_CENTS)),
            max_quantity_per_item: Some(DEFAULT_MAX_QUANTITY_PER_ITEM),
        }
    }

    #[must_use]
    pub const fn effective_shipping_rate(&self) -> Money {
        match self.shipping_rate {
            Some(rate) => rate,
            None => Money::from_cents(DEFAULT_SHIPPING_RATE_CENTS),
        }
    }

    #[must_use]
    pub const fn effective_client_starting_credit(&self) -> Money {
        match self.client_starting_credit {
            Some(credit) => credit,
            None => Money::from_cents(DEFAULT_CLIENT_STARTING_CREDIT_CENTS),
        }
    }

    #[must_use]
    pub const fn effective_max_quantity_per_item(&self) -> u32 {
        match self.max_quantity_per_item {
            Some(max) => max,
            None => DEFAULT_MAX_QUANTITY_PER_ITEM,
        }
    }

    /// Merge another settings into this one, only updating fields that are Some.
    pub fn merge(&mut self, other: &SettingsUpdate) {
        if let Some(rate) = other.shipping_rate {
            self.shipping_rate = rate;
        }
        if let Some(credit) = other.client_starting_credit {
            self.client_starting_credit = credit;
        }
        if let Some(max) = other.max_quantity_per_item {
            self.max_quantity_per_item = max;
        }
    }
}

/// Partial settings update.
///
/// Each field is `Option<Option<T>>`:
/// - `None` = don't change this field
/// - `Some(None)` = reset the field to its default
/// - `Some(Some(value))` = set field to value
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SettingsUpdate {
    pub shipping_rate: Option<Option<Money>>,
    pub client_starting_credit: Option<Option<Money>>,
    pub max_quantity_per_item: Option<Option<u32>>,
}

impl SettingsUpdate {
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.shipping_rate.is_none()
            && self.client_starting_credit.is_none()
            && self.max_quantity_per_item.is_none()
    }
}

/// Settings validation error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    #[error("Shipping rate cannot be negative, got {0}")]
    NegativeShippingRate(Money),

    #[error("Starting credit cannot be negative, got {0}")]
    NegativeStartingCredit(Money),

    #[error("Max quantity per item must be between 1 and 999, got {0}")]
    InvalidMaxQuantity(u32),
}

/// Validate settings values.
pub fn validate_settings(settings: &Settings) -> Result<(), SettingsError> {
    if let Some(rate) = settings.shipping_rate {
        if rate.is_negative() {
            return Err(SettingsError::NegativeShippingRate(rate));
        }
    }

    if let Some(credit) = settings.client_starting_credit {
        if credit.is_negative() {
            return Err(SettingsError::NegativeStartingCredit(credit));
        }
    }

    if let Some(max) = settings.max_quantity_per_item {
        if !(1..=999).contains(&max) {
            return Err(SettingsError::InvalidMaxQuantity(max));
        }
    }

    Ok(())
}
