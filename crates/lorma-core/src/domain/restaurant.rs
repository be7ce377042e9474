//! Restaurants and their opening hours.

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use super::{ValidationError, require_text};

/// A restaurant, identified by its business name and run by one owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Restaurant {
    pub name: String,
    /// Username of the owning restaurant account.
    pub owner: String,
    /// Italian VAT number (partita IVA), 11 digits.
    pub vat_id: String,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
}

impl Restaurant {
    /// Whether orders are accepted at `time`.
    ///
    /// A closing time at or before the opening time wraps past midnight, so
    /// equal times mean the restaurant never closes.
    #[must_use]
    pub fn is_open_at(&self, time: NaiveTime) -> bool {
        if self.opening_time < self.closing_time {
            self.opening_time <= time && time < self.closing_time
        } else {
            time >= self.opening_time || time < self.closing_time
        }
    }
}

/// Input for creating a restaurant.
#[derive(Debug, Clone)]
pub struct NewRestaurant {
    pub name: String,
    pub vat_id: String,
    pub opening_time: NaiveTime,
    pub closing_time: NaiveTime,
}

impl NewRestaurant {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let name = require_text("restaurant name", &self.name)?;
        if name.chars().count() > 64 {
            return Err(ValidationError::invalid(
                "restaurant name",
                "must be at most 64 characters",
            ));
        }
        validate_vat_id(&self.vat_id)
    }

    /// Attach the owner, producing the persisted shape.
    #[must_use]
    pub fn into_restaurant(self, owner: &str) -> Restaurant {
        Restaurant {
            name: self.name.trim().to_string(),
            owner: owner.to_string(),
            vat_id: self.vat_id.trim().to_string(),
            opening_time: self.opening_time,
            closing_time: self.closing_time,
        }
    }
}

fn validate_vat_id(vat_id: &str) -> Result<(), ValidationError> {
    let vat_id = vat_id.trim();
    if vat_id.len() == 11 && vat_id.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(ValidationError::invalid("VAT id", "must be exactly 11 digits"))
    }
}
