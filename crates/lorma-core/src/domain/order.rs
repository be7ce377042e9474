//! Orders and their delivery lifecycle.
//!
//! An order is created `Waiting`, marked `Ready` by the restaurant, picked up
//! (`Accepted`) by a deliveryman and finally `Delivered`. Any order that has
//! not been delivered can be `Cancelled`.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ValidationError;
use super::menu::Food;
use crate::money::{Money, MoneyError};

// ─────────────────────────────────────────────────────────────────────────────
// State machine
// ─────────────────────────────────────────────────────────────────────────────

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderState {
    Waiting,
    Ready,
    Accepted,
    Delivered,
    Cancelled,
}

impl OrderState {
    pub const ALL: [Self; 5] = [
        Self::Waiting,
        Self::Ready,
        Self::Accepted,
        Self::Delivered,
        Self::Cancelled,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Waiting => "waiting",
            Self::Ready => "ready",
            Self::Accepted => "accepted",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }

    /// Delivered and cancelled orders never change again.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Cancelled)
    }

    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Waiting, Self::Ready)
                | (Self::Ready, Self::Accepted)
                | (Self::Accepted, Self::Delivered)
                | (Self::Waiting | Self::Ready | Self::Accepted, Self::Cancelled)
        )
    }
}

impl fmt::Display for OrderState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderState {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "waiting" | "attesa" => Ok(Self::Waiting),
            "ready" | "pronto" => Ok(Self::Ready),
            "accepted" | "accettato" => Ok(Self::Accepted),
            "delivered" | "consegnato" => Ok(Self::Delivered),
            "cancelled" | "canceled" | "annullato" => Ok(Self::Cancelled),
            _ => Err(ValidationError::unknown("order state", s)),
        }
    }
}

/// A requested move through the lifecycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderTransition {
    MarkReady,
    Accept { deliveryman: String },
    Deliver,
    Cancel,
}

impl OrderTransition {
    #[must_use]
    pub const fn target_state(&self) -> OrderState {
        match self {
            Self::MarkReady => OrderState::Ready,
            Self::Accept { .. } => OrderState::Accepted,
            Self::Deliver => OrderState::Delivered,
            Self::Cancel => OrderState::Cancelled,
        }
    }
}

/// A signed change to one account's credit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreditMovement {
    pub username: String,
    pub delta: Money,
}

impl CreditMovement {
    pub fn new(username: impl Into<String>, delta: Money) -> Self {
        Self {
            username: username.into(),
            delta,
        }
    }
}

/// Everything a repository needs to persist a transition atomically.
///
/// `from` is the state the caller observed; the change only applies if the
/// order is still in that state.
#[derive(Debug, Clone)]
pub struct StateChange {
    pub from: OrderState,
    pub transition: OrderTransition,
    pub at: DateTime<Utc>,
    pub movements: Vec<CreditMovement>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Orders
// ─────────────────────────────────────────────────────────────────────────────

/// A quantity of one menu item within an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub food: Food,
    pub quantity: u32,
}

impl OrderLine {
    pub fn line_total(&self) -> Result<Money, MoneyError> {
        self.food.price.checked_mul(self.quantity)
    }
}

/// A persisted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    pub restaurant: String,
    pub client: String,
    pub created_at: DateTime<Utc>,
    pub shipping_rate: Money,
    pub lines: Vec<OrderLine>,
    pub state: OrderState,
    pub deliveryman: Option<String>,
    pub accepted_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Sum of all line totals, excluding shipping.
    pub fn subtotal(&self) -> Result<Money, MoneyError> {
        self.lines
            .iter()
            .map(OrderLine::line_total)
            .try_fold(Money::ZERO, |acc, line| acc.checked_add(line?))
    }

    /// What the client paid: subtotal plus shipping.
    pub fn total(&self) -> Result<Money, MoneyError> {
        self.subtotal()?.checked_add(self.shipping_rate)
    }

    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Apply a transition in memory, stamping the relevant timestamp.
    pub fn apply(
        &mut self,
        transition: &OrderTransition,
        at: DateTime<Utc>,
    ) -> Result<(), ValidationError> {
        let next = transition.target_state();
        if !self.state.can_transition_to(next) {
            return Err(ValidationError::invalid(
                "order state",
                format!("cannot go from {} to {next}", self.state),
            ));
        }
        match transition {
            OrderTransition::MarkReady => {}
            OrderTransition::Accept { deliveryman } => {
                self.deliveryman = Some(deliveryman.clone());
                self.accepted_at = Some(at);
            }
            OrderTransition::Deliver => self.delivered_at = Some(at),
            OrderTransition::Cancel => self.cancelled_at = Some(at),
        }
        self.state = next;
        Ok(())
    }
}

/// A client's request for a new order: `(food id, quantity)` pairs from one
/// restaurant.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub restaurant: String,
    pub lines: Vec<(i64, u32)>,
}

/// A checked order ready to be stored.
///
/// Line prices are taken from the menu when the order is stored, and the
/// client is debited the resulting [`Order::total`].
#[derive(Debug, Clone)]
pub struct PlacedOrder {
    pub restaurant: String,
    pub client: String,
    pub created_at: DateTime<Utc>,
    pub shipping_rate: Money,
    pub lines: Vec<(i64, u32)>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Listing
// ─────────────────────────────────────────────────────────────────────────────

/// Whose orders a listing covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderScope {
    All,
    Client(String),
    Restaurant(String),
    /// Orders waiting for pickup plus those assigned to this deliveryman.
    Deliveryman(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderFilter {
    pub scope: OrderScope,
    pub state: Option<OrderState>,
}

impl OrderFilter {
    #[must_use]
    pub const fn new(scope: OrderScope) -> Self {
        Self { scope, state: None }
    }

    #[must_use]
    pub const fn with_state(mut self, state: Option<OrderState>) -> Self {
        self.state = state;
        self
    }
}
