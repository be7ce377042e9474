//! Order repository trait definition.

use async_trait::async_trait;

use super::RepositoryError;
use crate::domain::{Order, OrderFilter, PlacedOrder, StateChange};

/// Repository for orders.
///
/// Orders move money, so both write operations are atomic: either every
/// row and every credit movement is written, or none is.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Get an order with its lines.
    async fn get(&self, id: i64) -> Result<Order, RepositoryError>;

    /// List orders matching `filter`, newest first.
    async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, RepositoryError>;

    /// Store a new `Waiting` order and debit the client by its total.
    ///
    /// The total is computed from the prices stored with the lines, in the
    /// same transaction. Returns `Constraint` if the client cannot cover it.
    async fn place(&self, order: &PlacedOrder) -> Result<Order, RepositoryError>;

    /// Move an order to a new state and apply the credit movements.
    ///
    /// Only succeeds if the order is still in `change.from`; otherwise
    /// returns `Constraint` and nothing is written.
    async fn apply_transition(
        &self,
        id: i64,
        change: &StateChange,
    ) -> Result<Order, RepositoryError>;

    /// Whether any order that is not delivered or cancelled contains `food_id`.
    async fn food_in_open_orders(&self, food_id: i64) -> Result<bool, RepositoryError>;
}
