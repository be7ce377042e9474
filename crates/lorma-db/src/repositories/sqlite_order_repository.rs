//! `SQLite` implementation of the `OrderRepository` trait.
//!
//! Placing an order and every state change run in one transaction together
//! with the credit movements they cause. State changes are compare-and-set on
//! the state the caller observed.

use async_trait::async_trait;
use sqlx::{QueryBuilder, Row, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use lorma_core::{
    Money, Order, OrderFilter, OrderLine, OrderRepository, OrderScope, OrderState, OrderTransition,
    PlacedOrder, RepositoryError, StateChange,
};

use super::row_mappers::{
    ORDER_SELECT_COLUMNS, format_datetime, row_to_food, row_to_order, storage, write_error,
};
use super::sqlite_user_repository::adjust_credit;

pub struct SqliteOrderRepository {
    pool: SqlitePool,
}

impl SqliteOrderRepository {
    /// Create a new `SQLite` order repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Lines of one order, priced as they were when the order was placed.
async fn load_lines(conn: &mut SqliteConnection, order_id: i64) -> Result<Vec<OrderLine>, RepositoryError> {
    let rows = sqlx::query(
        "SELECT f.id, f.name, f.restaurant, l.unit_price_cents AS price_cents, f.food_type, t.macro_type, f.available, l.quantity \
         FROM order_lines l JOIN foods f ON f.id = l.food_id JOIN food_types t ON t.name = f.food_type \
         WHERE l.order_id = ? ORDER BY l.rowid",
    )
    .bind(order_id)
    .fetch_all(&mut *conn)
    .await
    .map_err(storage)?;

    rows.iter()
        .map(|row| -> Result<OrderLine, RepositoryError> {
            let quantity: i64 = row.try_get("quantity").map_err(storage)?;
            Ok(OrderLine {
                food: row_to_food(row)?,
                quantity: u32::try_from(quantity)
                    .map_err(|e| RepositoryError::Serialization(e.to_string()))?,
            })
        })
        .collect()
}

async fn load_order(conn: &mut SqliteConnection, id: i64) -> Result<Order, RepositoryError> {
    let query = format!("SELECT {ORDER_SELECT_COLUMNS} FROM orders WHERE id = ?");
    let row = sqlx::query(&query)
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
        .map_err(storage)?
        .ok_or_else(|| RepositoryError::NotFound(format!("Order with ID {id}")))?;

    let mut order = row_to_order(&row)?;
    order.lines = load_lines(conn, id).await?;
    Ok(order)
}

#[async_trait]
impl OrderRepository for SqliteOrderRepository {
    async fn get(&self, id: i64) -> Result<Order, RepositoryError> {
        let mut conn = self.pool.acquire().await.map_err(storage)?;
        load_order(&mut *conn, id).await
    }

    async fn list(&self, filter: &OrderFilter) -> Result<Vec<Order>, RepositoryError> {
        let mut builder: QueryBuilder<'_, Sqlite> =
            QueryBuilder::new(format!("SELECT {ORDER_SELECT_COLUMNS} FROM orders WHERE 1 = 1"));
        match &filter.scope {
            OrderScope::All => {}
            OrderScope::Client(client) => {
                builder.push(" AND client = ").push_bind(client);
            }
            OrderScope::Restaurant(restaurant) => {
                builder.push(" AND restaurant = ").push_bind(restaurant);
            }
            OrderScope::Deliveryman(username) => {
                builder
                    .push(" AND (state = ")
                    .push_bind(OrderState::Ready.as_str())
                    .push(" OR deliveryman = ")
                    .push_bind(username)
                    .push(")");
            }
        }
        if let Some(state) = filter.state {
            builder.push(" AND state = ").push_bind(state.as_str());
        }
        builder.push(" ORDER BY id DESC");

        let mut conn = self.pool.acquire().await.map_err(storage)?;
        let rows = builder
            .build()
            .fetch_all(&mut *conn)
            .await
            .map_err(storage)?;

        let mut orders = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut order = row_to_order(row)?;
            order.lines = load_lines(&mut *conn, order.id).await?;
            orders.push(order);
        }
        Ok(orders)
    }

    async fn place(&self, order: &PlacedOrder) -> Result<Order, RepositoryError> {
        let mut tx = self.pool.begin().await.map_err(storage)?;

        let row = sqlx::query(
            "INSERT INTO orders (restaurant, client, created_at, shipping_cents, state) \
             VALUES (?, ?, ?, ?, ?) RETURNING id",
        )
        .bind(&order.restaurant)
        .bind(&order.client)
        .bind(format_datetime(order.created_at))
        .bind(order.shipping_rate.cents())
        .bind(OrderState::Waiting.as_str())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| write_error(e, "order"))?;
        let id: i64 = row.try_get("id").map_err(storage)?;

        for &(food_id, quantity) in &order.lines {
            let inserted = sqlx::query(
                "INSERT INTO order_lines (order_id, food_id, quantity, unit_price_cents) \
                 SELECT ?, id, ?, price_cents FROM foods \
                 WHERE id = ? AND restaurant = ? AND available = 1",
            )
            .bind(id)
            .bind(i64::from(quantity))
            .bind(food_id)
            .bind(&order.restaurant)
            .execute(&mut *tx)
            .await
            .map_err(|e| write_error(e, format!("food {food_id}")))?;

            if inserted.rows_affected() == 0 {
                return Err(RepositoryError::NotFound(format!(
                    "Food with ID {food_id} on the menu of {}",
                    order.restaurant
                )));
            }
        }

        let stored = load_order(&mut *tx, id).await?;
        let debit = stored
            .total()
            .and_then(Money::checked_neg)
            .map_err(|e| RepositoryError::Constraint(e.to_string()))?;
        adjust_credit(&mut *tx, &order.client, debit).await?;
        tx.commit().await.map_err(storage)?;

        debug!(order = id, client = %order.client, "Stored order");
        Ok(stored)
    }

    async fn apply_transition(
        &self,
        id: i64,
        change: &StateChange,
    ) -> Result<Order, RepositoryError> {
        let target = change.transition.target_state();
        if !change.from.can_transition_to(target) {
            return Err(RepositoryError::Constraint(format!(
                "order {id} cannot go from {} to {target}",
                change.from
            )));
        }

        let mut tx = self.pool.begin().await.map_err(storage)?;
        let at = format_datetime(change.at);

        let mut builder: QueryBuilder<'_, Sqlite> = QueryBuilder::new("UPDATE orders SET state = ");
        builder.push_bind(target.as_str());
        match &change.transition {
            OrderTransition::MarkReady => {}
            OrderTransition::Accept { deliveryman } => {
                builder
                    .push(", deliveryman = ")
                    .push_bind(deliveryman)
                    .push(", accepted_at = ")
                    .push_bind(&at);
            }
            OrderTransition::Deliver => {
                builder.push(", delivered_at = ").push_bind(&at);
            }
            OrderTransition::Cancel => {
                builder.push(", cancelled_at = ").push_bind(&at);
            }
        }
        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" AND state = ")
            .push_bind(change.from.as_str());

        let result = builder
            .build()
            .execute(&mut *tx)
            .await
            .map_err(|e| write_error(e, format!("order {id}")))?;

        if result.rows_affected() == 0 {
            let current = load_order(&mut *tx, id).await?;
            return Err(RepositoryError::Constraint(format!(
                "order {id} is {}, expected {}",
                current.state, change.from
            )));
        }

        for movement in &change.movements {
            adjust_credit(&mut *tx, &movement.username, movement.delta).await?;
        }

        let updated = load_order(&mut *tx, id).await?;
        tx.commit().await.map_err(storage)?;
        Ok(updated)
    }

    async fn food_in_open_orders(&self, food_id: i64) -> Result<bool, RepositoryError> {
        let (open,): (bool,) = sqlx::query_as(
            "SELECT EXISTS (SELECT 1 FROM order_lines l JOIN orders o ON o.id = l.order_id \
             WHERE l.food_id = ? AND o.state IN ('waiting', 'ready', 'accepted'))",
        )
        .bind(food_id)
        .fetch_one(&self.pool)
        .await
        .map_err(storage)?;
        Ok(open)
    }
}
