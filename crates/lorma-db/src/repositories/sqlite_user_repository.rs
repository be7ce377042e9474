//! `SQLite` implementation of the `UserRepository` trait.

use async_trait::async_trait;
use sqlx::{Row, SqliteConnection, SqlitePool};

use lorma_core::{DeliverymanDeliveries, Money, RepositoryError, Role, User, UserRepository};

use super::row_mappers::{USER_SELECT_COLUMNS, count, row_to_user, storage, write_error};

/// `SQLite` implementation of the `UserRepository` trait.
pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    /// Create a new `SQLite` user repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

/// Add `delta` to an account's credit on an existing connection.
///
/// The update is guarded so the balance never drops below zero; accounts
/// without credit (admins) are refused.
pub(crate) async fn adjust_credit(
    conn: &mut SqliteConnection,
    username: &str,
    delta: Money,
) -> Result<Money, RepositoryError> {
    let row = sqlx::query(
        "UPDATE users SET credit_cents = credit_cents + ? \
         WHERE username = ? AND credit_cents IS NOT NULL AND credit_cents + ? >= 0 \
         RETURNING credit_cents",
    )
    .bind(delta.cents())
    .bind(username)
    .bind(delta.cents())
    .fetch_optional(&mut *conn)
    .await
    .map_err(storage)?;

    if let Some(row) = row {
        return Ok(Money::from_cents(row.try_get("credit_cents").map_err(storage)?));
    }

    let credit: Option<(Option<i64>,)> =
        sqlx::query_as("SELECT credit_cents FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&mut *conn)
            .await
            .map_err(storage)?;
    match credit {
        None => Err(RepositoryError::NotFound(format!("User '{username}'"))),
        Some((None,)) => Err(RepositoryError::Constraint(format!(
            "'{username}' has no credit"
        ))),
        Some((Some(_),)) => Err(RepositoryError::Constraint(format!(
            "insufficient credit for '{username}'"
        ))),
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn get(&self, username: &str) -> Result<User, RepositoryError> {
        let query = format!("SELECT {USER_SELECT_COLUMNS} FROM users WHERE username = ?");

        let row = sqlx::query(&query)
            .bind(username)
            .fetch_optional(&self.pool)
            .await
            .map_err(storage)?
            .ok_or_else(|| RepositoryError::NotFound(format!("User '{username}'")))?;

        row_to_user(&row)
    }

    async fn list(&self, role: Option<Role>) -> Result<Vec<User>, RepositoryError> {
        let rows = match role {
            Some(role) => {
                let query = format!(
                    "SELECT {USER_SELECT_COLUMNS} FROM users WHERE role = ? ORDER BY username"
                );
                sqlx::query(&query)
                    .bind(role.as_str())
                    .fetch_all(&self.pool)
                    .await
            }
            None => {
                let query = format!("SELECT {USER_SELECT_COLUMNS} FROM users ORDER BY username");
                sqlx::query(&query).fetch_all(&self.pool).await
            }
        }
        .map_err(storage)?;

        rows.iter().map(row_to_user).collect()
    }

    async fn count_by_role(&self, role: Role) -> Result<u64, RepositoryError> {
        let row = sqlx::query("SELECT COUNT(*) AS n FROM users WHERE role = ?")
            .bind(role.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(storage)?;
        count(&row, "n")
    }

    async fn insert(&self, user: &User) -> Result<(), RepositoryError> {
        let profile = &user.profile;
        sqlx::query(
            "INSERT INTO users (username, password_hash, name, surname, phone, email, city, street, house_number, role, credit_cents) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&profile.name)
        .bind(&profile.surname)
        .bind(&profile.phone)
        .bind(&profile.email)
        .bind(&profile.city)
        .bind(&profile.street)
        .bind(&profile.house_number)
        .bind(user.role.as_str())
        .bind(user.credit.map(Money::cents))
        .execute(&self.pool)
        .await
        .map_err(|e| write_error(e, &user.username))?;

        Ok(())
    }

    async fn delete(&self, username: &str) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM users WHERE username = ?")
            .bind(username)
            .execute(&self.pool)
            .await
            .map_err(|e| write_error(e, username))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("User '{username}'")));
        }
        Ok(())
    }

    async fn update_password(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE users SET password_hash = ? WHERE username = ?")
            .bind(password_hash)
            .bind(username)
            .execute(&self.pool)
            .await
            .map_err(storage)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound(format!("User '{username}'")));
        }
        Ok(())
    }

    async fn adjust_credit(&self, username: &str, delta: Money) -> Result<Money, RepositoryError> {
        let mut conn = self.pool.acquire().await.map_err(storage)?;
        adjust_credit(&mut *conn, username, delta).await
    }

    async fn top_deliveryman(&self) -> Result<Option<DeliverymanDeliveries>, RepositoryError> {
        let row = sqlx::query(
            "SELECT deliveryman, COUNT(*) AS n FROM orders \
             WHERE state = 'delivered' AND deliveryman IS NOT NULL \
             GROUP BY deliveryman ORDER BY n DESC, deliveryman LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await
        .map_err(storage)?;

        row.map(|r| -> Result<_, RepositoryError> {
            Ok(DeliverymanDeliveries {
                username: r.try_get("deliveryman").map_err(storage)?,
                deliveries: count(&r, "n")?,
            })
        })
        .transpose()
    }
}
