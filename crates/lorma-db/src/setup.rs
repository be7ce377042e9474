//! Database setup and initialization.
//!
//! This module provides the `setup_database()` function for initializing
//! the `SQLite` database with full schema. Entry points call this with the
//! resolved database path.

use anyhow::Result;
use sqlx::SqlitePool;
use sqlx::sqlite::SqliteConnectOptions;
use std::path::Path;
use std::time::Duration;
use tracing::debug;

/// Sets up the `SQLite` database connection and ensures the schema exists.
///
/// Creates the parent directory and the database file when missing, turns on
/// foreign keys and creates every table and index.
///
/// # Example
///
/// ```rust,no_run
/// use lorma_db::setup_database;
/// use std::path::Path;
///
/// # async fn example() -> anyhow::Result<()> {
/// let pool = setup_database(Path::new("/path/to/lorma.db")).await?;
/// # Ok(())
/// # }
/// ```
pub async fn setup_database(db_path: &Path) -> Result<SqlitePool> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let pool = SqlitePool::connect_with(
        SqliteConnectOptions::new()
            .filename(db_path)
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(Duration::from_secs(5)),
    )
    .await?;

    create_schema(&pool).await?;
    debug!(path = %db_path.display(), "Database ready");

    Ok(pool)
}

/// Sets up an in-memory `SQLite` database for testing.
///
/// Every connection to `sqlite::memory:` opens its own database, so the pool
/// is limited to a single connection.
#[cfg(any(test, feature = "test-utils"))]
pub async fn setup_test_database() -> Result<SqlitePool> {
    use sqlx::sqlite::SqlitePoolOptions;

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(
            SqliteConnectOptions::new()
                .in_memory(true)
                .foreign_keys(true),
        )
        .await?;
    create_schema(&pool).await?;
    Ok(pool)
}

/// Creates the complete database schema.
///
/// Money is stored in integer cents, instants as UTC text and times of day
/// as `HH:MM`.
async fn create_schema(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            username TEXT PRIMARY KEY NOT NULL,
            password_hash TEXT NOT NULL,
            name TEXT NOT NULL,
            surname TEXT NOT NULL,
            phone TEXT NOT NULL,
            email TEXT NOT NULL,
            city TEXT NOT NULL,
            street TEXT NOT NULL,
            house_number TEXT NOT NULL,
            role TEXT NOT NULL CHECK (role IN ('client', 'restaurant', 'deliveryman', 'admin')),
            credit_cents INTEGER CHECK (credit_cents IS NULL OR credit_cents >= 0)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS restaurants (
            name TEXT PRIMARY KEY NOT NULL,
            owner TEXT NOT NULL UNIQUE REFERENCES users(username),
            vat_id TEXT NOT NULL,
            opening_time TEXT NOT NULL,
            closing_time TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS food_types (
            name TEXT PRIMARY KEY NOT NULL,
            macro_type TEXT NOT NULL CHECK (macro_type IN ('dish', 'drink'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS foods (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            restaurant TEXT NOT NULL REFERENCES restaurants(name),
            price_cents INTEGER NOT NULL CHECK (price_cents > 0),
            food_type TEXT NOT NULL REFERENCES food_types(name),
            available INTEGER NOT NULL DEFAULT 1
        )
        "#,
    )
    .execute(pool)
    .await?;

    // A name can come back to a menu once the old entry was removed
    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_foods_menu ON foods(restaurant, name) WHERE available = 1",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS orders (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            restaurant TEXT NOT NULL REFERENCES restaurants(name),
            client TEXT NOT NULL REFERENCES users(username),
            created_at TEXT NOT NULL,
            shipping_cents INTEGER NOT NULL CHECK (shipping_cents >= 0),
            state TEXT NOT NULL DEFAULT 'waiting',
            deliveryman TEXT REFERENCES users(username),
            accepted_at TEXT,
            delivered_at TEXT,
            cancelled_at TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_orders_state ON orders(state)")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS order_lines (
            order_id INTEGER NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
            food_id INTEGER NOT NULL REFERENCES foods(id),
            quantity INTEGER NOT NULL CHECK (quantity > 0),
            unit_price_cents INTEGER NOT NULL,
            PRIMARY KEY (order_id, food_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS reviews (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            restaurant TEXT NOT NULL REFERENCES restaurants(name),
            author TEXT NOT NULL REFERENCES users(username),
            date TEXT NOT NULL,
            vote INTEGER NOT NULL CHECK (vote BETWEEN 1 AND 5),
            comment TEXT
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_reviews_restaurant ON reviews(restaurant)")
        .execute(pool)
        .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS settings_kv (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_setup_test_database() {
        let pool = setup_test_database().await.unwrap();

        for table in [
            "users",
            "restaurants",
            "food_types",
            "foods",
            "orders",
            "order_lines",
            "reviews",
            "settings_kv",
        ] {
            let _: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
                .fetch_one(&pool)
                .await
                .unwrap();
        }
    }

    #[tokio::test]
    async fn test_setup_database_creates_file_and_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("lorma.db");

        let pool = setup_database(&path).await.unwrap();
        pool.close().await;
        assert!(path.exists());

        let pool = setup_database(&path).await.unwrap();
        let (fk,): (i64,) = sqlx::query_as("PRAGMA foreign_keys")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(fk, 1);
    }
}
