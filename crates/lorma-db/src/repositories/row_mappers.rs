//! Row mapping helpers for `SQLite` queries.

use std::fmt::Display;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use lorma_core::{
    Food, FoodType, Money, Order, RepositoryError, Restaurant, Review, User, UserProfile, Vote,
};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

const DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const TIME_FORMAT: &str = "%H:%M";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Shared SELECT column list for user queries.
pub const USER_SELECT_COLUMNS: &str = "username, password_hash, name, surname, phone, email, city, street, house_number, role, credit_cents";

/// Shared SELECT column list for restaurant queries.
pub const RESTAURANT_SELECT_COLUMNS: &str = "name, owner, vat_id, opening_time, closing_time";

/// Foods joined with their food type. Callers append a WHERE clause.
pub const FOOD_SELECT: &str = "SELECT f.id, f.name, f.restaurant, f.price_cents, f.food_type, t.macro_type, f.available \
     FROM foods f JOIN food_types t ON t.name = f.food_type";

/// Shared SELECT column list for order headers.
pub const ORDER_SELECT_COLUMNS: &str = "id, restaurant, client, created_at, shipping_cents, state, deliveryman, accepted_at, delivered_at, cancelled_at";

/// Shared SELECT column list for review queries.
pub const REVIEW_SELECT_COLUMNS: &str = "id, restaurant, author, date, vote, comment";

pub fn storage(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Storage(e.to_string())
}

/// Map an INSERT or UPDATE failure, turning constraint violations into the
/// matching repository errors.
pub fn write_error(e: sqlx::Error, what: impl Display) -> RepositoryError {
    if let sqlx::Error::Database(db) = &e {
        if db.is_unique_violation() {
            return RepositoryError::AlreadyExists(what.to_string());
        }
        if db.is_foreign_key_violation() || db.is_check_violation() {
            return RepositoryError::Constraint(format!("{what}: {}", db.message()));
        }
    }
    storage(e)
}

fn column<'r, T>(row: &'r SqliteRow, name: &str) -> Result<T, RepositoryError>
where
    T: sqlx::Decode<'r, sqlx::Sqlite> + sqlx::Type<sqlx::Sqlite>,
{
    row.try_get(name).map_err(storage)
}

fn parse_column<T>(value: &str) -> Result<T, RepositoryError>
where
    T: FromStr,
    T::Err: Display,
{
    value
        .parse()
        .map_err(|e| RepositoryError::Serialization(format!("'{value}': {e}")))
}

pub fn format_datetime(at: DateTime<Utc>) -> String {
    at.format(DATETIME_FORMAT).to_string()
}

/// Helper to parse datetime strings that may have "UTC" suffix.
pub fn parse_datetime(datetime_str: Option<String>) -> Option<DateTime<Utc>> {
    datetime_str.and_then(|s| {
        let trimmed = s.trim_end_matches(" UTC");
        NaiveDateTime::parse_from_str(trimmed, DATETIME_FORMAT)
            .map(|dt| DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc))
            .ok()
    })
}

fn required_datetime(row: &SqliteRow, name: &str) -> Result<DateTime<Utc>, RepositoryError> {
    let raw: String = column(row, name)?;
    parse_datetime(Some(raw.clone()))
        .ok_or_else(|| RepositoryError::Serialization(format!("bad {name} '{raw}'")))
}

pub fn format_time(time: NaiveTime) -> String {
    time.format(TIME_FORMAT).to_string()
}

fn parse_time(row: &SqliteRow, name: &str) -> Result<NaiveTime, RepositoryError> {
    let raw: String = column(row, name)?;
    NaiveTime::parse_from_str(&raw, TIME_FORMAT)
        .map_err(|e| RepositoryError::Serialization(format!("bad {name} '{raw}': {e}")))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// Convert an aggregate count column, which `SQLite` returns as `i64`.
pub fn count(row: &SqliteRow, name: &str) -> Result<u64, RepositoryError> {
    Ok(column::<i64>(row, name)?.unsigned_abs())
}

/// Parse a database row into a User.
pub fn row_to_user(row: &SqliteRow) -> Result<User, RepositoryError> {
    let role: String = column(row, "role")?;
    Ok(User {
        username: column(row, "username")?,
        password_hash: column(row, "password_hash")?,
        profile: UserProfile {
            name: column(row, "name")?,
            surname: column(row, "surname")?,
            phone: column(row, "phone")?,
            email: column(row, "email")?,
            city: column(row, "city")?,
            street: column(row, "street")?,
            house_number: column(row, "house_number")?,
        },
        role: parse_column(&role)?,
        credit: column::<Option<i64>>(row, "credit_cents")?.map(Money::from_cents),
    })
}

/// Parse a database row into a Restaurant.
pub fn row_to_restaurant(row: &SqliteRow) -> Result<Restaurant, RepositoryError> {
    Ok(Restaurant {
        name: column(row, "name")?,
        owner: column(row, "owner")?,
        vat_id: column(row, "vat_id")?,
        opening_time: parse_time(row, "opening_time")?,
        closing_time: parse_time(row, "closing_time")?,
    })
}

/// Parse a `name, macro_type` row into a FoodType.
pub fn row_to_food_type(row: &SqliteRow) -> Result<FoodType, RepositoryError> {
    let macro_type: String = column(row, "macro_type")?;
    Ok(FoodType {
        name: column(row, "name")?,
        macro_type: parse_column(&macro_type)?,
    })
}

/// Parse a row produced by [`FOOD_SELECT`] into a Food.
pub fn row_to_food(row: &SqliteRow) -> Result<Food, RepositoryError> {
    let macro_type: String = column(row, "macro_type")?;
    Ok(Food {
        id: column(row, "id")?,
        name: column(row, "name")?,
        restaurant: column(row, "restaurant")?,
        price: Money::from_cents(column(row, "price_cents")?),
        food_type: FoodType {
            name: column(row, "food_type")?,
            macro_type: parse_column(&macro_type)?,
        },
        available: column(row, "available")?,
    })
}

/// Parse an order header. Lines are loaded separately.
pub fn row_to_order(row: &SqliteRow) -> Result<Order, RepositoryError> {
    let state: String = column(row, "state")?;
    Ok(Order {
        id: column(row, "id")?,
        restaurant: column(row, "restaurant")?,
        client: column(row, "client")?,
        created_at: required_datetime(row, "created_at")?,
        shipping_rate: Money::from_cents(column(row, "shipping_cents")?),
        lines: Vec::new(),
        state: parse_column(&state)?,
        deliveryman: column(row, "deliveryman")?,
        accepted_at: parse_datetime(column(row, "accepted_at")?),
        delivered_at: parse_datetime(column(row, "delivered_at")?),
        cancelled_at: parse_datetime(column(row, "cancelled_at")?),
    })
}

/// Parse a database row into a Review.
pub fn row_to_review(row: &SqliteRow) -> Result<Review, RepositoryError> {
    let date: String = column(row, "date")?;
    let vote = u8::try_from(column::<i64>(row, "vote")?)
        .map_err(|e| RepositoryError::Serialization(e.to_string()))?;
    Ok(Review {
        id: column(row, "id")?,
        restaurant: column(row, "restaurant")?,
        author: column(row, "author")?,
        date: NaiveDate::parse_from_str(&date, DATE_FORMAT)
            .map_err(|e| RepositoryError::Serialization(format!("bad date '{date}': {e}")))?,
        vote: Vote::try_from(vote).map_err(|e| RepositoryError::Serialization(e.to_string()))?,
        comment: column(row, "comment")?,
    })
}
