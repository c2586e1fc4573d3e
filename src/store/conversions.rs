//! SQLite row conversion functions.
//!
//! Pure functions for converting between SQLite rows and `Product`.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::Type;
use rusqlite::Row;
use uuid::Uuid;

use crate::models::{Price, Product};

/// Convert a SQLite row to a Product.
///
/// Expected columns: Id, Name, Price, CreatedAt, Description
pub fn row_to_product(row: &Row) -> rusqlite::Result<Product> {
    let id: String = row.get(0)?;
    let name: String = row.get(1)?;
    let price: f64 = row.get(2)?;
    let created_at: String = row.get(3)?;
    let description: Option<String> = row.get(4)?;

    Ok(Product {
        id: parse_uuid(&id)?,
        name,
        price: parse_price(price)?,
        created_at: parse_datetime(&created_at)?,
        description,
    })
}

/// Format a timestamp for storage.
///
/// Fixed-width microsecond RFC 3339 in UTC, so text ordering matches time
/// ordering.
pub fn format_datetime(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_uuid(s: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(s)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))
}

fn parse_datetime(s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(3, Type::Text, Box::new(e)))
}

fn parse_price(amount: f64) -> rusqlite::Result<Price> {
    Price::from_f64(amount).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            2,
            Type::Real,
            Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Invalid price: {amount}"),
            )),
        )
    })
}
