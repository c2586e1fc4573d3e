//! SQLite repository implementation.

use async_trait::async_trait;
use rusqlite::OptionalExtension;
use uuid::Uuid;

use super::conversions::{format_datetime, row_to_product};
use super::database::Database;
use super::schema::{self, ProductStatements};
use super::ProductRepository;
use crate::error::Result;
use crate::models::{Product, ProductUpdate};

/// SQLite-backed product repository.
///
/// Opens a connection per call through [`Database`]. Statements adapt to
/// whether the `Description` column exists, so the repository keeps working
/// after a rollback to the first migration.
#[derive(Debug, Clone)]
pub struct SqliteProductRepository {
    db: Database,
}

impl SqliteProductRepository {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

fn statements(conn: &rusqlite::Connection) -> rusqlite::Result<ProductStatements> {
    let count: i64 = conn.query_row(schema::HAS_DESCRIPTION_COLUMN, [], |row| row.get(0))?;
    Ok(ProductStatements::for_schema(count > 0))
}

fn select_by_id(
    conn: &rusqlite::Connection,
    sql: &str,
    id: &str,
) -> rusqlite::Result<Option<Product>> {
    conn.query_row(sql, [id], row_to_product).optional()
}

#[async_trait]
impl ProductRepository for SqliteProductRepository {
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Product>> {
        let id = id.to_string();

        self.db
            .call(move |conn| {
                let sql = statements(conn)?;
                select_by_id(conn, sql.select_by_id, &id)
            })
            .await
    }

    async fn get_all(&self) -> Result<Vec<Product>> {
        self.db
            .call(|conn| {
                let sql = statements(conn)?;
                let mut stmt = conn.prepare(sql.select_all)?;
                let rows = stmt.query_map([], row_to_product)?;
                let products = rows.collect::<rusqlite::Result<Vec<_>>>()?;
                Ok(products)
            })
            .await
    }

    async fn create(&self, product: &Product) -> Result<Product> {
        let mut stored = product.clone();
        let id = product.id.to_string();
        let name = product.name.clone();
        let price = product.price.as_f64();
        let created_at = format_datetime(&product.created_at);
        let description = product.description.clone();

        let has_description = self
            .db
            .call(move |conn| {
                let sql = statements(conn)?;
                if sql.has_description {
                    conn.execute(
                        sql.insert,
                        rusqlite::params![id, name, price, created_at, description],
                    )?;
                } else {
                    conn.execute(sql.insert, rusqlite::params![id, name, price, created_at])?;
                }
                Ok(sql.has_description)
            })
            .await?;

        if !has_description {
            stored.description = None;
        }
        Ok(stored)
    }

    async fn update(&self, id: Uuid, update: &ProductUpdate) -> Result<Option<Product>> {
        let id = id.to_string();
        let name = update.name.clone();
        let price = update.price.map(|p| p.as_f64());
        let description = update.description.clone();

        self.db
            .call(move |conn| {
                let sql = statements(conn)?;
                let rows = if sql.has_description {
                    conn.execute(sql.update, rusqlite::params![id, name, price, description])?
                } else {
                    conn.execute(sql.update, rusqlite::params![id, name, price])?
                };
                if rows == 0 {
                    return Ok(None);
                }
                select_by_id(conn, sql.select_by_id, &id)
            })
            .await
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        let id = id.to_string();

        self.db
            .call(move |conn| {
                let rows = conn.execute(schema::DELETE_PRODUCT, [id])?;
                Ok(rows > 0)
            })
            .await
    }
}
