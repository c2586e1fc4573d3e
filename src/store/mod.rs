//! Product persistence.
//!
//! `ProductRepository` is the seam between the service and the durable store.
//! It knows nothing about caching.

mod conversions;
mod database;
mod error;
mod schema;
mod sqlite;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::Result;
use crate::models::{Product, ProductUpdate};

pub use database::Database;
pub use sqlite::SqliteProductRepository;

/// Storage operations on products. Each call is a single independent statement.
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Fetch one product.
    async fn get_by_id(&self, id: Uuid) -> Result<Option<Product>>;

    /// Fetch every product, newest first.
    async fn get_all(&self) -> Result<Vec<Product>>;

    /// Insert exactly the given product. Returns what was stored.
    async fn create(&self, product: &Product) -> Result<Product>;

    /// Apply a partial update. `None` if the id is unknown.
    async fn update(&self, id: Uuid, update: &ProductUpdate) -> Result<Option<Product>>;

    /// Delete one product. `true` if a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}
