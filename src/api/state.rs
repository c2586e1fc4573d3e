//! Shared application state.

use std::sync::Arc;

use crate::cache::{CacheStore, TtlPolicy};
use crate::config::Config;
use crate::migrations::MigrationRunner;
use crate::service::ProductService;
use crate::store::{Database, SqliteProductRepository};

/// Application state shared across all handlers.
///
/// The cache is created once and shared by the product service, the admin
/// endpoints and the cleanup task.
#[derive(Clone)]
pub struct AppState {
    pub products: Arc<ProductService<SqliteProductRepository>>,
    pub migrations: Arc<MigrationRunner>,
    pub cache: Arc<CacheStore>,
}

impl AppState {
    /// Wires the repository, cache, service and migration runner over `db`.
    pub fn new(db: Database, ttl: TtlPolicy) -> Self {
        let cache = Arc::new(CacheStore::new());
        let repository = Arc::new(SqliteProductRepository::new(db.clone()));

        Self {
            products: Arc::new(ProductService::new(repository, cache.clone(), ttl)),
            migrations: Arc::new(MigrationRunner::new(db)),
            cache,
        }
    }

    /// Creates a new AppState from configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(Database::new(&config.database_path), config.ttl_policy())
    }
}
