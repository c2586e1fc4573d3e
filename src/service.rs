//! Product Service
//!
//! Cache-aside façade over a [`ProductRepository`]. Reads go through the cache;
//! mutations write to the store first and then invalidate the affected keys
//! before returning.

use std::sync::Arc;
use std::time::Duration;

use chrono::{SubsecRound, Utc};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::cache::{
    product_key, CacheStore, CachedValue, FillTicket, TtlPolicy, ALL_PRODUCTS_KEY,
    COLLECTION_KEYS,
};
use crate::error::Result;
use crate::models::{NewProduct, Product, ProductUpdate};
use crate::store::ProductRepository;

/// Product operations with read-through caching and explicit invalidation.
pub struct ProductService<R: ProductRepository> {
    repository: Arc<R>,
    cache: Arc<CacheStore>,
    ttl: TtlPolicy,
}

impl<R: ProductRepository> ProductService<R> {
    pub fn new(repository: Arc<R>, cache: Arc<CacheStore>, ttl: TtlPolicy) -> Self {
        Self {
            repository,
            cache,
            ttl,
        }
    }

    pub fn cache(&self) -> &Arc<CacheStore> {
        &self.cache
    }

    // == Get ==
    /// Fetches one product, caching it under `product-{id}` on a store hit.
    ///
    /// An unknown id is never cached.
    pub async fn get(&self, id: Uuid) -> Result<Option<Product>> {
        let key = product_key(id);

        match self.cache.lookup(&key) {
            Some(CachedValue::Product(product)) => {
                debug!(%id, "Cache hit");
                return Ok(Some(product));
            }
            Some(other) => self.discard_mismatch(&key, other.kind()),
            None => debug!(%id, "Cache miss"),
        }

        let ticket = self.cache.begin_fill(key);
        let product = self.repository.get_by_id(id).await?;
        if let Some(product) = &product {
            self.fill(ticket, CachedValue::Product(product.clone()), self.ttl.item);
        }
        Ok(product)
    }

    // == List ==
    /// Fetches every product, newest first, caching the listing.
    pub async fn list(&self) -> Result<Vec<Product>> {
        match self.cache.lookup(ALL_PRODUCTS_KEY) {
            Some(CachedValue::Products(products)) => {
                debug!(count = products.len(), "Listing cache hit");
                return Ok(products);
            }
            Some(other) => self.discard_mismatch(ALL_PRODUCTS_KEY, other.kind()),
            None => debug!("Listing cache miss"),
        }

        let ticket = self.cache.begin_fill(ALL_PRODUCTS_KEY);
        let products = self.repository.get_all().await?;
        self.fill(
            ticket,
            CachedValue::Products(products.clone()),
            self.ttl.listing,
        );
        Ok(products)
    }

    // == Create ==
    /// Inserts a new product with a fresh id and creation time.
    pub async fn create(&self, new: NewProduct) -> Result<Product> {
        let product = Product {
            id: Uuid::new_v4(),
            name: new.name,
            price: new.price,
            created_at: Utc::now().trunc_subsecs(6),
            description: new.description,
        };

        let created = self.repository.create(&product).await?;
        self.cache.invalidate(&[ALL_PRODUCTS_KEY]);

        info!(id = %created.id, name = %created.name, "Product created");
        Ok(created)
    }

    // == Update ==
    /// Applies a partial update. `None` if the id is unknown, in which case
    /// the cache is left alone.
    pub async fn update(&self, id: Uuid, update: ProductUpdate) -> Result<Option<Product>> {
        let updated = self.repository.update(id, &update).await?;

        if updated.is_some() {
            let key = product_key(id);
            self.cache.invalidate(&[key.as_str(), ALL_PRODUCTS_KEY]);
            info!(%id, "Product updated");
        }
        Ok(updated)
    }

    // == Delete ==
    /// Deletes one product. `false` if the id is unknown.
    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let deleted = self.repository.delete(id).await?;

        if deleted {
            let key = product_key(id);
            self.cache.invalidate(&[key.as_str(), ALL_PRODUCTS_KEY]);
            info!(%id, "Product deleted");
        }
        Ok(deleted)
    }

    // == Clear Cache ==
    /// Invalidates the collection-level keys.
    ///
    /// Per-product entries are not enumerated and age out through their TTL.
    pub fn clear_cache(&self) -> usize {
        let removed = self.cache.invalidate(COLLECTION_KEYS);
        info!(removed, "Collection cache cleared");
        removed
    }

    /// Stores a loaded value unless a mutation invalidated its key while
    /// the store read was in flight.
    fn fill(&self, ticket: FillTicket, value: CachedValue, ttl: Duration) {
        let key = ticket.key().to_string();
        if !self.cache.complete_fill(ticket, value, ttl) {
            debug!(key = %key, "Key invalidated during load, not caching");
        }
    }

    fn discard_mismatch(&self, key: &str, found: &str) {
        warn!(key, found, "Cached value has the wrong shape, discarding");
        self.cache.invalidate(&[key]);
    }
}
