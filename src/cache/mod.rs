//! Cache Module
//!
//! Provides the in-memory cache used by the product service: TTL expiry,
//! explicit invalidation, key naming and TTL policy.

mod entry;
pub mod keys;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, CachedValue};
pub use keys::{product_key, TtlPolicy, ALL_PRODUCTS_KEY, COLLECTION_KEYS};
pub use stats::CacheStats;
pub use store::{CacheStore, FillTicket};
