//! Cache key naming and TTL policy
//!
//! One key per product (`product-{id}`) and one fixed key per collection-level
//! read (`all-products`).

use std::time::Duration;

use uuid::Uuid;

/// Key of the full product listing.
pub const ALL_PRODUCTS_KEY: &str = "all-products";

/// Every collection-level key. These are the only keys a full clear can name
/// without knowing product identifiers.
pub const COLLECTION_KEYS: &[&str] = &[ALL_PRODUCTS_KEY];

const PRODUCT_KEY_PREFIX: &str = "product-";

/// Key of a single product.
pub fn product_key(id: Uuid) -> String {
    format!("{PRODUCT_KEY_PREFIX}{id}")
}

// == TTL Policy ==
/// Expiry horizons for item and listing entries.
///
/// TTL only bounds staleness when an invalidation is missed; mutations
/// invalidate explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TtlPolicy {
    pub item: Duration,
    pub listing: Duration,
}

impl TtlPolicy {
    pub fn new(item: Duration, listing: Duration) -> Self {
        Self { item, listing }
    }
}

impl Default for TtlPolicy {
    fn default() -> Self {
        Self {
            item: Duration::from_secs(30 * 60),
            listing: Duration::from_secs(15 * 60),
        }
    }
}
