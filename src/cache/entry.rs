//! Cache Entry Module
//!
//! Defines cached values and the entry wrapper carrying their expiry horizon.

use std::time::{Duration, Instant};

use crate::models::Product;

// == Cached Value ==
/// What a cache entry can hold. "Not found" is never cached.
#[derive(Debug, Clone, PartialEq)]
pub enum CachedValue {
    /// A single product, stored under an item key
    Product(Product),
    /// An ordered product listing, stored under a collection key
    Products(Vec<Product>),
}

impl CachedValue {
    /// Short name of the variant, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            CachedValue::Product(_) => "product",
            CachedValue::Products(_) => "products",
        }
    }
}

// == Cache Entry ==
/// Represents a single cache entry with value and expiry.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: CachedValue,
    /// When the entry stops being served
    pub expires_at: Instant,
}

/// Horizon used when `now + ttl` is not representable.
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry that expires `ttl` from now.
    ///
    /// A TTL too large for the platform clock is capped at about a century.
    pub fn new(value: CachedValue, ttl: Duration) -> Self {
        let now = Instant::now();
        let expires_at = now
            .checked_add(ttl)
            .or_else(|| now.checked_add(FAR_FUTURE))
            .unwrap_or(now);
        Self { value, expires_at }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches the expiration
    /// time, so a TTL of zero is expired immediately.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Price;
    use chrono::Utc;
    use std::thread::sleep;
    use uuid::Uuid;

    fn sample_value() -> CachedValue {
        CachedValue::Product(Product {
            id: Uuid::new_v4(),
            name: "Widget".to_string(),
            price: Price::from_cents(999),
            created_at: Utc::now(),
            description: None,
        })
    }

    #[test]
    fn test_entry_creation() {
        let before = Instant::now();
        let entry = CacheEntry::new(sample_value(), Duration::from_secs(60));

        assert!(!entry.is_expired());
        assert!(entry.expires_at >= before + Duration::from_secs(60));
        assert_eq!(entry.value.kind(), "product");
    }

    #[test]
    fn test_entry_expiration() {
        let entry = CacheEntry::new(sample_value(), Duration::from_millis(30));

        assert!(!entry.is_expired());

        sleep(Duration::from_millis(50));

        assert!(entry.is_expired());
    }

    #[test]
    fn test_huge_ttl_does_not_overflow() {
        let entry = CacheEntry::new(sample_value(), Duration::from_secs(u64::MAX));

        assert!(!entry.is_expired());
        assert!(entry.expires_at > Instant::now() + Duration::from_secs(365 * 24 * 60 * 60));

        let entry = CacheEntry::new(sample_value(), Duration::MAX);
        assert!(!entry.is_expired());
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new(sample_value(), Duration::ZERO);

        // Entry should be expired when current time >= expires_at
        assert!(entry.is_expired_at(entry.expires_at), "Entry should be expired at boundary");
        assert!(entry.is_expired());
    }
}
