//! Port for the key-value store backing the coupon cache.
//!
//! Coupons are cached as flat string hashes. The store knows nothing about
//! coupons; encoding lives in [`crate::domain::coupon_cache`].

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;

use super::{CouponCacheKey, define_port_error};

define_port_error! {
    /// Errors surfaced by hash store adapters.
    pub enum CouponHashStoreError {
        /// Backend is unavailable, timing out, or rejected the command.
        Backend { message: String } => "cache backend failure: {message}",
    }
}

/// Hash-oriented cache backend (HGETALL, HSET, EXPIRE, DEL).
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CouponHashStore: Send + Sync {
    /// Read every field of the hash; empty when the key is absent.
    async fn hash_get_all(
        &self,
        key: &CouponCacheKey,
    ) -> Result<HashMap<String, String>, CouponHashStoreError>;

    /// Write the given fields into the hash, creating it if needed.
    async fn hash_set(
        &self,
        key: &CouponCacheKey,
        fields: &[(&'static str, String)],
    ) -> Result<(), CouponHashStoreError>;

    /// Set the key's time to live.
    async fn expire(&self, key: &CouponCacheKey, ttl: Duration) -> Result<(), CouponHashStoreError>;

    /// Remove the key. Deleting an absent key succeeds.
    async fn delete(&self, key: &CouponCacheKey) -> Result<(), CouponHashStoreError>;
}
