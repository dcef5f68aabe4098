//! Read-through cache for single-coupon lookups.
//!
//! Reads go through [`CouponCache::get`] or [`CouponCache::lookup`] on the
//! request path. Writes (`populate`, `refresh`, `invalidate`) are handed to
//! the [`TaskSpawner`] and never block or fail the caller; their outcome only
//! reaches the logs. The `*_now` variants are the awaited bodies of those
//! tasks.
//!
//! A cached entry is a flat string hash keyed by [`CouponCacheKey`]; see
//! [`fields`] for the mapping.

use std::sync::Arc;
use std::time::Duration;

use futures_util::FutureExt;
use tracing::{debug, error, warn};

use super::ports::{
    CouponCacheKey, CouponHashStore, CouponHashStoreError, TaskSpawner, define_port_error,
};
use super::{Coupon, CouponCode};

pub mod fields;

define_port_error! {
    /// Failures raised by cache reads and writes.
    pub enum CacheError {
        /// The hash store rejected or failed the command.
        Backend { message: String } => "coupon cache backend failure: {message}",
        /// A cached hash is missing a field or holds an unparseable value.
        Corrupt { field: String, message: String } =>
            "coupon cache entry corrupt at {field}: {message}",
    }
}

impl From<CouponHashStoreError> for CacheError {
    fn from(err: CouponHashStoreError) -> Self {
        match err {
            CouponHashStoreError::Backend { message } => Self::Backend { message },
        }
    }
}

/// Default time to live for cached coupons.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(3600);

/// Tunables for [`CouponCache`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheSettings {
    /// Time to live applied after every write.
    pub ttl: Duration,
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_CACHE_TTL,
        }
    }
}

/// Outcome of a cache read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheLookup {
    /// The coupon was cached.
    Hit(Coupon),
    /// Nothing is cached under the code.
    Miss,
}

/// Coupon cache over a hash store.
#[derive(Clone)]
pub struct CouponCache {
    store: Arc<dyn CouponHashStore>,
    spawner: Arc<dyn TaskSpawner>,
    settings: CacheSettings,
}

impl CouponCache {
    /// Build a cache writing through `store` and detaching work onto `spawner`.
    pub fn new(
        store: Arc<dyn CouponHashStore>,
        spawner: Arc<dyn TaskSpawner>,
        settings: CacheSettings,
    ) -> Self {
        Self {
            store,
            spawner,
            settings,
        }
    }

    /// Configured settings.
    #[must_use]
    pub const fn settings(&self) -> CacheSettings {
        self.settings
    }

    /// Read the cached coupon for `code`.
    ///
    /// An absent or empty hash is a miss.
    ///
    /// # Errors
    /// Returns [`CacheError::Backend`] when the store fails and
    /// [`CacheError::Corrupt`] when the hash cannot be decoded.
    pub async fn get(&self, code: &CouponCode) -> Result<CacheLookup, CacheError> {
        let key = CouponCacheKey::for_code(code);
        let hash = self.store.hash_get_all(&key).await?;
        if hash.is_empty() {
            return Ok(CacheLookup::Miss);
        }
        fields::decode(&hash).map(CacheLookup::Hit)
    }

    /// Request-path read: any cache failure is logged and treated as a miss.
    pub async fn lookup(&self, code: &CouponCode) -> Option<Coupon> {
        match self.get(code).await {
            Ok(CacheLookup::Hit(coupon)) => Some(coupon),
            Ok(CacheLookup::Miss) => None,
            Err(err) => {
                warn!(code = %code, error = %err, "coupon cache read failed; falling back to store");
                None
            }
        }
    }

    /// Cache `coupon` in the background after a store read.
    pub fn populate(&self, coupon: &Coupon) {
        self.spawn_write(coupon.clone(), "populate");
    }

    /// Overwrite the cached copy in the background after a store update.
    pub fn refresh(&self, coupon: &Coupon) {
        self.spawn_write(coupon.clone(), "refresh");
    }

    /// Drop the cached copy in the background after a store delete.
    pub fn invalidate(&self, code: &CouponCode) {
        let cache = self.clone();
        let target = code.clone();
        self.spawner.spawn(
            async move {
                match cache.invalidate_now(&target).await {
                    Ok(()) => debug!(code = %target, "coupon cache entry invalidated"),
                    Err(err) => {
                        error!(code = %target, error = %err, "coupon cache invalidation failed");
                    }
                }
            }
            .boxed(),
        );
    }

    /// Write every field of `coupon`, then set the TTL.
    ///
    /// When the TTL cannot be set the entry is removed so it cannot outlive
    /// the configured lifetime.
    ///
    /// # Errors
    /// Returns [`CacheError::Backend`] when either command fails.
    pub async fn populate_now(&self, coupon: &Coupon) -> Result<(), CacheError> {
        let key = CouponCacheKey::for_code(&coupon.code);
        self.store.hash_set(&key, &fields::encode(coupon)).await?;
        if let Err(err) = self.store.expire(&key, self.settings.ttl).await {
            if let Err(cleanup) = self.store.delete(&key).await {
                warn!(key = %key, error = %cleanup, "failed to drop cache entry without TTL");
            }
            return Err(err.into());
        }
        Ok(())
    }

    /// Awaited form of [`Self::refresh`].
    ///
    /// # Errors
    /// Same as [`Self::populate_now`].
    pub async fn refresh_now(&self, coupon: &Coupon) -> Result<(), CacheError> {
        self.populate_now(coupon).await
    }

    /// Remove the cached copy of `code`.
    ///
    /// # Errors
    /// Returns [`CacheError::Backend`] when the store fails.
    pub async fn invalidate_now(&self, code: &CouponCode) -> Result<(), CacheError> {
        let key = CouponCacheKey::for_code(code);
        self.store.delete(&key).await.map_err(CacheError::from)
    }

    fn spawn_write(&self, coupon: Coupon, action: &'static str) {
        let cache = self.clone();
        let ttl_secs = self.settings.ttl.as_secs();
        self.spawner.spawn(
            async move {
                match cache.populate_now(&coupon).await {
                    Ok(()) => debug!(code = %coupon.code, action, ttl_secs, "coupon cached"),
                    Err(err) => {
                        error!(code = %coupon.code, action, error = %err, "coupon cache write failed");
                    }
                }
            }
            .boxed(),
        );
    }
}

impl std::fmt::Debug for CouponCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CouponCache")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
