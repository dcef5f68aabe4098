//! HTTP server configuration object and helpers.

use std::net::SocketAddr;
use std::sync::Arc;

use coupon_backend::domain::CacheSettings;
use coupon_backend::domain::ports::CouponHashStore;
use coupon_backend::outbound::persistence::DbPool;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) hash_store: Option<Arc<dyn CouponHashStore>>,
    pub(crate) cache_settings: CacheSettings,
    pub(crate) seed_count: Option<usize>,
}

impl ServerConfig {
    /// Construct a configuration with in-process adapters and default cache
    /// settings.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            db_pool: None,
            hash_store: None,
            cache_settings: CacheSettings::default(),
            seed_count: None,
        }
    }

    /// Attach a database connection pool for the coupon repository.
    ///
    /// Without one the server keeps coupons in memory.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Attach the hash store backing the coupon cache.
    #[must_use]
    pub fn with_hash_store(mut self, store: Arc<dyn CouponHashStore>) -> Self {
        self.hash_store = Some(store);
        self
    }

    /// Override the cache tunables.
    #[must_use]
    pub fn with_cache_settings(mut self, settings: CacheSettings) -> Self {
        self.cache_settings = settings;
        self
    }

    /// Store `count` demo coupons before binding; `None` skips seeding.
    #[must_use]
    pub fn with_seed_count(mut self, count: Option<usize>) -> Self {
        self.seed_count = count;
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
