//! Service configuration loaded via OrthoConfig.
//!
//! Values come from `COUPON_*` environment variables, CLI flags, or a config
//! file. Optional URLs select the outbound adapters: without them the server
//! falls back to in-process storage.

use std::net::{AddrParseError, SocketAddr};
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::{CacheSettings, DEFAULT_SEED_COUNT};

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Runtime settings for the coupon service.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "COUPON")]
pub struct AppSettings {
    /// Socket address the HTTP server listens on.
    pub bind_addr: Option<String>,
    /// PostgreSQL connection string.
    pub database_url: Option<String>,
    /// Maximum number of pooled database connections.
    #[ortho_config(default = 10)]
    pub db_pool_max: u32,
    /// Redis connection string for the coupon cache.
    pub redis_url: Option<String>,
    /// Maximum number of pooled Redis connections.
    #[ortho_config(default = 10)]
    pub redis_pool_max: u32,
    /// Time to live for cached coupons, in seconds.
    #[ortho_config(default = 3600)]
    pub cache_ttl_secs: u64,
    /// Apply pending migrations before serving.
    #[ortho_config(default = true)]
    pub run_migrations: bool,
    /// Store the demo `TEST{n}` coupons before serving.
    #[ortho_config(default = false)]
    pub seed_coupons: bool,
    /// Number of demo coupons to store when seeding is enabled.
    pub seed_count: Option<usize>,
}

impl AppSettings {
    /// Return the configured bind address, falling back to the default.
    ///
    /// # Errors
    /// Returns [`AddrParseError`] when the configured value is not a socket
    /// address.
    pub fn bind_addr(&self) -> Result<SocketAddr, AddrParseError> {
        self.bind_addr.as_deref().unwrap_or(DEFAULT_BIND_ADDR).parse()
    }

    /// Number of demo coupons to seed, or `None` when seeding is disabled.
    #[must_use]
    pub fn seed_count(&self) -> Option<usize> {
        self.seed_coupons
            .then(|| self.seed_count.unwrap_or(DEFAULT_SEED_COUNT))
    }

    /// Cache tunables derived from these settings.
    #[must_use]
    pub fn cache_settings(&self) -> CacheSettings {
        CacheSettings {
            ttl: Duration::from_secs(self.cache_ttl_secs),
        }
    }
}
