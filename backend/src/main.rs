//! Backend entry-point: loads settings, prepares adapters, and serves the REST API.

mod server;

use std::sync::Arc;

use actix_web::web;
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use coupon_backend::inbound::http::health::HealthState;
use coupon_backend::outbound::cache::RedisCouponHashStore;
use coupon_backend::outbound::persistence::{DbPool, PoolConfig, run_pending_migrations};
use coupon_backend::settings::AppSettings;
use server::{ServerConfig, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = AppSettings::load_from_iter(std::env::args_os())
        .map_err(|e| std::io::Error::other(format!("failed to load settings: {e}")))?;
    let bind_addr = settings
        .bind_addr()
        .map_err(|e| std::io::Error::other(format!("invalid bind address: {e}")))?;

    let mut config = ServerConfig::new(bind_addr)
        .with_cache_settings(settings.cache_settings())
        .with_seed_count(settings.seed_count());

    if let Some(database_url) = settings.database_url.clone() {
        if settings.run_migrations {
            migrate(database_url.clone()).await?;
        }
        let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.db_pool_max))
            .await
            .map_err(|e| std::io::Error::other(format!("database pool: {e}")))?;
        config = config.with_db_pool(pool);
    }

    if let Some(redis_url) = settings.redis_url.as_deref() {
        let store = RedisCouponHashStore::connect(redis_url, settings.redis_pool_max)
            .await
            .map_err(|e| std::io::Error::other(format!("redis pool: {e}")))?;
        config = config.with_hash_store(Arc::new(store));
    }

    let health_state = web::Data::new(HealthState::new());
    info!(%bind_addr, "starting coupon backend");
    create_server(health_state, config).await?.await
}

async fn migrate(database_url: String) -> std::io::Result<()> {
    tokio::task::spawn_blocking(move || run_pending_migrations(&database_url))
        .await
        .map_err(|e| std::io::Error::other(format!("migration task failed: {e}")))?
        .map_err(|e| std::io::Error::other(e.to_string()))
}
