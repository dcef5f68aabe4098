//! Builders wiring outbound adapters into the HTTP state.

use std::sync::Arc;

use actix_web::web;
use mockable::DefaultClock;
use tracing::info;

use coupon_backend::domain::ports::{CouponHashStore, CouponRepository};
use coupon_backend::domain::{CouponCache, CouponService, MockOrderService};
use coupon_backend::inbound::http::state::HttpState;
use coupon_backend::outbound::memory::{InMemoryCouponHashStore, InMemoryCouponRepository};
use coupon_backend::outbound::persistence::DieselCouponRepository;
use coupon_backend::outbound::tasks::TokioTaskSpawner;

use super::ServerConfig;

/// Wire one coupon service as both driving ports and as the order workflow's
/// coupon source.
fn coupon_state<R>(repo: Arc<R>, cache: CouponCache) -> HttpState
where
    R: CouponRepository + 'static,
{
    let service = Arc::new(CouponService::new(repo, cache));
    let orders = Arc::new(MockOrderService::new(service.clone()));
    HttpState::new(service.clone(), service, orders)
}

fn build_cache(config: &ServerConfig) -> CouponCache {
    let store: Arc<dyn CouponHashStore> = match &config.hash_store {
        Some(store) => store.clone(),
        None => {
            info!("no redis url configured; caching coupons in memory");
            Arc::new(InMemoryCouponHashStore::new(Arc::new(DefaultClock)))
        }
    };
    CouponCache::new(store, Arc::new(TokioTaskSpawner), config.cache_settings)
}

/// Build the shared HTTP state, preferring the Postgres repository when a pool
/// is configured.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let cache = build_cache(config);
    let state = match &config.db_pool {
        Some(pool) => coupon_state(Arc::new(DieselCouponRepository::new(pool.clone())), cache),
        None => {
            info!("no database url configured; storing coupons in memory");
            coupon_state(
                Arc::new(InMemoryCouponRepository::new(Arc::new(DefaultClock))),
                cache,
            )
        }
    };
    web::Data::new(state)
}
