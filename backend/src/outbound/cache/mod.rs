//! Redis-backed hash store for the coupon cache.
//!
//! Implements [`CouponHashStore`] over a `bb8-redis` pool. Each coupon lives
//! in one Redis hash; the key layout is owned by
//! [`CouponCacheKey`](crate::domain::ports::CouponCacheKey).

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use bb8_redis::RedisConnectionManager;
use bb8_redis::bb8::{Pool, PooledConnection};
use bb8_redis::redis::AsyncCommands;

use crate::domain::ports::{CouponCacheKey, CouponHashStore, CouponHashStoreError};

/// `CouponHashStore` backed by a Redis connection pool.
#[derive(Clone)]
pub struct RedisCouponHashStore {
    pool: Pool<RedisConnectionManager>,
}

impl RedisCouponHashStore {
    /// Wrap an existing pool.
    pub fn new(pool: Pool<RedisConnectionManager>) -> Self {
        Self { pool }
    }

    /// Build a pool of at most `max_size` connections to `redis_url`.
    ///
    /// # Errors
    /// Returns [`CouponHashStoreError::Backend`] when the URL is invalid or
    /// the pool cannot be built.
    pub async fn connect(redis_url: &str, max_size: u32) -> Result<Self, CouponHashStoreError> {
        let manager = RedisConnectionManager::new(redis_url)
            .map_err(|err| CouponHashStoreError::backend(err.to_string()))?;
        let pool = Pool::builder()
            .max_size(max_size.max(1))
            .build(manager)
            .await
            .map_err(|err| CouponHashStoreError::backend(err.to_string()))?;
        Ok(Self::new(pool))
    }

    async fn connection(
        &self,
    ) -> Result<PooledConnection<'_, RedisConnectionManager>, CouponHashStoreError> {
        self.pool
            .get()
            .await
            .map_err(|err| CouponHashStoreError::backend(err.to_string()))
    }
}

fn map_redis_error(error: bb8_redis::redis::RedisError) -> CouponHashStoreError {
    CouponHashStoreError::backend(error.to_string())
}

/// Whole seconds for `EXPIRE`; a zero TTL would delete the key outright.
fn ttl_seconds(ttl: Duration) -> i64 {
    i64::try_from(ttl.as_secs().max(1)).unwrap_or(i64::MAX)
}

#[async_trait]
impl CouponHashStore for RedisCouponHashStore {
    async fn hash_get_all(
        &self,
        key: &CouponCacheKey,
    ) -> Result<HashMap<String, String>, CouponHashStoreError> {
        let mut conn = self.connection().await?;
        conn.hgetall(key.as_str()).await.map_err(map_redis_error)
    }

    async fn hash_set(
        &self,
        key: &CouponCacheKey,
        fields: &[(&'static str, String)],
    ) -> Result<(), CouponHashStoreError> {
        if fields.is_empty() {
            return Ok(());
        }
        let mut conn = self.connection().await?;
        let _: () = conn
            .hset_multiple(key.as_str(), fields)
            .await
            .map_err(map_redis_error)?;
        Ok(())
    }

    async fn expire(&self, key: &CouponCacheKey, ttl: Duration) -> Result<(), CouponHashStoreError> {
        let mut conn = self.connection().await?;
        let _: bool = conn
            .expire(key.as_str(), ttl_seconds(ttl))
            .await
            .map_err(map_redis_error)?;
        Ok(())
    }

    async fn delete(&self, key: &CouponCacheKey) -> Result<(), CouponHashStoreError> {
        let mut conn = self.connection().await?;
        let _: i64 = conn.del(key.as_str()).await.map_err(map_redis_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Duration::from_secs(3600), 3600)]
    #[case(Duration::from_millis(1500), 1)]
    #[case(Duration::ZERO, 1)]
    fn ttl_is_whole_positive_seconds(#[case] ttl: Duration, #[case] expected: i64) {
        assert_eq!(ttl_seconds(ttl), expected);
    }

    #[rstest]
    #[tokio::test]
    async fn connect_rejects_malformed_url() {
        let err = RedisCouponHashStore::connect("not a url", 1)
            .await
            .err()
            .expect("malformed URL rejected");
        assert!(matches!(err, CouponHashStoreError::Backend { .. }));
    }
}
