//! Coupon use-cases.
//!
//! [`CouponService`] implements the coupon driving ports on top of a
//! [`CouponRepository`] and keeps the [`CouponCache`] in step: reads populate
//! it on a miss, updates refresh it, deletes invalidate it. Cache work is
//! detached, so a cache outage never fails a request.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::PageParams;
use tracing::debug;

use crate::domain::coupon_cache::CouponCache;
use crate::domain::ports::{CouponRepository, CouponRepositoryError, CouponsCommand, CouponsQuery};
use crate::domain::{Coupon, CouponCode, CouponPage, CouponPatch, Error, NewCoupon};

/// Coupon service implementing [`CouponsCommand`] and [`CouponsQuery`].
#[derive(Clone)]
pub struct CouponService<R> {
    repo: Arc<R>,
    cache: CouponCache,
}

impl<R> CouponService<R> {
    /// Create a service over `repo` with `cache` in front of single reads.
    pub const fn new(repo: Arc<R>, cache: CouponCache) -> Self {
        Self { repo, cache }
    }
}

fn map_repository_error(error: CouponRepositoryError) -> Error {
    match error {
        CouponRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("coupon repository unavailable: {message}"))
        }
        CouponRepositoryError::Query { message } => {
            Error::internal(format!("coupon repository error: {message}"))
        }
        err @ CouponRepositoryError::NotFound { .. } => Error::not_found(err.to_string()),
        err @ CouponRepositoryError::Duplicate { .. } => Error::invalid_request(err.to_string()),
    }
}

fn not_found(code: &CouponCode) -> Error {
    map_repository_error(CouponRepositoryError::not_found(code.as_str()))
}

#[async_trait]
impl<R> CouponsCommand for CouponService<R>
where
    R: CouponRepository,
{
    async fn create(&self, coupon: NewCoupon) -> Result<Coupon, Error> {
        self.repo
            .create(&coupon)
            .await
            .map_err(map_repository_error)
    }

    async fn update(&self, code: CouponCode, patch: CouponPatch) -> Result<Coupon, Error> {
        let checked = patch.validate()?;
        let coupon = self
            .repo
            .update(&code, &checked)
            .await
            .map_err(map_repository_error)?;
        self.cache.refresh(&coupon);
        Ok(coupon)
    }

    async fn delete(&self, code: CouponCode) -> Result<(), Error> {
        self.repo
            .delete(&code)
            .await
            .map_err(map_repository_error)?;
        self.cache.invalidate(&code);
        Ok(())
    }
}

#[async_trait]
impl<R> CouponsQuery for CouponService<R>
where
    R: CouponRepository,
{
    async fn get(&self, code: &CouponCode) -> Result<Coupon, Error> {
        if let Some(coupon) = self.cache.lookup(code).await {
            debug!(code = %code, "coupon served from cache");
            return Ok(coupon);
        }
        let coupon = self
            .repo
            .find_by_code(code)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(code))?;
        self.cache.populate(&coupon);
        Ok(coupon)
    }

    async fn list(&self, page: PageParams, search: Option<String>) -> Result<CouponPage, Error> {
        let term = search
            .as_deref()
            .map(str::trim)
            .filter(|term| !term.is_empty());
        let result = match term {
            Some(term) => self.repo.search(term, page).await,
            None => self.repo.list(page).await,
        };
        result.map_err(map_repository_error)
    }
}

#[cfg(test)]
#[path = "coupon_service_tests.rs"]
mod tests;
