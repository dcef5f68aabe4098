//! Driving port for coupon reads.

use async_trait::async_trait;
use pagination::PageParams;

use crate::domain::{Coupon, CouponCode, CouponPage, Error};

/// Driving port for coupon lookups and listings.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CouponsQuery: Send + Sync {
    /// Fetch one coupon, consulting the cache before the store.
    ///
    /// # Errors
    /// Returns `not_found` when no coupon has the code, or a store failure.
    async fn get(&self, code: &CouponCode) -> Result<Coupon, Error>;

    /// Page through coupons, optionally filtered by a code substring.
    ///
    /// # Errors
    /// Returns a store failure.
    async fn list(&self, page: PageParams, search: Option<String>) -> Result<CouponPage, Error>;
}
