//! Driving port for coupon mutations.
//!
//! HTTP handlers call [`CouponsCommand`] to create, change, and remove coupons.
//! Implementations keep the read-through cache in step with the store.

use async_trait::async_trait;

use crate::domain::{Coupon, CouponCode, CouponPatch, Error, NewCoupon};

/// Driving port for coupon writes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CouponsCommand: Send + Sync {
    /// Store a new coupon.
    ///
    /// # Errors
    /// Returns `invalid_request` when the code already exists, or a store
    /// failure.
    async fn create(&self, coupon: NewCoupon) -> Result<Coupon, Error>;

    /// Apply a partial update and refresh the cached copy.
    ///
    /// # Errors
    /// Returns `not_found` when no coupon has the code, `invalid_request` when
    /// the patch breaks a coupon rule, or a store failure.
    async fn update(&self, code: CouponCode, patch: CouponPatch) -> Result<Coupon, Error>;

    /// Delete a coupon and drop its cached copy.
    ///
    /// # Errors
    /// Returns `not_found` when no coupon has the code, or a store failure.
    async fn delete(&self, code: CouponCode) -> Result<(), Error>;
}
