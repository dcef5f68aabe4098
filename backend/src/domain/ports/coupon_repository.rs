//! Port for coupon persistence.
//!
//! The repository is the source of truth. Adapters assign `created_at` and
//! `updated_at` themselves; callers never supply timestamps.

use async_trait::async_trait;
use pagination::PageParams;

use crate::domain::{Coupon, CouponCode, CouponPage, CouponPatch, NewCoupon};

use super::define_port_error;

define_port_error! {
    /// Errors raised by coupon repository adapters.
    pub enum CouponRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "coupon repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "coupon repository query failed: {message}",
        /// No coupon is stored under the code.
        NotFound { code: String } => "Coupon with ID {code} not found",
        /// A coupon with the same code already exists.
        Duplicate { code: String } => "Coupon with code {code} already exists",
    }
}

/// Port for coupon storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CouponRepository: Send + Sync {
    /// Insert a new coupon and return the stored record.
    ///
    /// Fails with [`CouponRepositoryError::Duplicate`] when the code is taken.
    async fn create(&self, coupon: &NewCoupon) -> Result<Coupon, CouponRepositoryError>;

    /// Fetch a coupon by code; `None` when absent.
    async fn find_by_code(
        &self,
        code: &CouponCode,
    ) -> Result<Option<Coupon>, CouponRepositoryError>;

    /// Apply the supplied fields, refresh `updated_at`, and return the
    /// re-read record.
    ///
    /// Fails with [`CouponRepositoryError::NotFound`] when the code is absent.
    async fn update(
        &self,
        code: &CouponCode,
        patch: &CouponPatch,
    ) -> Result<Coupon, CouponRepositoryError>;

    /// Remove a coupon.
    ///
    /// Fails with [`CouponRepositoryError::NotFound`] when nothing was deleted.
    async fn delete(&self, code: &CouponCode) -> Result<(), CouponRepositoryError>;

    /// Page through all coupons ordered by code.
    async fn list(&self, page: PageParams) -> Result<CouponPage, CouponRepositoryError>;

    /// Page through coupons whose code contains `term`, ordered by code.
    async fn search(
        &self,
        term: &str,
        page: PageParams,
    ) -> Result<CouponPage, CouponRepositoryError>;
}
