//! Coupon applicability checks.

use chrono::{DateTime, Utc};

use super::coupon::Coupon;
use super::ports::define_port_error;

define_port_error! {
    /// Reasons a coupon cannot be applied to an order.
    pub enum ValidationError {
        /// The order was placed after the coupon's expiry instant.
        CouponExpired { code: String, expired_at: DateTime<Utc> } => "coupon {code} is expired",
    }
}

/// Check that `coupon` may be applied to an order created at `order_created_at`.
///
/// The order's own timestamp stands in for "now", so results do not depend on
/// the wall clock. An order placed exactly at the expiry instant passes.
/// `usage` is not checked.
///
/// # Errors
/// Returns [`ValidationError::CouponExpired`] when the order is later than the
/// coupon's expiry.
pub fn validate(coupon: &Coupon, order_created_at: DateTime<Utc>) -> Result<(), ValidationError> {
    if order_created_at > coupon.expires_at {
        return Err(ValidationError::coupon_expired(
            coupon.code.as_str(),
            coupon.expires_at,
        ));
    }
    Ok(())
}
