//! Driving port for pricing mock orders.
//!
//! A mock order is never stored: the service prices it against an optional
//! coupon and echoes the inputs alongside the computed total.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::{Coupon, CouponCode, Error, MAX_MONEY, round_money};

/// Validation errors for [`OrderRequest`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OrderRequestError {
    /// `cost` is zero or negative once rounded to cents.
    #[error("cost must be greater than zero")]
    NonPositiveCost,
    /// `cost` exceeds [`MAX_MONEY`].
    #[error("cost must not exceed 99999999.99")]
    CostOutOfRange,
}

/// Order to price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    cost: Decimal,
    created_at: DateTime<Utc>,
    coupon_code: Option<CouponCode>,
}

impl OrderRequest {
    /// Validate an order.
    ///
    /// `created_at` is the instant used for the coupon expiry check. `cost`
    /// is rounded to cents, the same scale coupon values are stored at.
    ///
    /// # Errors
    /// Returns [`OrderRequestError::NonPositiveCost`] when the rounded cost is
    /// not positive and [`OrderRequestError::CostOutOfRange`] when it exceeds
    /// [`MAX_MONEY`].
    pub fn try_new(
        cost: Decimal,
        created_at: DateTime<Utc>,
        coupon_code: Option<CouponCode>,
    ) -> Result<Self, OrderRequestError> {
        let cents = round_money(cost);
        if cents <= Decimal::ZERO {
            return Err(OrderRequestError::NonPositiveCost);
        }
        if cents > MAX_MONEY {
            return Err(OrderRequestError::CostOutOfRange);
        }
        Ok(Self {
            cost: cents,
            created_at,
            coupon_code,
        })
    }

    /// Amount before discount.
    #[must_use]
    pub const fn cost(&self) -> Decimal {
        self.cost
    }

    /// Order timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Coupon to apply, if any.
    #[must_use]
    pub const fn coupon_code(&self) -> Option<&CouponCode> {
        self.coupon_code.as_ref()
    }
}

/// Priced order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderResult {
    /// Amount before discount.
    pub cost: Decimal,
    /// Order timestamp, echoed.
    pub created_at: DateTime<Utc>,
    /// Coupon code, echoed when supplied.
    pub coupon_code: Option<CouponCode>,
    /// Amount after discount.
    pub total_amount: Decimal,
    /// Snapshot of the applied coupon.
    pub coupon: Option<Coupon>,
}

/// Driving port for mock order pricing.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MockOrderCommand: Send + Sync {
    /// Price `request`, applying its coupon when one is named.
    ///
    /// # Errors
    /// Every failure is `invalid_request`: unknown coupon, expired coupon, or a
    /// coupon type that cannot be priced.
    async fn create_mock_order(&self, request: OrderRequest) -> Result<OrderResult, Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-10))]
    #[case(dec!(0.004))]
    fn order_rejects_non_positive_cost(#[case] cost: Decimal) {
        let result = OrderRequest::try_new(cost, Utc::now(), None);
        assert_eq!(result, Err(OrderRequestError::NonPositiveCost));
    }

    #[rstest]
    #[case(MAX_MONEY + dec!(0.01))]
    #[case(Decimal::MAX)]
    fn order_rejects_cost_beyond_storage_range(#[case] cost: Decimal) {
        let result = OrderRequest::try_new(cost, Utc::now(), None);
        assert_eq!(result, Err(OrderRequestError::CostOutOfRange));
        assert_eq!(
            OrderRequestError::CostOutOfRange.to_string(),
            "cost must not exceed 99999999.99"
        );
    }

    #[rstest]
    #[case(dec!(10.005), dec!(10.01))]
    #[case(dec!(10.004), dec!(10.00))]
    #[case(MAX_MONEY, MAX_MONEY)]
    fn order_cost_is_rounded_to_cents(#[case] cost: Decimal, #[case] expected: Decimal) {
        let order = OrderRequest::try_new(cost, Utc::now(), None).expect("valid cost");
        assert_eq!(order.cost(), expected);
    }
}
