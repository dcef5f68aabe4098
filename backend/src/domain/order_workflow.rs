//! Mock order pricing.
//!
//! Orders are priced against the coupon they name: the coupon is read
//! (cache first), checked for expiry against the order's own timestamp, and
//! applied by the discount engine. The discounted total is reported in cents.
//! Every failure is reported to the client as a bad request.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::discount::calculate_amount;
use crate::domain::ports::{CouponsQuery, MockOrderCommand, OrderRequest, OrderResult};
use crate::domain::validator::validate;
use crate::domain::{Coupon, CouponCode, Error, round_money};

/// Message returned when the named coupon cannot be read.
pub const COUPON_NOT_FOUND: &str = "Coupon not found";
/// Message returned when the coupon cannot be priced.
pub const CALCULATION_FAILED: &str = "Failed to calculate total amount";

/// Order workflow implementing [`MockOrderCommand`].
#[derive(Clone)]
pub struct MockOrderService {
    coupons: Arc<dyn CouponsQuery>,
}

impl MockOrderService {
    /// Create a workflow reading coupons through `coupons`.
    pub fn new(coupons: Arc<dyn CouponsQuery>) -> Self {
        Self { coupons }
    }

    async fn applicable_coupon(
        &self,
        code: &CouponCode,
        request: &OrderRequest,
    ) -> Result<Coupon, Error> {
        let coupon = self.coupons.get(code).await.map_err(|err| {
            warn!(code = %code, error = %err, "coupon lookup failed for mock order");
            Error::invalid_request(COUPON_NOT_FOUND)
        })?;
        validate(&coupon, request.created_at()).map_err(|err| {
            warn!(code = %code, error = %err, "coupon rejected for mock order");
            Error::invalid_request(err.to_string())
        })?;
        Ok(coupon)
    }
}

#[async_trait]
impl MockOrderCommand for MockOrderService {
    async fn create_mock_order(&self, request: OrderRequest) -> Result<OrderResult, Error> {
        let Some(code) = request.coupon_code() else {
            return Ok(OrderResult {
                cost: request.cost(),
                created_at: request.created_at(),
                coupon_code: None,
                total_amount: request.cost(),
                coupon: None,
            });
        };

        let coupon = self.applicable_coupon(code, &request).await?;
        let total_amount = calculate_amount(Some(&coupon), request.cost())
            .map(round_money)
            .map_err(|err| {
                warn!(code = %code, error = %err, "mock order pricing failed");
                Error::invalid_request(CALCULATION_FAILED)
            })?;

        Ok(OrderResult {
            cost: request.cost(),
            created_at: request.created_at(),
            coupon_code: Some(code.clone()),
            total_amount,
            coupon: Some(coupon),
        })
    }
}
