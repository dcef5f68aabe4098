//! Discount calculation for mock orders.
//!
//! Pure and deterministic: the same coupon and amount always produce the same
//! total. Results are clamped at zero but not rounded; callers decide the
//! scale they report at.

use rust_decimal::Decimal;

use super::coupon::{Coupon, CouponType};
use super::ports::define_port_error;

define_port_error! {
    /// Failures raised while pricing an order.
    pub enum DiscountError {
        /// The coupon's type has no pricing rule.
        InvalidCouponType { coupon_type: String } => "invalid coupon type: {coupon_type}",
        /// The discount does not fit in a decimal.
        Overflow { amount: String } => "discount overflowed for amount {amount}",
    }
}

const ONE_HUNDRED: Decimal = Decimal::ONE_HUNDRED;

/// Apply `coupon` to `amount`.
///
/// With no coupon the amount is returned unchanged. A fixed coupon subtracts
/// its value; a percentage coupon subtracts that share of the amount.
///
/// # Examples
/// ```
/// use coupon_backend::domain::discount::calculate_amount;
/// use rust_decimal::Decimal;
///
/// let amount = Decimal::new(100_000, 0);
/// assert_eq!(calculate_amount(None, amount), Ok(amount));
/// ```
///
/// # Errors
/// Returns [`DiscountError::InvalidCouponType`] for unsupported coupon types
/// and [`DiscountError::Overflow`] when the arithmetic leaves the decimal
/// range.
pub fn calculate_amount(coupon: Option<&Coupon>, amount: Decimal) -> Result<Decimal, DiscountError> {
    let Some(applied) = coupon else {
        return Ok(amount);
    };
    let overflow = || DiscountError::overflow(amount.to_string());
    let discount = match &applied.coupon_type {
        CouponType::Fixed => applied.value,
        CouponType::Percentage => applied
            .value
            .checked_div(ONE_HUNDRED)
            .and_then(|share| share.checked_mul(amount))
            .ok_or_else(overflow)?,
        CouponType::Unsupported(raw) => {
            return Err(DiscountError::invalid_coupon_type(raw.as_str()));
        }
    };
    let total = amount.checked_sub(discount).ok_or_else(overflow)?;
    Ok(total.max(Decimal::ZERO))
}

#[cfg(test)]
mod tests {
    //! Pricing scenarios for fixed and percentage coupons.
    use super::*;
    use crate::test_support::sample_coupon;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn priced(coupon_type: CouponType, value: Decimal) -> Coupon {
        Coupon {
            coupon_type,
            value,
            ..sample_coupon("PRICE")
        }
    }

    #[rstest]
    #[case(CouponType::Fixed, dec!(15000), dec!(100000), dec!(85000))]
    #[case(CouponType::Fixed, dec!(15000), dec!(10000), dec!(0))]
    #[case(CouponType::Fixed, dec!(100000), dec!(100000), dec!(0))]
    #[case(CouponType::Percentage, dec!(20), dec!(100000), dec!(80000))]
    #[case(CouponType::Percentage, dec!(20), dec!(10000), dec!(8000))]
    #[case(CouponType::Percentage, dec!(100), dec!(100000), dec!(0))]
    #[case(CouponType::Percentage, dec!(150), dec!(100000), dec!(0))]
    #[case(CouponType::Percentage, dec!(12.5), dec!(99.99), dec!(87.49125))]
    #[case(CouponType::Fixed, dec!(0.10), dec!(0.30), dec!(0.20))]
    #[case(CouponType::Fixed, dec!(0.01), dec!(10.005), dec!(9.995))]
    fn applies_coupon(
        #[case] coupon_type: CouponType,
        #[case] value: Decimal,
        #[case] amount: Decimal,
        #[case] expected: Decimal,
    ) {
        let coupon = priced(coupon_type, value);
        assert_eq!(calculate_amount(Some(&coupon), amount), Ok(expected));
    }

    #[rstest]
    fn returns_amount_without_coupon() {
        assert_eq!(calculate_amount(None, dec!(42.50)), Ok(dec!(42.50)));
    }

    #[rstest]
    fn rejects_unsupported_type() {
        let coupon = priced(CouponType::Unsupported("bogo".to_owned()), dec!(5));
        let err = calculate_amount(Some(&coupon), dec!(100)).expect_err("unsupported type");
        assert_eq!(err, DiscountError::invalid_coupon_type("bogo"));
        assert_eq!(err.to_string(), "invalid coupon type: bogo");
    }

    #[rstest]
    fn percentage_keeps_sub_cent_precision() {
        // 10% of 0.05 is 0.005, leaving 0.045.
        let coupon = priced(CouponType::Percentage, dec!(10));
        assert_eq!(calculate_amount(Some(&coupon), dec!(0.05)), Ok(dec!(0.045)));
    }

    #[rstest]
    #[case(CouponType::Percentage, dec!(150), Decimal::MAX)]
    #[case(CouponType::Fixed, dec!(1), Decimal::MIN)]
    fn overflow_is_an_error(
        #[case] coupon_type: CouponType,
        #[case] value: Decimal,
        #[case] amount: Decimal,
    ) {
        let coupon = priced(coupon_type, value);
        let err = calculate_amount(Some(&coupon), amount).expect_err("overflow");
        assert_eq!(err, DiscountError::overflow(amount.to_string()));
    }
}
