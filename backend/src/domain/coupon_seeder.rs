//! Demo coupon seeding.
//!
//! Generates a deterministic batch of `TEST{n}` coupons and stores them
//! through [`CouponsCommand`]. Codes that already exist are counted and left
//! untouched, so seeding can run on every start.

use std::sync::Arc;

use chrono::{DateTime, TimeDelta, Utc};
use mockable::Clock;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::ports::CouponsCommand;
use crate::domain::{
    CouponCode, CouponCodeError, CouponDetails, CouponInputError, CouponType, CouponUsage, Error,
    ErrorCode, NewCoupon,
};

/// Number of coupons seeded when no count is configured.
pub const DEFAULT_SEED_COUNT: usize = 72;

const SEED_LIFETIME_DAYS: i64 = 10;
const SEED_VALUE_STEP: Decimal = Decimal::TEN;

/// Tally of a seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedOutcome {
    /// Coupons stored by this run.
    pub created: usize,
    /// Coupons whose code was already taken.
    pub existing: usize,
}

/// Errors raised while seeding demo coupons.
#[derive(Debug, Error)]
pub enum CouponSeedingError {
    /// A generated code was rejected.
    #[error("seed coupon code {code} is invalid: {source}")]
    Code {
        /// Offending code.
        code: String,
        /// Validation failure.
        #[source]
        source: CouponCodeError,
    },
    /// A generated coupon broke a coupon rule.
    #[error("seed coupon {code} is invalid: {source}")]
    Input {
        /// Offending code.
        code: String,
        /// Validation failure.
        #[source]
        source: CouponInputError,
    },
    /// The store refused a seed coupon for a reason other than a duplicate.
    #[error("failed to store seed coupon {code}: {source}")]
    Persistence {
        /// Offending code.
        code: String,
        /// Store failure.
        #[source]
        source: Error,
    },
}

/// Build `count` demo coupons expiring ten days after `now`.
///
/// Coupon `n` (from 1) is worth `n * 10`. Even numbers are fixed and manual;
/// odd numbers are percentage and auto.
///
/// # Errors
/// Returns [`CouponSeedingError`] when a generated coupon fails validation,
/// which happens once `n * 10` leaves the storable range.
pub fn seed_coupons(count: usize, now: DateTime<Utc>) -> Result<Vec<NewCoupon>, CouponSeedingError> {
    let expires_at = now + TimeDelta::days(SEED_LIFETIME_DAYS);
    (1..=count)
        .map(|index| seed_coupon(index, expires_at))
        .collect()
}

fn seed_coupon(index: usize, expires_at: DateTime<Utc>) -> Result<NewCoupon, CouponSeedingError> {
    let raw = format!("TEST{index}");
    let code = CouponCode::new(raw.as_str()).map_err(|source| CouponSeedingError::Code {
        code: raw.clone(),
        source,
    })?;
    let (coupon_type, usage) = if index % 2 == 0 {
        (CouponType::Fixed, CouponUsage::Manual)
    } else {
        (CouponType::Percentage, CouponUsage::Auto)
    };
    let value = Decimal::from(index)
        .checked_mul(SEED_VALUE_STEP)
        .ok_or_else(|| CouponSeedingError::Input {
            code: raw.clone(),
            source: CouponInputError::ValueOutOfRange,
        })?;
    let details = CouponDetails {
        title: format!("Test Coupon {index}"),
        description: format!("Description for Test Coupon {index}"),
        coupon_type,
        usage,
        value,
        expires_at,
    };
    NewCoupon::try_new(code, details).map_err(|source| CouponSeedingError::Input { code: raw, source })
}

/// Stores demo coupons through the coupon command port.
#[derive(Clone)]
pub struct CouponSeeder {
    coupons: Arc<dyn CouponsCommand>,
    clock: Arc<dyn Clock>,
}

impl CouponSeeder {
    /// Create a seeder writing through `coupons` and dating expiry from `clock`.
    pub fn new(coupons: Arc<dyn CouponsCommand>, clock: Arc<dyn Clock>) -> Self {
        Self { coupons, clock }
    }

    /// Store `count` demo coupons, skipping codes that already exist.
    ///
    /// # Errors
    /// Returns [`CouponSeedingError`] when a coupon cannot be generated or the
    /// store fails for any reason other than a duplicate code.
    pub async fn seed(&self, count: usize) -> Result<SeedOutcome, CouponSeedingError> {
        let batch = seed_coupons(count, self.clock.utc())?;
        let mut outcome = SeedOutcome::default();
        for coupon in batch {
            let code = coupon.code().to_string();
            match self.coupons.create(coupon).await {
                Ok(_) => outcome.created += 1,
                Err(err) if err.code() == ErrorCode::InvalidRequest => {
                    debug!(code = %code, "seed coupon already exists");
                    outcome.existing += 1;
                }
                Err(source) => return Err(CouponSeedingError::Persistence { code, source }),
            }
        }
        info!(
            created = outcome.created,
            existing = outcome.existing,
            "coupon seeding finished"
        );
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for demo coupon seeding.

    use super::*;
    use crate::domain::ports::MockCouponsCommand;
    use crate::test_support::{MutableClock, sample_timestamp};
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn seeder(command: MockCouponsCommand) -> CouponSeeder {
        CouponSeeder::new(
            Arc::new(command),
            Arc::new(MutableClock::new(sample_timestamp())),
        )
    }

    #[rstest]
    fn generates_alternating_coupons() {
        let now = sample_timestamp();
        let batch = seed_coupons(DEFAULT_SEED_COUNT, now).expect("valid batch");
        assert_eq!(batch.len(), 72);

        let first = batch.first().expect("first coupon");
        assert_eq!(first.code().as_str(), "TEST1");
        assert_eq!(first.details().title, "Test Coupon 1");
        assert_eq!(first.details().description, "Description for Test Coupon 1");
        assert_eq!(first.details().coupon_type, CouponType::Percentage);
        assert_eq!(first.details().usage, CouponUsage::Auto);
        assert_eq!(first.details().value, dec!(10));
        assert_eq!(first.details().expires_at, now + TimeDelta::days(10));

        let last = batch.last().expect("last coupon");
        assert_eq!(last.code().as_str(), "TEST72");
        assert_eq!(last.details().coupon_type, CouponType::Fixed);
        assert_eq!(last.details().usage, CouponUsage::Manual);
        assert_eq!(last.details().value, dec!(720));
    }

    #[rstest]
    fn zero_count_generates_nothing() {
        let batch = seed_coupons(0, sample_timestamp()).expect("empty batch");
        assert!(batch.is_empty());
    }

    #[rstest]
    fn oversized_batch_is_rejected() {
        // 10_000_000 * 10 exceeds the storable range.
        let err = seed_coupon(10_000_000, sample_timestamp()).expect_err("too large");
        assert!(matches!(
            err,
            CouponSeedingError::Input {
                source: CouponInputError::ValueOutOfRange,
                ..
            }
        ));
    }

    #[rstest]
    #[tokio::test]
    async fn counts_created_and_existing_codes() {
        let mut command = MockCouponsCommand::new();
        command.expect_create().times(3).returning(|coupon| {
            if coupon.code().as_str() == "TEST2" {
                Err(Error::invalid_request("Coupon with code TEST2 already exists"))
            } else {
                Ok(coupon.into_coupon(sample_timestamp()))
            }
        });

        let outcome = seeder(command).seed(3).await.expect("seeded");
        assert_eq!(
            outcome,
            SeedOutcome {
                created: 2,
                existing: 1,
            }
        );
    }

    #[rstest]
    #[tokio::test]
    async fn store_failure_stops_seeding() {
        let mut command = MockCouponsCommand::new();
        command
            .expect_create()
            .times(1)
            .returning(|_| Err(Error::service_unavailable("coupon repository unavailable")));

        let err = seeder(command).seed(3).await.expect_err("store down");
        match err {
            CouponSeedingError::Persistence { code, source } => {
                assert_eq!(code, "TEST1");
                assert_eq!(source.code(), ErrorCode::ServiceUnavailable);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
