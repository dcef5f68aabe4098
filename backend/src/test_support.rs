//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`). Only
//! compiled for tests or with the `test-support` feature.

use std::sync::Mutex;

use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use futures_util::future::BoxFuture;
use mockable::Clock;
use rust_decimal::Decimal;

use crate::domain::ports::TaskSpawner;
use crate::domain::{Coupon, CouponCode, CouponDetails, CouponType, CouponUsage, NewCoupon};

/// Instant used for `created_at` and `updated_at` of sample coupons.
#[must_use]
pub fn sample_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// Attributes of a fixed 15000.00 coupon expiring at the start of 2030.
#[must_use]
pub fn sample_details() -> CouponDetails {
    CouponDetails {
        title: "Sample coupon".to_owned(),
        description: "Sample description".to_owned(),
        coupon_type: CouponType::Fixed,
        usage: CouponUsage::Manual,
        value: Decimal::new(1_500_000, 2),
        expires_at: Utc
            .with_ymd_and_hms(2030, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or(DateTime::UNIX_EPOCH),
    }
}

/// Validated creation request built from [`sample_details`].
///
/// # Panics
/// Panics when `code` is not a valid coupon code.
#[must_use]
pub fn sample_new_coupon(code: &str) -> NewCoupon {
    let coupon_code =
        CouponCode::new(code).unwrap_or_else(|err| panic!("invalid sample code: {err}"));
    NewCoupon::try_new(coupon_code, sample_details())
        .unwrap_or_else(|err| panic!("invalid sample coupon: {err}"))
}

/// Stored coupon built from [`sample_details`] at [`sample_timestamp`].
///
/// # Panics
/// Panics when `code` is not a valid coupon code.
#[must_use]
pub fn sample_coupon(code: &str) -> Coupon {
    sample_new_coupon(code).into_coupon(sample_timestamp())
}

/// Clock whose current time is set by the test.
#[derive(Debug)]
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    /// Start the clock at `now`.
    #[must_use]
    pub const fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    /// Move the clock forward.
    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Task spawner that parks tasks until the test runs them.
///
/// Lets tests observe state before and after detached cache maintenance.
#[derive(Default)]
pub struct RecordingTaskSpawner {
    tasks: Mutex<Vec<BoxFuture<'static, ()>>>,
}

impl RecordingTaskSpawner {
    /// Empty spawner.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tasks spawned but not yet run.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.lock_tasks().len()
    }

    /// Run every parked task to completion, in spawn order.
    pub async fn run_pending(&self) {
        let tasks = std::mem::take(&mut *self.lock_tasks());
        for task in tasks {
            task.await;
        }
    }

    fn lock_tasks(&self) -> std::sync::MutexGuard<'_, Vec<BoxFuture<'static, ()>>> {
        match self.tasks.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl TaskSpawner for RecordingTaskSpawner {
    fn spawn(&self, task: BoxFuture<'static, ()>) {
        self.lock_tasks().push(task);
    }
}
