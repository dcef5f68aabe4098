//! Domain primitives, services, and ports.
//!
//! Purpose: hold the coupon model and the rules applied to it, independent of
//! HTTP, Postgres, or Redis. Inbound adapters call the driving ports in
//! [`ports`]; outbound adapters implement the driven ones.
//!
//! Public surface:
//! - [`Coupon`] and its value objects ([`CouponCode`], [`CouponType`],
//!   [`CouponUsage`], [`NewCoupon`], [`CouponPatch`]).
//! - [`discount`] and [`validator`], the pure pricing and expiry rules.
//! - [`CouponCache`], the read-through cache protocol.
//! - [`CouponService`] and [`MockOrderService`], the use-case services.
//! - [`CouponSeeder`], which stores the demo `TEST{n}` coupons.
//! - [`Error`] and [`ErrorCode`], the transport-agnostic failure type.

pub mod coupon;
pub mod coupon_cache;
pub mod coupon_seeder;
pub mod coupon_service;
pub mod discount;
pub mod error;
pub mod order_workflow;
pub mod ports;
pub mod trace_id;
pub mod validator;

pub use self::coupon::{
    Coupon, CouponCode, CouponCodeError, CouponDetails, CouponInputError, CouponPage, CouponPatch,
    CouponType, CouponUsage, MAX_MONEY, MONEY_SCALE, NewCoupon, UnknownVariantError, round_money,
};
pub use self::coupon_cache::{CacheError, CacheLookup, CacheSettings, CouponCache};
pub use self::coupon_seeder::{
    CouponSeeder, CouponSeedingError, DEFAULT_SEED_COUNT, SeedOutcome, seed_coupons,
};
pub use self::coupon_service::CouponService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::order_workflow::MockOrderService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
