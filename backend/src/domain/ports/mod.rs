//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports ([`CouponRepository`], [`CouponHashStore`], [`TaskSpawner`])
//! are implemented in `outbound`; driving ports ([`CouponsCommand`],
//! [`CouponsQuery`], [`MockOrderCommand`]) are implemented by domain services
//! and called from `inbound`.

mod macros;
pub(crate) use macros::define_port_error;

mod cache_key;
mod coupon_hash_store;
mod coupon_repository;
mod coupons_command;
mod coupons_query;
mod mock_order_command;
mod task_spawner;

pub use cache_key::CouponCacheKey;
#[cfg(test)]
pub use coupon_hash_store::MockCouponHashStore;
pub use coupon_hash_store::{CouponHashStore, CouponHashStoreError};
#[cfg(test)]
pub use coupon_repository::MockCouponRepository;
pub use coupon_repository::{CouponRepository, CouponRepositoryError};
#[cfg(test)]
pub use coupons_command::MockCouponsCommand;
pub use coupons_command::CouponsCommand;
#[cfg(test)]
pub use coupons_query::MockCouponsQuery;
pub use coupons_query::CouponsQuery;
#[cfg(test)]
pub use mock_order_command::MockMockOrderCommand;
pub use mock_order_command::{MockOrderCommand, OrderRequest, OrderRequestError, OrderResult};
#[cfg(test)]
pub use task_spawner::MockTaskSpawner;
pub use task_spawner::TaskSpawner;
