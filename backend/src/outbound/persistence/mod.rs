//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of domain repository ports backed by PostgreSQL
//! via `diesel-async` and `bb8` connection pooling.
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. No business logic resides here.
//! - **Internal models**: row structs (`models.rs`) and the schema
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: database errors map to
//!   [`CouponRepositoryError`](crate::domain::ports::CouponRepositoryError).
//!
//! # Example
//!
//! ```ignore
//! use coupon_backend::outbound::persistence::{DbPool, DieselCouponRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/coupons")).await?;
//! let repo = DieselCouponRepository::new(pool);
//! ```

mod diesel_coupon_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_coupon_repository::DieselCouponRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
