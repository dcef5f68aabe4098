//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed coupon repository using Diesel ORM
//! - **cache**: Redis-backed hash store for the coupon cache
//! - **memory**: in-process repository and hash store for local runs
//! - **tasks**: tokio spawner for detached cache maintenance
//!
//! Adapters are thin translators between domain types and infrastructure
//! representations. They contain no business logic.

pub mod cache;
pub mod memory;
pub mod persistence;
pub mod tasks;
