//! Shared HTTP adapter state.
//!
//! Handlers accept this state via `actix_web::web::Data` so they only depend
//! on driving ports and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{CouponsCommand, CouponsQuery, MockOrderCommand};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Coupon mutations.
    pub coupons: Arc<dyn CouponsCommand>,
    /// Coupon reads.
    pub coupons_query: Arc<dyn CouponsQuery>,
    /// Mock order pricing.
    pub orders: Arc<dyn MockOrderCommand>,
}

impl HttpState {
    /// Bundle the driving ports.
    pub fn new(
        coupons: Arc<dyn CouponsCommand>,
        coupons_query: Arc<dyn CouponsQuery>,
        orders: Arc<dyn MockOrderCommand>,
    ) -> Self {
        Self {
            coupons,
            coupons_query,
            orders,
        }
    }
}
