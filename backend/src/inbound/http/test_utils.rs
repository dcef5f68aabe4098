//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, web};

use crate::domain::ports::{MockCouponsCommand, MockCouponsQuery, MockMockOrderCommand};
use crate::inbound::http::configure;
use crate::inbound::http::state::HttpState;

/// Mocked driving ports, configured per test before building the app.
#[derive(Default)]
pub struct MockPorts {
    pub coupons: MockCouponsCommand,
    pub coupons_query: MockCouponsQuery,
    pub orders: MockMockOrderCommand,
}

impl MockPorts {
    /// Build the routed application over these mocks.
    pub fn into_app(
        self,
    ) -> App<
        impl ServiceFactory<
            ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        >,
    > {
        let state = HttpState::new(
            Arc::new(self.coupons),
            Arc::new(self.coupons_query),
            Arc::new(self.orders),
        );
        App::new()
            .app_data(web::Data::new(state))
            .configure(configure)
    }
}
