//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: the coupon CRUD endpoints, the mock order endpoint, and the
//!   ping and health probes
//! - **Schemas**: request and response DTOs plus wrappers ([`ErrorSchema`],
//!   [`ErrorCodeSchema`], [`PagingSchema`]) that document domain and
//!   pagination types without coupling them to utoipa
//!
//! The generated specification is served by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::coupons::{
    CouponEnvelope, CouponListEnvelope, CouponResponse, CreateCouponRequest, DeletedEnvelope,
    UpdateCouponRequest,
};
use crate::inbound::http::health::PingResponse;
use crate::inbound::http::orders::{MockOrderEnvelope, MockOrderRequest, MockOrderResponse};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, PagingSchema};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Coupon backend API",
        description = "Coupon management, cached coupon lookups, and mock order pricing."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::coupons::create_coupon,
        crate::inbound::http::coupons::list_coupons,
        crate::inbound::http::coupons::get_coupon,
        crate::inbound::http::coupons::update_coupon,
        crate::inbound::http::coupons::delete_coupon,
        crate::inbound::http::orders::create_mock_order,
        crate::inbound::http::health::ping,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        CreateCouponRequest,
        UpdateCouponRequest,
        CouponResponse,
        CouponEnvelope,
        CouponListEnvelope,
        DeletedEnvelope,
        MockOrderRequest,
        MockOrderResponse,
        MockOrderEnvelope,
        PingResponse,
        PagingSchema,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "coupons", description = "Coupon management"),
        (name = "orders", description = "Order pricing against coupons"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI path registration and schema field structure.

    use super::*;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // Note: utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";
    const PAGING_SCHEMA_NAME: &str = "pagination.Paging";

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    fn schema(name: &str) -> RefOr<Schema> {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        components
            .schemas
            .get(name)
            .cloned()
            .unwrap_or_else(|| panic!("{name} schema registered"))
    }

    #[rstest]
    #[case("/v1/coupons")]
    #[case("/v1/coupons/{id}")]
    #[case("/v1/orders/mock")]
    #[case("/v1/ping")]
    #[case("/health/ready")]
    #[case("/health/live")]
    fn openapi_registers_path(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[rstest]
    fn openapi_error_schema_has_required_fields() {
        let error_schema = schema(ERROR_SCHEMA_NAME);

        assert_object_schema_has_field(&error_schema, "error");
        assert_object_schema_has_field(&error_schema, "code");
        assert_object_schema_has_field(&error_schema, "trace_id");
    }

    #[rstest]
    fn openapi_paging_schema_has_required_fields() {
        let paging_schema = schema(PAGING_SCHEMA_NAME);

        for field in ["total", "limit", "offset"] {
            assert_object_schema_has_field(&paging_schema, field);
        }
    }

    #[rstest]
    fn openapi_coupon_schema_has_wire_fields() {
        let coupon_schema = schema("CouponResponse");

        for field in ["coupon_code", "coupon_type", "usage", "coupon_value", "expired_at"] {
            assert_object_schema_has_field(&coupon_schema, field);
        }
    }
}
