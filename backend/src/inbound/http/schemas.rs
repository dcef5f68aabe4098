//! OpenAPI schema definitions for types owned outside the HTTP adapter.
//!
//! Domain and pagination types stay framework-agnostic by not deriving
//! `ToSchema`; these wrappers mirror their wire shape for utoipa.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed, fails validation, or breaks a business rule.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The requested coupon does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// A backing service is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Human-readable message returned to clients.
    #[schema(example = "Coupon not found")]
    error: String,
    /// Stable machine-readable error code.
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    /// Correlation identifier matching the `trace-id` response header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary error details, such as the offending field.
    details: Option<serde_json::Value>,
}

/// OpenAPI schema for [`pagination::Paging`].
#[derive(ToSchema)]
#[schema(as = pagination::Paging)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct PagingSchema {
    /// Records matching the query before paging.
    #[schema(example = 42)]
    total: u64,
    /// Limit applied; zero when none was supplied.
    #[schema(example = 10)]
    limit: u64,
    /// Offset applied.
    #[schema(example = 0)]
    offset: u64,
}
