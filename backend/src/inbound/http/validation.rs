//! Shared validation helpers for inbound HTTP adapters.
//!
//! Every helper produces an `invalid_request` [`Error`] whose `details`
//! name the offending field and a machine-readable reason code.

use actix_web::HttpRequest;
use actix_web::error::{JsonPayloadError, QueryPayloadError};
use pagination::PageParamsError;
use serde_json::json;
use tracing::debug;

use crate::domain::{CouponCode, CouponCodeError, Error, UnknownVariantError};

/// Reason codes reported in validation error details.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidValue,
    InvalidPaging,
    MalformedBody,
    MalformedQuery,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidValue => "invalid_value",
            ErrorCode::InvalidPaging => "invalid_paging",
            ErrorCode::MalformedBody => "malformed_body",
            ErrorCode::MalformedQuery => "malformed_query",
        }
    }
}

/// Newtype wrapper for HTTP field names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: &'static str,
    message: String,
}

impl ValidationError {
    fn new(field: FieldName, message: impl Into<String>) -> Self {
        Self {
            field: field.as_str(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let name = field.as_str();
    ValidationError::new(field, format!("missing required field: {name}"))
        .with_code(ErrorCode::MissingField)
}

pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

pub(crate) fn unknown_variant_error(err: &UnknownVariantError, field: FieldName) -> Error {
    ValidationError::new(field, err.to_string()).with_value(ErrorCode::InvalidValue, &err.value)
}

pub(crate) fn parse_coupon_code(value: String, field: FieldName) -> Result<CouponCode, Error> {
    CouponCode::new(value.clone()).map_err(|err: CouponCodeError| {
        ValidationError::new(field, err.to_string()).with_value(ErrorCode::InvalidValue, value)
    })
}

pub(crate) fn page_params_error(err: &PageParamsError) -> Error {
    Error::invalid_request("Invalid pagination parameters").with_details(json!({
        "field": err.field(),
        "reason": err.to_string(),
        "code": ErrorCode::InvalidPaging.as_str(),
    }))
}

/// `JsonConfig` error handler: undecodable bodies become `invalid_request`.
pub(crate) fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected request body");
    Error::invalid_request(format!("Invalid request data: {err}"))
        .with_details(json!({ "code": ErrorCode::MalformedBody.as_str() }))
        .into()
}

/// `QueryConfig` error handler: undecodable query strings become
/// `invalid_request`.
pub(crate) fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected query string");
    Error::invalid_request(format!("Invalid query parameters: {err}"))
        .with_details(json!({ "code": ErrorCode::MalformedQuery.as_str() }))
        .into()
}
