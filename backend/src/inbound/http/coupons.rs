//! Coupon CRUD HTTP handlers.
//!
//! ```text
//! POST   /v1/coupons
//! GET    /v1/coupons?offset=&limit=&coupon_code=
//! GET    /v1/coupons/{id}
//! PUT    /v1/coupons/{id}
//! DELETE /v1/coupons/{id}
//! ```
//!
//! Successful responses use the `{data, message, code}` envelope; the list
//! endpoint swaps `code` for `paging`.

use actix_web::{delete, get, post, put, web};
use chrono::{DateTime, Utc};
use pagination::{PageParams, Paging};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    Coupon, CouponCode, CouponDetails, CouponPatch, CouponType, CouponUsage, Error, NewCoupon,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, PagingSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, page_params_error, parse_coupon_code, require, unknown_variant_error,
};

const ID: FieldName = FieldName::new("id");
const COUPON_CODE: FieldName = FieldName::new("coupon_code");
const TITLE: FieldName = FieldName::new("title");
const DESCRIPTION: FieldName = FieldName::new("description");
const COUPON_TYPE: FieldName = FieldName::new("coupon_type");
const USAGE: FieldName = FieldName::new("usage");
const EXPIRED_AT: FieldName = FieldName::new("expired_at");
const COUPON_VALUE: FieldName = FieldName::new("coupon_value");

/// Request payload for creating a coupon. Every field is required.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct CreateCouponRequest {
    #[schema(example = "TEST100")]
    pub coupon_code: Option<String>,
    #[schema(example = "Launch discount")]
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(example = "fixed")]
    pub coupon_type: Option<String>,
    #[schema(example = "manual")]
    pub usage: Option<String>,
    pub expired_at: Option<DateTime<Utc>>,
    #[schema(value_type = Option<f64>, example = 15000)]
    pub coupon_value: Option<Decimal>,
}

/// Request payload for a partial update. Omitted fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct UpdateCouponRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[schema(example = "percentage")]
    pub coupon_type: Option<String>,
    pub usage: Option<String>,
    pub expired_at: Option<DateTime<Utc>>,
    #[schema(value_type = Option<f64>, example = 20)]
    pub coupon_value: Option<Decimal>,
}

/// Coupon as returned to clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
pub struct CouponResponse {
    pub coupon_code: String,
    pub title: String,
    pub description: String,
    pub coupon_type: String,
    pub usage: String,
    pub expired_at: DateTime<Utc>,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 15000)]
    pub coupon_value: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Coupon> for CouponResponse {
    fn from(coupon: Coupon) -> Self {
        Self {
            coupon_code: coupon.code.to_string(),
            title: coupon.title,
            description: coupon.description,
            coupon_type: coupon.coupon_type.to_string(),
            usage: coupon.usage.to_string(),
            expired_at: coupon.expires_at,
            coupon_value: coupon.value,
            created_at: coupon.created_at,
            updated_at: coupon.updated_at,
        }
    }
}

/// Envelope for a single coupon.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CouponEnvelope {
    pub data: CouponResponse,
    #[schema(example = "Coupon retrieved successfully")]
    pub message: String,
    #[schema(example = 200)]
    pub code: u16,
}

impl CouponEnvelope {
    fn ok(coupon: Coupon, message: &str) -> Self {
        Self {
            data: coupon.into(),
            message: message.to_owned(),
            code: 200,
        }
    }
}

/// Envelope for a page of coupons.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct CouponListEnvelope {
    pub data: Vec<CouponResponse>,
    #[schema(example = "Coupons retrieved successfully")]
    pub message: String,
    #[schema(value_type = PagingSchema)]
    pub paging: Paging,
}

/// Envelope confirming a deletion.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct DeletedEnvelope {
    #[schema(example = "Coupon with ID TEST100 has been deleted")]
    pub data: String,
    #[schema(example = "Coupon deleted successfully")]
    pub message: String,
    #[schema(example = 200)]
    pub code: u16,
}

/// Raw list query; values stay textual so paging errors can name the field.
#[derive(Debug, Default, Deserialize)]
pub struct ListCouponsQuery {
    pub offset: Option<String>,
    pub limit: Option<String>,
    pub coupon_code: Option<String>,
}

fn parse_coupon_type(raw: String) -> Result<CouponType, Error> {
    raw.parse()
        .map_err(|err| unknown_variant_error(&err, COUPON_TYPE))
}

fn parse_usage(raw: String) -> Result<CouponUsage, Error> {
    raw.parse().map_err(|err| unknown_variant_error(&err, USAGE))
}

fn parse_create_request(payload: CreateCouponRequest) -> Result<NewCoupon, Error> {
    let code = parse_coupon_code(require(payload.coupon_code, COUPON_CODE)?, COUPON_CODE)?;
    let details = CouponDetails {
        title: require(payload.title, TITLE)?,
        description: require(payload.description, DESCRIPTION)?,
        coupon_type: parse_coupon_type(require(payload.coupon_type, COUPON_TYPE)?)?,
        usage: parse_usage(require(payload.usage, USAGE)?)?,
        value: require(payload.coupon_value, COUPON_VALUE)?,
        expires_at: require(payload.expired_at, EXPIRED_AT)?,
    };
    Ok(NewCoupon::try_new(code, details)?)
}

fn parse_update_request(payload: UpdateCouponRequest) -> Result<CouponPatch, Error> {
    Ok(CouponPatch {
        title: payload.title,
        description: payload.description,
        coupon_type: payload.coupon_type.map(parse_coupon_type).transpose()?,
        usage: payload.usage.map(parse_usage).transpose()?,
        value: payload.coupon_value,
        expires_at: payload.expired_at,
    })
}

fn parse_id(path: web::Path<String>) -> Result<CouponCode, Error> {
    parse_coupon_code(path.into_inner(), ID)
}

/// Create a coupon.
#[utoipa::path(
    post,
    path = "/v1/coupons",
    request_body = CreateCouponRequest,
    responses(
        (status = 200, description = "Created coupon", body = CouponEnvelope),
        (status = 400, description = "Invalid input or duplicate code", body = ErrorSchema),
        (status = 503, description = "Store unavailable", body = ErrorSchema)
    ),
    tags = ["coupons"],
    operation_id = "createCoupon"
)]
#[post("/coupons")]
pub async fn create_coupon(
    state: web::Data<HttpState>,
    payload: web::Json<CreateCouponRequest>,
) -> ApiResult<web::Json<CouponEnvelope>> {
    let coupon = parse_create_request(payload.into_inner())?;
    let created = state.coupons.create(coupon).await?;
    Ok(web::Json(CouponEnvelope::ok(
        created,
        "Coupon created successfully",
    )))
}

/// List coupons, optionally filtered by a code substring.
#[utoipa::path(
    get,
    path = "/v1/coupons",
    params(
        ("offset" = Option<i64>, Query, description = "Records to skip; must not be negative"),
        ("limit" = Option<i64>, Query, description = "Maximum records; must be positive"),
        ("coupon_code" = Option<String>, Query, description = "Substring of the coupon code")
    ),
    responses(
        (status = 200, description = "Page of coupons", body = CouponListEnvelope),
        (status = 400, description = "Invalid pagination parameters", body = ErrorSchema)
    ),
    tags = ["coupons"],
    operation_id = "listCoupons"
)]
#[get("/coupons")]
pub async fn list_coupons(
    state: web::Data<HttpState>,
    query: web::Query<ListCouponsQuery>,
) -> ApiResult<web::Json<CouponListEnvelope>> {
    let ListCouponsQuery {
        offset,
        limit,
        coupon_code,
    } = query.into_inner();
    let params = PageParams::parse(offset.as_deref(), limit.as_deref())
        .map_err(|err| page_params_error(&err))?;
    let page = state
        .coupons_query
        .list(params, coupon_code)
        .await?;

    Ok(web::Json(CouponListEnvelope {
        paging: Paging::new(page.total, &params),
        data: page.coupons.into_iter().map(CouponResponse::from).collect(),
        message: "Coupons retrieved successfully".to_owned(),
    }))
}

/// Fetch a coupon by code, cache first.
#[utoipa::path(
    get,
    path = "/v1/coupons/{id}",
    params(("id" = String, Path, description = "Coupon code")),
    responses(
        (status = 200, description = "Coupon", body = CouponEnvelope),
        (status = 404, description = "Unknown coupon", body = ErrorSchema)
    ),
    tags = ["coupons"],
    operation_id = "getCoupon"
)]
#[get("/coupons/{id}")]
pub async fn get_coupon(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<CouponEnvelope>> {
    let code = parse_id(path)?;
    let coupon = state.coupons_query.get(&code).await?;
    Ok(web::Json(CouponEnvelope::ok(
        coupon,
        "Coupon retrieved successfully",
    )))
}

/// Apply a partial update.
#[utoipa::path(
    put,
    path = "/v1/coupons/{id}",
    params(("id" = String, Path, description = "Coupon code")),
    request_body = UpdateCouponRequest,
    responses(
        (status = 200, description = "Updated coupon", body = CouponEnvelope),
        (status = 400, description = "Invalid input", body = ErrorSchema),
        (status = 404, description = "Unknown coupon", body = ErrorSchema)
    ),
    tags = ["coupons"],
    operation_id = "updateCoupon"
)]
#[put("/coupons/{id}")]
pub async fn update_coupon(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<UpdateCouponRequest>,
) -> ApiResult<web::Json<CouponEnvelope>> {
    let code = parse_id(path)?;
    let patch = parse_update_request(payload.into_inner())?;
    let updated = state.coupons.update(code, patch).await?;
    Ok(web::Json(CouponEnvelope::ok(
        updated,
        "Coupon updated successfully",
    )))
}

/// Delete a coupon.
#[utoipa::path(
    delete,
    path = "/v1/coupons/{id}",
    params(("id" = String, Path, description = "Coupon code")),
    responses(
        (status = 200, description = "Deletion confirmed", body = DeletedEnvelope),
        (status = 404, description = "Unknown coupon", body = ErrorSchema)
    ),
    tags = ["coupons"],
    operation_id = "deleteCoupon"
)]
#[delete("/coupons/{id}")]
pub async fn delete_coupon(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeletedEnvelope>> {
    let code = parse_id(path)?;
    let data = format!("Coupon with ID {code} has been deleted");
    state.coupons.delete(code).await?;
    Ok(web::Json(DeletedEnvelope {
        data,
        message: "Coupon deleted successfully".to_owned(),
        code: 200,
    }))
}

#[cfg(test)]
#[path = "coupons_tests.rs"]
mod tests;
