//! Mock order pricing handler.
//!
//! ```text
//! POST /v1/orders/mock
//! ```

use actix_web::{post, web};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::Error;
use crate::domain::ports::{OrderRequest, OrderRequestError, OrderResult};
use crate::inbound::http::ApiResult;
use crate::inbound::http::coupons::CouponResponse;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_coupon_code, require};

const COST: FieldName = FieldName::new("cost");
const CREATED_AT: FieldName = FieldName::new("created_at");
const COUPON_CODE: FieldName = FieldName::new("coupon_code");

/// Request payload for pricing a mock order.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
pub struct MockOrderRequest {
    #[schema(value_type = Option<f64>, example = 100000)]
    pub cost: Option<Decimal>,
    pub created_at: Option<DateTime<Utc>>,
    #[schema(example = "TEST100")]
    pub coupon_code: Option<String>,
}

/// Priced order as returned to clients.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
pub struct MockOrderResponse {
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 100000)]
    pub cost: Decimal,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coupon_code: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    #[schema(value_type = f64, example = 85000)]
    pub total_amount: Decimal,
    pub coupon: Option<CouponResponse>,
}

impl From<OrderResult> for MockOrderResponse {
    fn from(result: OrderResult) -> Self {
        Self {
            cost: result.cost,
            created_at: result.created_at,
            coupon_code: result.coupon_code.map(|code| code.to_string()),
            total_amount: result.total_amount,
            coupon: result.coupon.map(CouponResponse::from),
        }
    }
}

/// Envelope for a priced order.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct MockOrderEnvelope {
    pub data: MockOrderResponse,
    #[schema(example = "Mock order created successfully")]
    pub message: String,
    #[schema(example = 200)]
    pub code: u16,
}

fn invalid_cost_error(err: &OrderRequestError) -> Error {
    Error::invalid_request(err.to_string()).with_details(json!({
        "field": "cost",
        "code": "invalid_value",
    }))
}

fn parse_order_request(payload: MockOrderRequest) -> Result<OrderRequest, Error> {
    let cost = require(payload.cost, COST)?;
    let created_at = require(payload.created_at, CREATED_AT)?;
    let coupon_code = payload
        .coupon_code
        .map(|raw| parse_coupon_code(raw, COUPON_CODE))
        .transpose()?;
    OrderRequest::try_new(cost, created_at, coupon_code).map_err(|err| invalid_cost_error(&err))
}

/// Price a mock order, applying the named coupon if any.
#[utoipa::path(
    post,
    path = "/v1/orders/mock",
    request_body = MockOrderRequest,
    responses(
        (status = 200, description = "Priced order", body = MockOrderEnvelope),
        (
            status = 400,
            description = "Invalid order, or the coupon is unknown, expired, or unpriceable",
            body = ErrorSchema
        )
    ),
    tags = ["orders"],
    operation_id = "createMockOrder"
)]
#[post("/orders/mock")]
pub async fn create_mock_order(
    state: web::Data<HttpState>,
    payload: web::Json<MockOrderRequest>,
) -> ApiResult<web::Json<MockOrderEnvelope>> {
    let request = parse_order_request(payload.into_inner())?;
    let result = state.orders.create_mock_order(request).await?;
    Ok(web::Json(MockOrderEnvelope {
        data: result.into(),
        message: "Mock order created successfully".to_owned(),
        code: 200,
    }))
}
