//! HTTP inbound adapter exposing the `/v1` REST endpoints.

use actix_web::web;

pub mod coupons;
pub mod error;
pub mod health;
pub mod orders;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;

/// Register the `/v1` routes together with body and query error handlers.
///
/// Expects an [`HttpState`](state::HttpState) in app data.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(validation::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(validation::query_error_handler))
        .service(
            web::scope("/v1")
                .service(health::ping)
                .service(coupons::create_coupon)
                .service(coupons::list_coupons)
                .service(coupons::get_coupon)
                .service(coupons::update_coupon)
                .service(coupons::delete_coupon)
                .service(orders::create_mock_order),
        );
}
