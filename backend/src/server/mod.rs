//! Server construction and middleware wiring.

mod config;
mod state_builders;

pub use config::ServerConfig;

use state_builders::build_http_state;

use std::sync::Arc;

use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use mockable::DefaultClock;
use tracing::info;

use coupon_backend::Trace;
#[cfg(debug_assertions)]
use coupon_backend::doc::ApiDoc;
use coupon_backend::domain::{CouponSeeder, CouponSeedingError};
use coupon_backend::inbound::http::configure;
use coupon_backend::inbound::http::health::{HealthState, live, ready};
use coupon_backend::inbound::http::state::HttpState;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
    } = deps;

    App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .configure(configure)
        .configure(configure_docs)
        .service(ready)
        .service(live)
}

#[cfg(debug_assertions)]
fn configure_docs(cfg: &mut web::ServiceConfig) {
    cfg.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));
}

#[cfg(not(debug_assertions))]
fn configure_docs(_cfg: &mut web::ServiceConfig) {}

/// Store the demo coupons through the service the server will use.
async fn seed_on_startup(
    http_state: &HttpState,
    seed_count: Option<usize>,
) -> Result<(), CouponSeedingError> {
    let Some(count) = seed_count else {
        info!(reason = "disabled", "coupon seeding skipped");
        return Ok(());
    };
    CouponSeeder::new(http_state.coupons.clone(), Arc::new(DefaultClock))
        .seed(count)
        .await
        .map(|_| ())
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] holding the bind address, the
///   optional Postgres pool and cache store, and the demo seed count.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener. Demo
/// coupons, when enabled, are stored before the socket is bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when seeding, binding the socket, or starting
/// the server fails.
pub async fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(&config);
    let bind_addr = config.bind_addr();

    seed_on_startup(&http_state, config.seed_count)
        .await
        .map_err(|e| std::io::Error::other(format!("coupon seeding failed: {e}")))?;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    Ok(server)
}
