//! Health endpoints: the `/v1/ping` probe plus liveness and readiness
//! probes for orchestration and load balancers.

use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Shared readiness state, flipped once the server has bound its socket.
#[derive(Default)]
pub struct HealthState {
    ready: AtomicBool,
}

impl HealthState {
    /// Create a new health state starting as not ready.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the service as ready.
    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Release);
    }

    /// Return readiness state.
    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    fn probe_response(probe_ok: bool) -> HttpResponse {
        let mut response = if probe_ok {
            HttpResponse::Ok()
        } else {
            HttpResponse::ServiceUnavailable()
        };

        response
            .insert_header((header::CACHE_CONTROL, "no-store"))
            .finish()
    }
}

/// Body of the ping response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PingResponse {
    /// Always `pong`.
    #[schema(example = "pong")]
    pub data: String,
    /// Human-readable outcome.
    #[schema(example = "Ping successfully")]
    pub message: String,
    /// Mirrors the HTTP status.
    #[schema(example = 200)]
    pub code: u16,
}

/// Application-level ping.
#[utoipa::path(
    get,
    path = "/v1/ping",
    tags = ["health"],
    responses((status = 200, description = "Service responds", body = PingResponse)),
    operation_id = "ping"
)]
#[get("/ping")]
pub async fn ping() -> web::Json<PingResponse> {
    web::Json(PingResponse {
        data: "pong".to_owned(),
        message: "Ping successfully".to_owned(),
        code: 200,
    })
}

/// Readiness probe. Return 200 once dependencies are initialised; 503 otherwise.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is ready to handle traffic"),
        (status = 503, description = "Server is not ready")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    HealthState::probe_response(state.is_ready())
}

/// Liveness probe. Return 200 whenever the worker can answer at all.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses((status = 200, description = "Server is alive"))
)]
#[get("/health/live")]
pub async fn live() -> HttpResponse {
    HealthState::probe_response(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::{Value, json};

    #[rstest]
    #[actix_web::test]
    async fn ping_returns_pong_envelope() {
        let app = test::init_service(App::new().service(web::scope("/v1").service(ping))).await;
        let req = test::TestRequest::get().uri("/v1/ping").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            body,
            json!({"data": "pong", "message": "Ping successfully", "code": 200})
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn readiness_flips_after_mark_ready() {
        let state = web::Data::new(HealthState::new());
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .service(ready)
                .service(live),
        )
        .await;

        let probe = |uri: &'static str| test::TestRequest::get().uri(uri).to_request();

        let starting = test::call_service(&app, probe("/health/ready")).await;
        assert_eq!(starting.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            starting
                .headers()
                .get(header::CACHE_CONTROL)
                .map(|v| v.as_bytes()),
            Some(&b"no-store"[..])
        );

        let alive = test::call_service(&app, probe("/health/live")).await;
        assert_eq!(alive.status(), StatusCode::OK);

        state.mark_ready();
        let serving = test::call_service(&app, probe("/health/ready")).await;
        assert_eq!(serving.status(), StatusCode::OK);
    }
}
