//! Liveness and readiness endpoints for orchestrators and load balancers.
//!
//! Liveness only says the process answers HTTP. Readiness also requires the
//! listener to be bound and the request store to answer a round trip, so an
//! instance whose database has gone away stops receiving lifecycle calls.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use serde::Serialize;
use tracing::warn;
use utoipa::ToSchema;

use crate::domain::ports::StoreHealth;

/// Health outcome reported in the response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum HealthStatus {
    Alive,
    Ready,
    /// The listener is not bound yet.
    Starting,
    /// The request store failed its health check.
    StoreUnavailable,
}

impl HealthStatus {
    fn is_healthy(self) -> bool {
        matches!(self, Self::Alive | Self::Ready)
    }
}

/// JSON body returned by both health endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthBody {
    pub status: HealthStatus,
}

/// State consulted by the health handlers.
pub struct HealthState {
    listening: AtomicBool,
    store: Arc<dyn StoreHealth>,
}

impl HealthState {
    /// Start unbound, checking `store` on every readiness call.
    pub fn new(store: Arc<dyn StoreHealth>) -> Self {
        Self {
            listening: AtomicBool::new(false),
            store,
        }
    }

    /// Record that the HTTP listener is bound.
    pub fn mark_listening(&self) {
        self.listening.store(true, Ordering::Release);
    }

    async fn readiness(&self) -> HealthStatus {
        if !self.listening.load(Ordering::Acquire) {
            return HealthStatus::Starting;
        }
        match self.store.check().await {
            Ok(()) => HealthStatus::Ready,
            Err(error) => {
                warn!(%error, "readiness check failed");
                HealthStatus::StoreUnavailable
            }
        }
    }
}

fn health_response(status: HealthStatus) -> HttpResponse {
    let mut response = if status.is_healthy() {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .json(HealthBody { status })
}

/// Readiness: 200 when listening and the store answers, 503 otherwise.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    security(()),
    responses(
        (status = 200, description = "Ready to handle traffic", body = HealthBody),
        (status = 503, description = "Starting or store unavailable", body = HealthBody)
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    health_response(state.readiness().await)
}

/// Liveness: 200 while the process serves HTTP.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    security(()),
    responses((status = 200, description = "Process is alive", body = HealthBody))
)]
#[get("/health/live")]
pub async fn live() -> HttpResponse {
    health_response(HealthStatus::Alive)
}

#[cfg(test)]
mod tests {
    //! Health endpoints over mocked store checks.

    use actix_web::http::StatusCode;
    use actix_web::{App, test};
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::ports::{MockStoreHealth, StoreHealthError};

    fn store(result: Option<Result<(), StoreHealthError>>) -> Arc<dyn StoreHealth> {
        let mut store = MockStoreHealth::new();
        match result {
            Some(outcome) => {
                store.expect_check().times(1).return_once(move || outcome);
            }
            None => {
                store.expect_check().times(0);
            }
        }
        Arc::new(store)
    }

    async fn call(state: HealthState, uri: &str) -> (StatusCode, Value) {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(state))
                .service(ready)
                .service(live),
        )
        .await;
        let res = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        let status = res.status();
        assert_eq!(
            res.headers().get(header::CACHE_CONTROL).map(|v| v.as_bytes()),
            Some(&b"no-store"[..])
        );
        (status, test::read_body_json(res).await)
    }

    #[rstest]
    #[actix_web::test]
    async fn not_ready_before_listening() {
        let state = HealthState::new(store(None));

        let (status, body) = call(state, "/health/ready").await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, json!({ "status": "starting" }));
    }

    #[rstest]
    #[case(Ok(()), StatusCode::OK, "ready")]
    #[case(
        Err(StoreHealthError::unavailable("connection refused")),
        StatusCode::SERVICE_UNAVAILABLE,
        "store_unavailable"
    )]
    #[actix_web::test]
    async fn readiness_follows_the_store(
        #[case] outcome: Result<(), StoreHealthError>,
        #[case] expected: StatusCode,
        #[case] label: &str,
    ) {
        let state = HealthState::new(store(Some(outcome)));
        state.mark_listening();

        let (status, body) = call(state, "/health/ready").await;

        assert_eq!(status, expected);
        assert_eq!(body, json!({ "status": label }));
    }

    #[rstest]
    #[actix_web::test]
    async fn liveness_ignores_the_store() {
        let state = HealthState::new(store(None));

        let (status, body) = call(state, "/health/live").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "alive" }));
    }
}
