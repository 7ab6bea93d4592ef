pub mod docs;
pub mod extract;
pub mod health;
pub mod interview;

use axum::{
    middleware::from_fn_with_state,
    routing::get,
    routing::post,
    Router,
};
use tower_http::trace::TraceLayer;

use crate::middleware::{auth::require_bearer_auth, cors::dashboard_cors, rate_limit};
use crate::AppState;

/// Full application router: public health/docs routes plus the
/// authenticated, rate-limited candidate interview API.
pub fn build_router(state: AppState, rps: u32) -> Router {
    let interviews_api = Router::new()
        .route("/api/candidate/interviews/", get(interview::list_interviews))
        .route("/api/candidate/interviews/stats/", get(interview::get_stats))
        .route("/api/candidate/interviews/:id/", get(interview::get_interview))
        .route(
            "/api/candidate/interviews/:id/join/",
            post(interview::join_interview),
        )
        .route(
            "/api/candidate/interviews/:id/complete/",
            post(interview::complete_interview),
        )
        .route(
            "/api/candidate/interviews/:id/reschedule/",
            post(interview::reschedule_interview),
        )
        .route(
            "/api/candidate/interviews/:id/cancel/",
            post(interview::cancel_interview),
        )
        .route(
            "/api/candidate/interviews/:id/feedback/",
            get(interview::get_feedback).post(interview::submit_feedback),
        )
        .route(
            "/api/candidate/interviews/:id/preparation/",
            get(interview::get_preparation),
        )
        .route(
            "/api/candidate/interviews/:id/availability/",
            get(interview::get_availability),
        )
        .layer(from_fn_with_state(state.clone(), require_bearer_auth))
        .layer(from_fn_with_state(
            rate_limit::RateLimiter::new(rps),
            rate_limit::rps_middleware,
        ));

    Router::new()
        .route("/health", get(health::health))
        .route("/api/openapi.json", get(docs::openapi_json))
        .merge(interviews_api)
        .with_state(state)
        .layer(dashboard_cors())
        .layer(TraceLayer::new_for_http())
}
