use axum::response::{IntoResponse, Json};
use utoipa::OpenApi;

use crate::routes::interview;

#[derive(OpenApi)]
#[openapi(paths(
    interview::list_interviews,
    interview::get_interview,
    interview::join_interview,
    interview::complete_interview,
    interview::reschedule_interview,
    interview::cancel_interview,
    interview::get_feedback,
    interview::submit_feedback,
    interview::get_preparation,
    interview::get_stats,
    interview::get_availability,
))]
pub struct ApiDoc;

pub async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}
