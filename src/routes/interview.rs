use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json},
    Extension,
};
use validator::Validate;

use crate::{
    dto::interview_dto::{
        ActionResult, AvailabilityResponse, CancelRequest, FeedbackResponse,
        InterviewListResponse, InterviewResponse, PreparationResponse, RescheduleRequest,
        StatsResponse,
    },
    error::Result,
    middleware::auth::Claims,
    routes::extract::ApiJson,
    models::interview::InterviewFeedback,
    utils::time,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/candidate/interviews/",
    responses(
        (status = 200, description = "Interviews of the authenticated candidate", body = InterviewListResponse),
        (status = 401, description = "Missing or invalid bearer token")
    )
)]
#[axum::debug_handler]
pub async fn list_interviews(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let interviews = state.interview_service.list(&claims.sub).await?;
    Ok(Json(InterviewListResponse { interviews }))
}

#[utoipa::path(
    get,
    path = "/api/candidate/interviews/{id}/",
    params(
        ("id" = String, Path, description = "Interview ID")
    ),
    responses(
        (status = 200, description = "Interview found", body = InterviewResponse),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn get_interview(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let interview = state.interview_service.get(&claims.sub, &id).await?;
    Ok(Json(InterviewResponse { interview }))
}

#[utoipa::path(
    post,
    path = "/api/candidate/interviews/{id}/join/",
    params(
        ("id" = String, Path, description = "Interview ID")
    ),
    responses(
        (status = 200, description = "Interview is now in progress", body = InterviewResponse),
        (status = 400, description = "Outside the join window"),
        (status = 404, description = "Interview not found"),
        (status = 409, description = "Interview cannot be joined in its current status")
    )
)]
#[axum::debug_handler]
pub async fn join_interview(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let interview = state
        .interview_service
        .join(&claims.sub, &id, time::now())
        .await?;
    Ok(Json(InterviewResponse { interview }))
}

#[utoipa::path(
    post,
    path = "/api/candidate/interviews/{id}/complete/",
    params(
        ("id" = String, Path, description = "Interview ID")
    ),
    request_body = InterviewFeedback,
    responses(
        (status = 200, description = "Interview completed", body = ActionResult),
        (status = 400, description = "Invalid feedback"),
        (status = 404, description = "Interview not found"),
        (status = 409, description = "Interview is not in progress")
    )
)]
#[axum::debug_handler]
pub async fn complete_interview(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<InterviewFeedback>,
) -> Result<impl IntoResponse> {
    let interview = state
        .interview_service
        .complete(&claims.sub, &id, payload)
        .await?;
    Ok(Json(ActionResult {
        message: Some("Interview completed".to_string()),
        interview: Some(interview),
    }))
}

#[utoipa::path(
    post,
    path = "/api/candidate/interviews/{id}/reschedule/",
    params(
        ("id" = String, Path, description = "Interview ID")
    ),
    request_body = RescheduleRequest,
    responses(
        (status = 200, description = "Interview rescheduled", body = InterviewResponse),
        (status = 400, description = "new_datetime is not in the future"),
        (status = 404, description = "Interview not found"),
        (status = 409, description = "Interview can no longer be rescheduled")
    )
)]
#[axum::debug_handler]
pub async fn reschedule_interview(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<RescheduleRequest>,
) -> Result<impl IntoResponse> {
    let interview = state
        .interview_service
        .reschedule(&claims.sub, &id, payload.new_datetime, time::now())
        .await?;
    Ok(Json(InterviewResponse { interview }))
}

#[utoipa::path(
    post,
    path = "/api/candidate/interviews/{id}/cancel/",
    params(
        ("id" = String, Path, description = "Interview ID")
    ),
    request_body = CancelRequest,
    responses(
        (status = 200, description = "Interview cancelled", body = ActionResult),
        (status = 400, description = "Missing reason"),
        (status = 404, description = "Interview not found"),
        (status = 409, description = "Interview already finished")
    )
)]
#[axum::debug_handler]
pub async fn cancel_interview(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<CancelRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let interview = state
        .interview_service
        .cancel(&claims.sub, &id, &payload.reason)
        .await?;
    Ok(Json(ActionResult {
        message: Some("Interview cancelled".to_string()),
        interview: Some(interview),
    }))
}

#[utoipa::path(
    get,
    path = "/api/candidate/interviews/{id}/feedback/",
    params(
        ("id" = String, Path, description = "Interview ID")
    ),
    responses(
        (status = 200, description = "Submitted feedback", body = FeedbackResponse),
        (status = 404, description = "Interview or feedback not found")
    )
)]
#[axum::debug_handler]
pub async fn get_feedback(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let feedback = state.interview_service.feedback(&claims.sub, &id).await?;
    Ok(Json(FeedbackResponse { feedback }))
}

#[utoipa::path(
    post,
    path = "/api/candidate/interviews/{id}/feedback/",
    params(
        ("id" = String, Path, description = "Interview ID")
    ),
    request_body = InterviewFeedback,
    responses(
        (status = 200, description = "Feedback stored", body = ActionResult),
        (status = 400, description = "Invalid feedback"),
        (status = 409, description = "Interview is not completed")
    )
)]
#[axum::debug_handler]
pub async fn submit_feedback(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
    ApiJson(payload): ApiJson<InterviewFeedback>,
) -> Result<impl IntoResponse> {
    let interview = state
        .interview_service
        .submit_feedback(&claims.sub, &id, payload)
        .await?;
    Ok(Json(ActionResult {
        message: Some("Feedback submitted".to_string()),
        interview: Some(interview),
    }))
}

#[utoipa::path(
    get,
    path = "/api/candidate/interviews/{id}/preparation/",
    params(
        ("id" = String, Path, description = "Interview ID")
    ),
    responses(
        (status = 200, description = "Preparation materials", body = PreparationResponse),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn get_preparation(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let preparation = state.interview_service.preparation(&claims.sub, &id).await?;
    Ok(Json(PreparationResponse { preparation }))
}

#[utoipa::path(
    get,
    path = "/api/candidate/interviews/stats/",
    responses(
        (status = 200, description = "Interview statistics", body = StatsResponse)
    )
)]
#[axum::debug_handler]
pub async fn get_stats(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let stats = state
        .interview_service
        .stats(&claims.sub, time::now())
        .await?;
    Ok(Json(StatsResponse { stats }))
}

#[utoipa::path(
    get,
    path = "/api/candidate/interviews/{id}/availability/",
    params(
        ("id" = String, Path, description = "Interview ID")
    ),
    responses(
        (status = 200, description = "Open slots for rescheduling", body = AvailabilityResponse),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn get_availability(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let availability = state
        .interview_service
        .availability(&claims.sub, &id, time::now())
        .await?;
    Ok(Json(AvailabilityResponse { availability }))
}
