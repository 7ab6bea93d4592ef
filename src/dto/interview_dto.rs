use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::interview::{Interview, InterviewFeedback, InterviewType};

// The interview wrappers are generic over the record type: the backend
// fills them with typed `Interview`s, the client with the untouched
// `InterviewRecord` it received.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewListResponse<I = Interview> {
    pub interviews: Vec<I>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterviewResponse<I = Interview> {
    pub interview: I,
}

/// Body of the complete, cancel and feedback-submit endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(bound(deserialize = "I: Deserialize<'de>"))]
pub struct ActionResult<I = Interview> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview: Option<I>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RescheduleRequest {
    pub new_datetime: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CancelRequest {
    #[validate(length(min = 1, max = 1000))]
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedbackResponse {
    pub feedback: InterviewFeedback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreparationResponse {
    pub preparation: PreparationMaterials,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreparationMaterials {
    pub interview_id: String,
    pub interview_type: InterviewType,
    pub tips: Vec<String>,
    pub competencies: Vec<String>,
    pub instructions: Vec<String>,
    pub resources: Vec<PreparationResource>,
    pub estimated_prep_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PreparationResource {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsResponse {
    pub stats: InterviewStats,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewStats {
    pub total: u32,
    pub scheduled: u32,
    pub in_progress: u32,
    pub completed: u32,
    pub cancelled: u32,
    pub rescheduled: u32,
    pub upcoming: u32,
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailabilityResponse {
    pub availability: Availability,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub interview_id: String,
    pub timezone: String,
    pub slots: Vec<TimeSlot>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeSlot {
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start < end && start < self.end
    }
}
