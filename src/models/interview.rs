use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;
use std::str::FromStr;
use validator::Validate;

use crate::utils::time;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Interview {
    pub id: String,
    pub job_title: String,
    pub company: String,
    pub interviewer: Interviewer,
    pub scheduled_date: DateTime<Utc>,
    /// Minutes.
    pub duration: u32,
    pub status: InterviewStatus,
    #[serde(rename = "type")]
    pub interview_type: InterviewType,
    pub mode: InterviewMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meeting_link: Option<String>,
    #[serde(default)]
    pub instructions: Vec<String>,
    #[serde(default)]
    pub competencies: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<InterviewFeedback>,
    /// Fields this crate does not model, carried through untouched.
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

impl Interview {
    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        time::is_upcoming(self.scheduled_date, now)
    }

    pub fn can_join(&self, now: DateTime<Utc>) -> bool {
        time::can_join(self.scheduled_date, now)
    }

    pub fn ends_at(&self) -> DateTime<Utc> {
        self.scheduled_date + chrono::Duration::minutes(i64::from(self.duration))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interviewer {
    pub name: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InterviewFeedback {
    #[validate(range(min = 1, max = 5))]
    pub overall_rating: u8,
    #[validate(range(min = 1, max = 5))]
    pub technical_skills: u8,
    #[validate(range(min = 1, max = 5))]
    pub communication: u8,
    #[validate(range(min = 1, max = 5))]
    pub problem_solving: u8,
    #[validate(range(min = 1, max = 5))]
    pub cultural_fit: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewStatus {
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
    Rescheduled,
}

impl InterviewStatus {
    pub const ALL: [InterviewStatus; 5] = [
        InterviewStatus::Scheduled,
        InterviewStatus::InProgress,
        InterviewStatus::Completed,
        InterviewStatus::Cancelled,
        InterviewStatus::Rescheduled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewStatus::Scheduled => "scheduled",
            InterviewStatus::InProgress => "in_progress",
            InterviewStatus::Completed => "completed",
            InterviewStatus::Cancelled => "cancelled",
            InterviewStatus::Rescheduled => "rescheduled",
        }
    }

    /// Scheduled or rescheduled, not yet started.
    pub fn is_pending(&self) -> bool {
        matches!(self, InterviewStatus::Scheduled | InterviewStatus::Rescheduled)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, InterviewStatus::Completed | InterviewStatus::Cancelled)
    }
}

impl fmt::Display for InterviewStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for InterviewStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        InterviewStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown interview status: {}", s))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewType {
    Technical,
    Behavioral,
    Mixed,
    Final,
}

impl InterviewType {
    pub const ALL: [InterviewType; 4] = [
        InterviewType::Technical,
        InterviewType::Behavioral,
        InterviewType::Mixed,
        InterviewType::Final,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewType::Technical => "technical",
            InterviewType::Behavioral => "behavioral",
            InterviewType::Mixed => "mixed",
            InterviewType::Final => "final",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterviewMode {
    VideoCall,
    PhoneCall,
    InPerson,
    AiOnly,
}

impl InterviewMode {
    pub const ALL: [InterviewMode; 4] = [
        InterviewMode::VideoCall,
        InterviewMode::PhoneCall,
        InterviewMode::InPerson,
        InterviewMode::AiOnly,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            InterviewMode::VideoCall => "video_call",
            InterviewMode::PhoneCall => "phone_call",
            InterviewMode::InPerson => "in_person",
            InterviewMode::AiOnly => "ai_only",
        }
    }
}

impl FromStr for InterviewType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        InterviewType::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown interview type: {}", s))
    }
}

impl FromStr for InterviewMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        InterviewMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| format!("unknown interview mode: {}", s))
    }
}
