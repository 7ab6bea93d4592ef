//! One lookup from status-like enums to the label, color and icon the
//! dashboards show for them.

use serde::Serialize;

use crate::models::interview::{InterviewMode, InterviewStatus, InterviewType};
use crate::models::status::{CandidateStatus, JobStatus, NotificationKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusColor {
    Primary,
    Info,
    Success,
    Warning,
    Error,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DisplayMeta {
    pub label: &'static str,
    pub color: StatusColor,
    pub icon: &'static str,
}

const fn meta(label: &'static str, color: StatusColor, icon: &'static str) -> DisplayMeta {
    DisplayMeta { label, color, icon }
}

pub trait StatusDisplay {
    fn display(&self) -> DisplayMeta;
}

impl StatusDisplay for InterviewStatus {
    fn display(&self) -> DisplayMeta {
        match self {
            InterviewStatus::Scheduled => meta("Scheduled", StatusColor::Primary, "schedule"),
            InterviewStatus::InProgress => meta("In Progress", StatusColor::Warning, "play_circle"),
            InterviewStatus::Completed => meta("Completed", StatusColor::Success, "check_circle"),
            InterviewStatus::Cancelled => meta("Cancelled", StatusColor::Error, "cancel"),
            InterviewStatus::Rescheduled => meta("Rescheduled", StatusColor::Info, "event_repeat"),
        }
    }
}

impl StatusDisplay for InterviewType {
    fn display(&self) -> DisplayMeta {
        match self {
            InterviewType::Technical => meta("Technical", StatusColor::Primary, "code"),
            InterviewType::Behavioral => meta("Behavioral", StatusColor::Info, "psychology"),
            InterviewType::Mixed => meta("Mixed", StatusColor::Warning, "shuffle"),
            InterviewType::Final => meta("Final Round", StatusColor::Success, "emoji_events"),
        }
    }
}

impl StatusDisplay for InterviewMode {
    fn display(&self) -> DisplayMeta {
        match self {
            InterviewMode::VideoCall => meta("Video Call", StatusColor::Primary, "videocam"),
            InterviewMode::PhoneCall => meta("Phone Call", StatusColor::Info, "phone"),
            InterviewMode::InPerson => meta("In Person", StatusColor::Neutral, "person"),
            InterviewMode::AiOnly => meta("AI Interview", StatusColor::Warning, "smart_toy"),
        }
    }
}

impl StatusDisplay for CandidateStatus {
    fn display(&self) -> DisplayMeta {
        match self {
            CandidateStatus::New => meta("New", StatusColor::Info, "fiber_new"),
            CandidateStatus::Screening => meta("Screening", StatusColor::Primary, "search"),
            CandidateStatus::Interviewing => meta("Interviewing", StatusColor::Warning, "forum"),
            CandidateStatus::Offered => meta("Offered", StatusColor::Success, "local_offer"),
            CandidateStatus::Hired => meta("Hired", StatusColor::Success, "how_to_reg"),
            CandidateStatus::Rejected => meta("Rejected", StatusColor::Error, "block"),
        }
    }
}

impl StatusDisplay for JobStatus {
    fn display(&self) -> DisplayMeta {
        match self {
            JobStatus::Draft => meta("Draft", StatusColor::Neutral, "edit_note"),
            JobStatus::Open => meta("Open", StatusColor::Success, "work"),
            JobStatus::Paused => meta("Paused", StatusColor::Warning, "pause_circle"),
            JobStatus::Closed => meta("Closed", StatusColor::Error, "work_off"),
        }
    }
}

impl StatusDisplay for NotificationKind {
    fn display(&self) -> DisplayMeta {
        match self {
            NotificationKind::InterviewScheduled => {
                meta("Interview Scheduled", StatusColor::Primary, "event")
            }
            NotificationKind::InterviewReminder => {
                meta("Interview Reminder", StatusColor::Warning, "alarm")
            }
            NotificationKind::InterviewRescheduled => {
                meta("Interview Rescheduled", StatusColor::Info, "event_repeat")
            }
            NotificationKind::InterviewCancelled => {
                meta("Interview Cancelled", StatusColor::Error, "event_busy")
            }
            NotificationKind::FeedbackReceived => {
                meta("Feedback Received", StatusColor::Success, "rate_review")
            }
            NotificationKind::ApplicationUpdate => {
                meta("Application Update", StatusColor::Neutral, "assignment")
            }
        }
    }
}
