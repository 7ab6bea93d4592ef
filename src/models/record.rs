use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::models::interview::{Interview, InterviewMode, InterviewStatus, InterviewType};
use crate::utils::time;

/// An interview exactly as the API returned it.
///
/// The client never reshapes these: whatever JSON arrived is what gets
/// serialized back out. The accessors read individual fields leniently and
/// yield `None` for anything missing or not in the expected form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterviewRecord(pub JsonValue);

impl InterviewRecord {
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.0.get(key)
    }

    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(JsonValue::as_str)
    }

    /// String ids are returned as-is, numeric ids in their decimal form.
    pub fn id(&self) -> Option<String> {
        match self.get("id")? {
            JsonValue::String(id) => Some(id.clone()),
            JsonValue::Number(id) => Some(id.to_string()),
            _ => None,
        }
    }

    pub fn scheduled_date(&self) -> Option<DateTime<Utc>> {
        time::from_rfc3339(self.str_field("scheduledDate")?).ok()
    }

    pub fn duration_minutes(&self) -> Option<u32> {
        self.get("duration")?.as_u64()?.try_into().ok()
    }

    pub fn status(&self) -> Option<InterviewStatus> {
        self.str_field("status")?.parse().ok()
    }

    pub fn interview_type(&self) -> Option<InterviewType> {
        self.str_field("type")?.parse().ok()
    }

    pub fn mode(&self) -> Option<InterviewMode> {
        self.str_field("mode")?.parse().ok()
    }

    pub fn meeting_link(&self) -> Option<&str> {
        self.str_field("meetingLink")
    }

    pub fn is_upcoming(&self, now: DateTime<Utc>) -> bool {
        self.scheduled_date()
            .is_some_and(|scheduled| time::is_upcoming(scheduled, now))
    }

    pub fn can_join(&self, now: DateTime<Utc>) -> bool {
        self.scheduled_date()
            .is_some_and(|scheduled| time::can_join(scheduled, now))
    }
}

impl From<&Interview> for InterviewRecord {
    fn from(interview: &Interview) -> Self {
        // A struct with string keys always serializes.
        Self(serde_json::to_value(interview).unwrap_or_default())
    }
}
