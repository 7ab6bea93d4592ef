//! Sample interviews shown when the API cannot be reached, also used to seed
//! a development backend. Dates are relative to `now` so every lifecycle
//! state is represented whenever they are generated.

use chrono::{DateTime, Duration, Utc};
use serde_json::Map;

use crate::models::interview::{
    Interview, InterviewFeedback, InterviewMode, InterviewStatus, InterviewType, Interviewer,
};

fn interviewer(name: &str, role: &str) -> Interviewer {
    Interviewer {
        name: name.to_string(),
        role: role.to_string(),
        avatar: None,
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn sample_interviews(now: DateTime<Utc>) -> Vec<Interview> {
    vec![
        Interview {
            id: "sample-1".to_string(),
            job_title: "Senior Backend Engineer".to_string(),
            company: "Northwind Labs".to_string(),
            interviewer: interviewer("Priya Raman", "Engineering Manager"),
            scheduled_date: now + Duration::minutes(30),
            duration: 60,
            status: InterviewStatus::Scheduled,
            interview_type: InterviewType::Technical,
            mode: InterviewMode::VideoCall,
            meeting_link: Some("https://meet.example.com/northwind-backend".to_string()),
            instructions: strings(&[
                "Join five minutes early to test audio and video",
                "Have a code editor open and ready to share",
                "Expect a system design discussion in the second half",
            ]),
            competencies: strings(&["Rust", "Distributed systems", "SQL"]),
            feedback: None,
            extra: Map::new(),
        },
        Interview {
            id: "sample-2".to_string(),
            job_title: "Product Designer".to_string(),
            company: "Bluefin Studio".to_string(),
            interviewer: interviewer("Marcus Lee", "Head of Design"),
            scheduled_date: now + Duration::hours(20),
            duration: 45,
            status: InterviewStatus::Rescheduled,
            interview_type: InterviewType::Behavioral,
            mode: InterviewMode::PhoneCall,
            meeting_link: None,
            instructions: strings(&[
                "Prepare two portfolio case studies",
                "Be ready to discuss collaboration with engineers",
            ]),
            competencies: strings(&["Communication", "User research"]),
            feedback: None,
            extra: Map::new(),
        },
        Interview {
            id: "sample-3".to_string(),
            job_title: "Data Analyst".to_string(),
            company: "Harbor Analytics".to_string(),
            interviewer: interviewer("AI Interviewer", "Automated Screening"),
            scheduled_date: now + Duration::days(3),
            duration: 30,
            status: InterviewStatus::Scheduled,
            interview_type: InterviewType::Mixed,
            mode: InterviewMode::AiOnly,
            meeting_link: None,
            instructions: strings(&["Use a quiet room", "Answers are recorded"]),
            competencies: strings(&["SQL", "Statistics", "Storytelling"]),
            feedback: None,
            extra: Map::new(),
        },
        Interview {
            id: "sample-4".to_string(),
            job_title: "Platform Engineer".to_string(),
            company: "Northwind Labs".to_string(),
            interviewer: interviewer("Elena Petrova", "VP Engineering"),
            scheduled_date: now - Duration::days(2),
            duration: 60,
            status: InterviewStatus::Completed,
            interview_type: InterviewType::Final,
            mode: InterviewMode::InPerson,
            meeting_link: None,
            instructions: strings(&["Bring a photo ID for building access"]),
            competencies: strings(&["Leadership", "Kubernetes"]),
            feedback: Some(InterviewFeedback {
                overall_rating: 4,
                technical_skills: 5,
                communication: 4,
                problem_solving: 4,
                cultural_fit: 3,
                comments: Some("Strong on infrastructure, keen to learn the product side".to_string()),
            }),
            extra: Map::new(),
        },
        Interview {
            id: "sample-5".to_string(),
            job_title: "QA Engineer".to_string(),
            company: "Bluefin Studio".to_string(),
            interviewer: interviewer("Tom Becker", "QA Lead"),
            scheduled_date: now - Duration::days(5),
            duration: 45,
            status: InterviewStatus::Cancelled,
            interview_type: InterviewType::Technical,
            mode: InterviewMode::VideoCall,
            meeting_link: None,
            instructions: Vec::new(),
            competencies: strings(&["Test automation"]),
            feedback: None,
            extra: Map::new(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn samples_cover_the_dashboard_states() {
        let now = Utc::now();
        let samples = sample_interviews(now);

        assert!(samples.iter().any(|i| i.can_join(now)));
        assert!(samples.iter().any(|i| i.is_upcoming(now) && !i.can_join(now)));
        for status in InterviewStatus::ALL {
            if status == InterviewStatus::InProgress {
                continue;
            }
            assert!(samples.iter().any(|i| i.status == status), "missing {}", status);
        }
    }
}
