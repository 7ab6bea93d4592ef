use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc, Weekday};
use serde_json::Value as JsonValue;
use tracing::info;
use validator::Validate;

use crate::dto::interview_dto::{
    Availability, InterviewStats, PreparationMaterials, PreparationResource, TimeSlot,
};
use crate::error::{Error, Result};
use crate::models::interview::{
    Interview, InterviewFeedback, InterviewMode, InterviewStatus, InterviewType,
};
use crate::services::repository::{mutation, InterviewRepository};
use crate::utils::token::generate_room_code;

const AVAILABILITY_DAYS: usize = 5;
const AVAILABILITY_HOURS: [u32; 4] = [9, 11, 14, 16];

#[derive(Clone)]
pub struct InterviewService {
    repo: Arc<dyn InterviewRepository>,
    meeting_base_url: String,
}

impl InterviewService {
    pub fn new(repo: Arc<dyn InterviewRepository>, meeting_base_url: impl Into<String>) -> Self {
        Self {
            repo,
            meeting_base_url: meeting_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub async fn list(&self, candidate_id: &str) -> Result<Vec<Interview>> {
        self.repo.list_for_candidate(candidate_id).await
    }

    pub async fn get(&self, candidate_id: &str, id: &str) -> Result<Interview> {
        self.repo
            .find(candidate_id, id)
            .await?
            .ok_or_else(|| Error::NotFound("Interview not found".into()))
    }

    pub async fn join(&self, candidate_id: &str, id: &str, now: DateTime<Utc>) -> Result<Interview> {
        let room_prefix = self.meeting_base_url.clone();
        let interview = self
            .repo
            .update(
                candidate_id,
                id,
                mutation(move |interview| {
                    if interview.status == InterviewStatus::InProgress {
                        return Ok(());
                    }
                    if !interview.status.is_pending() {
                        return Err(Error::Conflict(format!(
                            "Cannot join an interview that is {}",
                            interview.status
                        )));
                    }
                    if !interview.can_join(now) {
                        return Err(Error::BadRequest(
                            "Interview is not joinable at this time".into(),
                        ));
                    }

                    interview.status = InterviewStatus::InProgress;
                    if interview.mode == InterviewMode::VideoCall
                        && interview.meeting_link.is_none()
                    {
                        interview.meeting_link =
                            Some(format!("{}/{}", room_prefix, generate_room_code(10)));
                    }
                    Ok(())
                }),
            )
            .await?;
        info!(candidate_id, interview_id = id, "candidate joined interview");
        Ok(interview)
    }

    pub async fn complete(
        &self,
        candidate_id: &str,
        id: &str,
        feedback: InterviewFeedback,
    ) -> Result<Interview> {
        feedback.validate()?;
        let interview = self
            .repo
            .update(
                candidate_id,
                id,
                mutation(move |interview| {
                    if interview.status != InterviewStatus::InProgress {
                        return Err(Error::Conflict(format!(
                            "Only an interview in progress can be completed (status: {})",
                            interview.status
                        )));
                    }
                    interview.status = InterviewStatus::Completed;
                    interview.feedback = Some(feedback);
                    Ok(())
                }),
            )
            .await?;
        info!(candidate_id, interview_id = id, "interview completed");
        Ok(interview)
    }

    pub async fn reschedule(
        &self,
        candidate_id: &str,
        id: &str,
        new_datetime: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> Result<Interview> {
        if new_datetime <= now {
            return Err(Error::BadRequest(
                "new_datetime must be in the future".into(),
            ));
        }
        let interview = self
            .repo
            .update(
                candidate_id,
                id,
                mutation(move |interview| {
                    if !interview.status.is_pending() {
                        return Err(Error::Conflict(format!(
                            "Cannot reschedule an interview that is {}",
                            interview.status
                        )));
                    }
                    interview.scheduled_date = new_datetime;
                    interview.status = InterviewStatus::Rescheduled;
                    Ok(())
                }),
            )
            .await?;
        info!(candidate_id, interview_id = id, %new_datetime, "interview rescheduled");
        Ok(interview)
    }

    pub async fn cancel(&self, candidate_id: &str, id: &str, reason: &str) -> Result<Interview> {
        let reason = reason.trim().to_string();
        if reason.is_empty() {
            return Err(Error::BadRequest("A cancellation reason is required".into()));
        }
        let interview = self
            .repo
            .update(
                candidate_id,
                id,
                mutation(move |interview| {
                    if interview.status.is_terminal() {
                        return Err(Error::Conflict(format!(
                            "Cannot cancel an interview that is {}",
                            interview.status
                        )));
                    }
                    interview.status = InterviewStatus::Cancelled;
                    interview
                        .extra
                        .insert("cancellationReason".to_string(), JsonValue::String(reason));
                    Ok(())
                }),
            )
            .await?;
        info!(candidate_id, interview_id = id, "interview cancelled");
        Ok(interview)
    }

    pub async fn feedback(&self, candidate_id: &str, id: &str) -> Result<InterviewFeedback> {
        self.get(candidate_id, id)
            .await?
            .feedback
            .ok_or_else(|| Error::NotFound("No feedback submitted for this interview".into()))
    }

    pub async fn submit_feedback(
        &self,
        candidate_id: &str,
        id: &str,
        feedback: InterviewFeedback,
    ) -> Result<Interview> {
        feedback.validate()?;
        let interview = self
            .repo
            .update(
                candidate_id,
                id,
                mutation(move |interview| {
                    if interview.status != InterviewStatus::Completed {
                        return Err(Error::Conflict(
                            "Feedback can only be submitted for a completed interview".into(),
                        ));
                    }
                    interview.feedback = Some(feedback);
                    Ok(())
                }),
            )
            .await?;
        info!(candidate_id, interview_id = id, "feedback submitted");
        Ok(interview)
    }

    pub async fn preparation(&self, candidate_id: &str, id: &str) -> Result<PreparationMaterials> {
        let interview = self.get(candidate_id, id).await?;
        Ok(preparation_for(&interview))
    }

    pub async fn stats(&self, candidate_id: &str, now: DateTime<Utc>) -> Result<InterviewStats> {
        let interviews = self.list(candidate_id).await?;
        Ok(compute_stats(&interviews, now))
    }

    pub async fn availability(
        &self,
        candidate_id: &str,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<Availability> {
        let interviews = self.list(candidate_id).await?;
        let interview = interviews
            .iter()
            .find(|i| i.id == id)
            .ok_or_else(|| Error::NotFound("Interview not found".into()))?;
        let busy: Vec<&Interview> = interviews
            .iter()
            .filter(|i| i.id != id && !i.status.is_terminal())
            .collect();

        let length = Duration::minutes(i64::from(interview.duration.max(1)));
        let mut slots = Vec::new();
        for day in next_weekdays(now, AVAILABILITY_DAYS) {
            for hour in AVAILABILITY_HOURS {
                let Some(naive) = day.and_hms_opt(hour, 0, 0) else {
                    continue;
                };
                let start = Utc.from_utc_datetime(&naive);
                let slot = TimeSlot {
                    start,
                    end: start + length,
                };
                if busy
                    .iter()
                    .all(|other| !slot.overlaps(other.scheduled_date, other.ends_at()))
                {
                    slots.push(slot);
                }
            }
        }

        Ok(Availability {
            interview_id: interview.id.clone(),
            timezone: "UTC".to_string(),
            slots,
        })
    }
}

fn next_weekdays(now: DateTime<Utc>, count: usize) -> Vec<chrono::NaiveDate> {
    let mut days = Vec::with_capacity(count);
    let mut day = now.date_naive();
    while days.len() < count {
        day = match day.succ_opt() {
            Some(next) => next,
            None => break,
        };
        if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
            days.push(day);
        }
    }
    days
}

pub fn compute_stats(interviews: &[Interview], now: DateTime<Utc>) -> InterviewStats {
    let mut stats = InterviewStats {
        total: interviews.len() as u32,
        ..Default::default()
    };
    let mut rating_sum = 0u32;
    let mut rated = 0u32;

    for interview in interviews {
        match interview.status {
            InterviewStatus::Scheduled => stats.scheduled += 1,
            InterviewStatus::InProgress => stats.in_progress += 1,
            InterviewStatus::Completed => stats.completed += 1,
            InterviewStatus::Cancelled => stats.cancelled += 1,
            InterviewStatus::Rescheduled => stats.rescheduled += 1,
        }
        if interview.status.is_pending() && interview.is_upcoming(now) {
            stats.upcoming += 1;
        }
        if let Some(feedback) = &interview.feedback {
            rating_sum += u32::from(feedback.overall_rating);
            rated += 1;
        }
    }

    if rated > 0 {
        stats.average_rating = Some(f64::from(rating_sum) / f64::from(rated));
    }
    stats
}

pub fn preparation_for(interview: &Interview) -> PreparationMaterials {
    let (tips, resources): (&[&str], &[(&str, &str)]) = match interview.interview_type {
        InterviewType::Technical => (
            &[
                "Review the data structures and algorithms used in your recent work",
                "Think aloud while solving problems",
                "Ask clarifying questions before writing code",
            ],
            &[
                ("System design primer", "https://github.com/donnemartin/system-design-primer"),
                ("Big-O cheat sheet", "https://www.bigocheatsheet.com"),
            ],
        ),
        InterviewType::Behavioral => (
            &[
                "Prepare stories using the situation, task, action, result structure",
                "Pick examples that show ownership and collaboration",
            ],
            &[("The STAR method", "https://www.themuse.com/advice/star-interview-method")],
        ),
        InterviewType::Mixed => (
            &[
                "Balance preparation between coding practice and past-experience stories",
                "Keep answers concise so both parts fit the time slot",
            ],
            &[
                ("System design primer", "https://github.com/donnemartin/system-design-primer"),
                ("The STAR method", "https://www.themuse.com/advice/star-interview-method"),
            ],
        ),
        InterviewType::Final => (
            &[
                "Research the company's product, customers and recent announcements",
                "Prepare questions about team goals and expectations for the role",
            ],
            &[],
        ),
    };

    let estimated_prep_minutes = 30
        + 15 * interview.competencies.len() as u32
        + match interview.interview_type {
            InterviewType::Technical | InterviewType::Mixed => 60,
            InterviewType::Behavioral | InterviewType::Final => 30,
        };

    PreparationMaterials {
        interview_id: interview.id.clone(),
        interview_type: interview.interview_type,
        tips: tips.iter().map(|s| s.to_string()).collect(),
        competencies: interview.competencies.clone(),
        instructions: interview.instructions.clone(),
        resources: resources
            .iter()
            .map(|(title, url)| PreparationResource {
                title: title.to_string(),
                url: url.to_string(),
            })
            .collect(),
        estimated_prep_minutes,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples::sample_interviews;
    use crate::services::repository::{MemoryRepository, MockInterviewRepository};
    use tokio_test::{assert_err, assert_ok};

    fn feedback(overall: u8) -> InterviewFeedback {
        InterviewFeedback {
            overall_rating: overall,
            technical_skills: 4,
            communication: 4,
            problem_solving: 3,
            cultural_fit: 5,
            comments: Some("Clear reasoning".into()),
        }
    }

    async fn seeded(now: DateTime<Utc>) -> InterviewService {
        let repo = MemoryRepository::new();
        for interview in sample_interviews(now) {
            repo.save("cand", &interview).await.unwrap();
        }
        InterviewService::new(Arc::new(repo), "https://meet.test/")
    }

    #[tokio::test]
    async fn join_then_complete_stores_feedback() {
        let now = Utc::now();
        let service = seeded(now).await;

        let joined = assert_ok!(service.join("cand", "sample-1", now).await);
        assert_eq!(joined.status, InterviewStatus::InProgress);
        // Joining again is a no-op.
        assert_ok!(service.join("cand", "sample-1", now).await);

        let completed = assert_ok!(service.complete("cand", "sample-1", feedback(5)).await);
        assert_eq!(completed.status, InterviewStatus::Completed);
        assert_eq!(
            assert_ok!(service.feedback("cand", "sample-1").await).overall_rating,
            5
        );
    }

    #[tokio::test]
    async fn join_outside_window_is_rejected() {
        let now = Utc::now();
        let service = seeded(now).await;

        // Twenty hours out.
        let err = assert_err!(service.join("cand", "sample-2", now).await);
        assert!(matches!(err, Error::BadRequest(_)));

        // Completed interviews cannot be joined at all.
        let err = assert_err!(service.join("cand", "sample-4", now).await);
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn join_generates_link_for_video_calls_without_one() {
        let now = Utc::now();
        let repo = MemoryRepository::new();
        let mut interview = sample_interviews(now).remove(0);
        interview.meeting_link = None;
        repo.save("cand", &interview).await.unwrap();
        let service = InterviewService::new(Arc::new(repo), "https://meet.test/");

        let joined = service.join("cand", "sample-1", now).await.unwrap();
        let link = joined.meeting_link.unwrap();
        assert!(link.starts_with("https://meet.test/"));
        assert_eq!(link.len(), "https://meet.test/".len() + 10);
    }

    #[tokio::test]
    async fn reschedule_requires_future_time_and_pending_status() {
        let now = Utc::now();
        let service = seeded(now).await;

        let err = assert_err!(service.reschedule("cand", "sample-3", now, now).await);
        assert!(matches!(err, Error::BadRequest(_)));

        let later = now + Duration::days(7);
        let moved = assert_ok!(service.reschedule("cand", "sample-3", later, now).await);
        assert_eq!(moved.scheduled_date, later);
        assert_eq!(moved.status, InterviewStatus::Rescheduled);

        let err = assert_err!(service.reschedule("cand", "sample-5", later, now).await);
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn cancel_records_reason_and_is_final() {
        let now = Utc::now();
        let service = seeded(now).await;

        let err = assert_err!(service.cancel("cand", "sample-3", "   ").await);
        assert!(matches!(err, Error::BadRequest(_)));

        let cancelled = assert_ok!(service.cancel("cand", "sample-3", "Accepted another offer").await);
        assert_eq!(cancelled.status, InterviewStatus::Cancelled);
        assert_eq!(cancelled.extra["cancellationReason"], "Accepted another offer");

        let err = assert_err!(service.cancel("cand", "sample-3", "again").await);
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn feedback_rules() {
        let now = Utc::now();
        let service = seeded(now).await;

        let err = assert_err!(service.feedback("cand", "sample-3").await);
        assert!(matches!(err, Error::NotFound(_)));

        let err = assert_err!(service.submit_feedback("cand", "sample-3", feedback(4)).await);
        assert!(matches!(err, Error::Conflict(_)));

        let err = assert_err!(service.submit_feedback("cand", "sample-4", feedback(9)).await);
        assert!(matches!(err, Error::Validation(_)));

        let updated = assert_ok!(service.submit_feedback("cand", "sample-4", feedback(2)).await);
        assert_eq!(updated.feedback.unwrap().overall_rating, 2);
    }

    #[tokio::test]
    async fn stats_count_statuses_and_upcoming() {
        let now = Utc::now();
        let service = seeded(now).await;

        let stats = service.stats("cand", now).await.unwrap();
        assert_eq!(stats.total, 5);
        assert_eq!(stats.scheduled, 2);
        assert_eq!(stats.rescheduled, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.cancelled, 1);
        // sample-1 (30 min) and sample-2 (20 h) fall inside the next day.
        assert_eq!(stats.upcoming, 2);
        assert_eq!(stats.average_rating, Some(4.0));

        let empty = service.stats("nobody", now).await.unwrap();
        assert_eq!(empty, InterviewStats::default());
    }

    #[tokio::test]
    async fn availability_lists_weekday_slots_without_clashes() {
        let now = Utc.with_ymd_and_hms(2026, 5, 8, 12, 0, 0).unwrap(); // Friday
        let service = seeded(now).await;

        let availability = service.availability("cand", "sample-1", now).await.unwrap();
        assert_eq!(availability.timezone, "UTC");
        assert!(availability
            .slots
            .iter()
            .all(|slot| !matches!(slot.start.weekday(), Weekday::Sat | Weekday::Sun)));
        assert!(availability.slots.iter().all(|slot| slot.start > now));
        assert!(availability
            .slots
            .iter()
            .all(|slot| slot.end - slot.start == Duration::minutes(60)));
        // Monday 11 May 09:00 is the first candidate slot.
        assert_eq!(
            availability.slots[0].start,
            Utc.with_ymd_and_hms(2026, 5, 11, 9, 0, 0).unwrap()
        );
        assert!(availability.slots.len() <= AVAILABILITY_DAYS * AVAILABILITY_HOURS.len());
    }

    #[tokio::test]
    async fn availability_skips_busy_slots() {
        let now = Utc.with_ymd_and_hms(2026, 5, 8, 12, 0, 0).unwrap();
        let repo = MemoryRepository::new();
        let mut samples = sample_interviews(now);
        // Occupy Monday 11:00-12:00 with another interview.
        samples[2].scheduled_date = Utc.with_ymd_and_hms(2026, 5, 11, 11, 0, 0).unwrap();
        samples[2].duration = 60;
        for interview in &samples {
            repo.save("cand", interview).await.unwrap();
        }
        let service = InterviewService::new(Arc::new(repo), "https://meet.test");

        let availability = service.availability("cand", "sample-1", now).await.unwrap();
        let clash = Utc.with_ymd_and_hms(2026, 5, 11, 11, 0, 0).unwrap();
        assert!(availability.slots.iter().all(|slot| slot.start != clash));
        assert_eq!(availability.slots.len(), AVAILABILITY_DAYS * AVAILABILITY_HOURS.len() - 1);
    }

    #[tokio::test]
    async fn preparation_reflects_interview_type() {
        let now = Utc::now();
        let service = seeded(now).await;

        let prep = service.preparation("cand", "sample-2").await.unwrap();
        assert_eq!(prep.interview_type, InterviewType::Behavioral);
        assert_eq!(prep.competencies, vec!["Communication", "User research"]);
        assert_eq!(prep.estimated_prep_minutes, 30 + 30 + 30);
        assert!(!prep.tips.is_empty());
    }

    /// Memory store whose reads stall, widening any window between a read
    /// and the following write.
    struct SlowReads(MemoryRepository);

    #[async_trait::async_trait]
    impl InterviewRepository for SlowReads {
        async fn list_for_candidate(&self, candidate_id: &str) -> Result<Vec<Interview>> {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            self.0.list_for_candidate(candidate_id).await
        }

        async fn find(&self, candidate_id: &str, id: &str) -> Result<Option<Interview>> {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            self.0.find(candidate_id, id).await
        }

        async fn save(&self, candidate_id: &str, interview: &Interview) -> Result<()> {
            self.0.save(candidate_id, interview).await
        }

        async fn update(
            &self,
            candidate_id: &str,
            id: &str,
            mutate: crate::services::repository::Mutation,
        ) -> Result<Interview> {
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
            self.0.update(candidate_id, id, mutate).await
        }
    }

    #[tokio::test]
    async fn concurrent_transitions_have_one_winner() {
        let now = Utc::now();
        let memory = MemoryRepository::new();
        let mut interview = sample_interviews(now).remove(0);
        interview.status = InterviewStatus::InProgress;
        memory.save("cand", &interview).await.unwrap();
        let service = InterviewService::new(Arc::new(SlowReads(memory)), "https://meet.test");

        let (completed, cancelled) = tokio::join!(
            service.complete("cand", "sample-1", feedback(4)),
            service.cancel("cand", "sample-1", "Double booked"),
        );
        assert!(
            completed.is_ok() != cancelled.is_ok(),
            "exactly one transition may succeed"
        );

        let stored = service.get("cand", "sample-1").await.unwrap();
        if completed.is_ok() {
            assert_eq!(stored.status, InterviewStatus::Completed);
            assert!(matches!(cancelled.unwrap_err(), Error::Conflict(_)));
        } else {
            assert_eq!(stored.status, InterviewStatus::Cancelled);
            assert!(stored.feedback.is_none());
            assert!(matches!(completed.unwrap_err(), Error::Conflict(_)));
        }
    }

    #[tokio::test]
    async fn repository_errors_propagate() {
        let mut repo = MockInterviewRepository::new();
        repo.expect_update()
            .times(1)
            .returning(|_, _, _| Err(Error::NotFound("Interview not found".into())));
        repo.expect_list_for_candidate()
            .returning(|_| Err(Error::Internal("storage offline".into())));
        repo.expect_save().never();
        let service = InterviewService::new(Arc::new(repo), "https://meet.test");

        let err = assert_err!(service.join("cand", "missing", Utc::now()).await);
        assert!(matches!(err, Error::NotFound(_)));

        let err = assert_err!(service.stats("cand", Utc::now()).await);
        assert!(matches!(err, Error::Internal(_)));
    }
}
