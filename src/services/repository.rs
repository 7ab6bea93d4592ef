use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{types::Json, FromRow, PgPool};
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::models::interview::Interview;

/// Change applied to a stored interview while the repository holds it
/// exclusively. Returning an error leaves the record untouched.
pub type Mutation = Box<dyn FnOnce(&mut Interview) -> Result<()> + Send>;

pub fn mutation(f: impl FnOnce(&mut Interview) -> Result<()> + Send + 'static) -> Mutation {
    Box::new(f)
}

/// Storage for interview records, scoped by the owning candidate.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InterviewRepository: Send + Sync {
    /// All interviews of a candidate ordered by scheduled date.
    async fn list_for_candidate(&self, candidate_id: &str) -> Result<Vec<Interview>>;

    async fn find(&self, candidate_id: &str, id: &str) -> Result<Option<Interview>>;

    /// Inserts or replaces the record. Fails with `Conflict` when the id
    /// already belongs to another candidate.
    async fn save(&self, candidate_id: &str, interview: &Interview) -> Result<()>;

    /// Read-modify-write of one record with no other writer in between.
    /// Fails with `NotFound` when the candidate has no such interview.
    async fn update(&self, candidate_id: &str, id: &str, mutate: Mutation) -> Result<Interview>;
}

fn not_found() -> Error {
    Error::NotFound("Interview not found".into())
}

#[derive(Debug, Clone)]
struct StoredInterview {
    candidate_id: String,
    interview: Interview,
}

#[derive(Clone, Default)]
pub struct MemoryRepository {
    records: Arc<RwLock<HashMap<String, StoredInterview>>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl InterviewRepository for MemoryRepository {
    async fn list_for_candidate(&self, candidate_id: &str) -> Result<Vec<Interview>> {
        let records = self.records.read().await;
        let mut interviews: Vec<Interview> = records
            .values()
            .filter(|stored| stored.candidate_id == candidate_id)
            .map(|stored| stored.interview.clone())
            .collect();
        interviews.sort_by(|a, b| {
            a.scheduled_date
                .cmp(&b.scheduled_date)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(interviews)
    }

    async fn find(&self, candidate_id: &str, id: &str) -> Result<Option<Interview>> {
        let records = self.records.read().await;
        Ok(records
            .get(id)
            .filter(|stored| stored.candidate_id == candidate_id)
            .map(|stored| stored.interview.clone()))
    }

    async fn save(&self, candidate_id: &str, interview: &Interview) -> Result<()> {
        let mut records = self.records.write().await;
        if let Some(existing) = records.get(&interview.id) {
            if existing.candidate_id != candidate_id {
                return Err(Error::Conflict(format!(
                    "Interview id {} is already in use",
                    interview.id
                )));
            }
        }
        records.insert(
            interview.id.clone(),
            StoredInterview {
                candidate_id: candidate_id.to_string(),
                interview: interview.clone(),
            },
        );
        Ok(())
    }

    async fn update(&self, candidate_id: &str, id: &str, mutate: Mutation) -> Result<Interview> {
        let mut records = self.records.write().await;
        let stored = records
            .get_mut(id)
            .filter(|stored| stored.candidate_id == candidate_id)
            .ok_or_else(not_found)?;

        let mut updated = stored.interview.clone();
        mutate(&mut updated)?;
        stored.interview = updated.clone();
        Ok(updated)
    }
}

#[derive(Debug, FromRow)]
struct InterviewRow {
    record: Json<Interview>,
}

#[derive(Clone)]
pub struct PgRepository {
    pool: PgPool,
}

impl PgRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InterviewRepository for PgRepository {
    async fn list_for_candidate(&self, candidate_id: &str) -> Result<Vec<Interview>> {
        let rows = sqlx::query_as::<_, InterviewRow>(
            r#"
            SELECT record FROM interviews
            WHERE candidate_id = $1
            ORDER BY scheduled_date ASC, id ASC
            "#,
        )
        .bind(candidate_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|row| row.record.0).collect())
    }

    async fn find(&self, candidate_id: &str, id: &str) -> Result<Option<Interview>> {
        let row = sqlx::query_as::<_, InterviewRow>(
            r#"
            SELECT record FROM interviews
            WHERE id = $1 AND candidate_id = $2
            "#,
        )
        .bind(id)
        .bind(candidate_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|row| row.record.0))
    }

    async fn save(&self, candidate_id: &str, interview: &Interview) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO interviews (id, candidate_id, status, scheduled_date, record)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET status = EXCLUDED.status,
                scheduled_date = EXCLUDED.scheduled_date,
                record = EXCLUDED.record,
                updated_at = NOW()
            WHERE interviews.candidate_id = EXCLUDED.candidate_id
            "#,
        )
        .bind(&interview.id)
        .bind(candidate_id)
        .bind(interview.status.as_str())
        .bind(interview.scheduled_date)
        .bind(Json(interview.clone()))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::Conflict(format!(
                "Interview id {} is already in use",
                interview.id
            )));
        }
        Ok(())
    }

    async fn update(&self, candidate_id: &str, id: &str, mutate: Mutation) -> Result<Interview> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, InterviewRow>(
            r#"
            SELECT record FROM interviews
            WHERE id = $1 AND candidate_id = $2
            FOR UPDATE
            "#,
        )
        .bind(id)
        .bind(candidate_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(not_found)?;

        let mut interview = row.record.0;
        mutate(&mut interview)?;

        sqlx::query(
            r#"
            UPDATE interviews
            SET status = $3, scheduled_date = $4, record = $5, updated_at = NOW()
            WHERE id = $1 AND candidate_id = $2
            "#,
        )
        .bind(id)
        .bind(candidate_id)
        .bind(interview.status.as_str())
        .bind(interview.scheduled_date)
        .bind(Json(interview.clone()))
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(interview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::samples;

    #[tokio::test]
    async fn memory_repository_scopes_by_candidate() {
        let repo = MemoryRepository::new();
        let now = crate::utils::time::now();
        for interview in samples::sample_interviews(now) {
            repo.save("alice", &interview).await.unwrap();
        }

        let listed = repo.list_for_candidate("alice").await.unwrap();
        assert_eq!(listed.len(), samples::sample_interviews(now).len());
        assert!(listed
            .windows(2)
            .all(|pair| pair[0].scheduled_date <= pair[1].scheduled_date));

        assert!(repo.list_for_candidate("bob").await.unwrap().is_empty());
        let id = &listed[0].id;
        assert!(repo.find("bob", id).await.unwrap().is_none());
        assert!(repo.find("alice", id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn memory_repository_rejects_foreign_ids() {
        let repo = MemoryRepository::new();
        let interview = samples::sample_interviews(crate::utils::time::now()).remove(0);
        repo.save("alice", &interview).await.unwrap();

        let err = repo.save("bob", &interview).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn memory_update_is_scoped_and_all_or_nothing() {
        let repo = MemoryRepository::new();
        let interview = samples::sample_interviews(crate::utils::time::now()).remove(0);
        repo.save("alice", &interview).await.unwrap();

        let err = repo
            .update("bob", "sample-1", mutation(|_| Ok(())))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        let err = repo
            .update(
                "alice",
                "sample-1",
                mutation(|interview| {
                    interview.duration = 1;
                    Err(Error::Conflict("rejected".into()))
                }),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        let stored = repo.find("alice", "sample-1").await.unwrap().unwrap();
        assert_eq!(stored.duration, interview.duration);

        let updated = repo
            .update(
                "alice",
                "sample-1",
                mutation(|interview| {
                    interview.duration = 90;
                    Ok(())
                }),
            )
            .await
            .unwrap();
        assert_eq!(updated.duration, 90);
        let stored = repo.find("alice", "sample-1").await.unwrap().unwrap();
        assert_eq!(stored.duration, 90);
    }
}
