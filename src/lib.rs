pub mod client;
pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod samples;
pub mod services;
pub mod utils;

use std::sync::Arc;

use crate::services::{
    interview_service::InterviewService,
    repository::{InterviewRepository, MemoryRepository, PgRepository},
};

#[derive(Clone)]
pub struct AppState {
    pub interview_service: InterviewService,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    pub fn new(
        repo: Arc<dyn InterviewRepository>,
        jwt_secret: impl Into<Arc<str>>,
        meeting_base_url: impl Into<String>,
    ) -> Self {
        Self {
            interview_service: InterviewService::new(repo, meeting_base_url),
            jwt_secret: jwt_secret.into(),
        }
    }

    /// Backed by PostgreSQL when `DATABASE_URL` is configured, otherwise by
    /// an in-memory store optionally seeded with sample interviews.
    pub async fn from_config(config: &config::Config) -> error::Result<Self> {
        let repo: Arc<dyn InterviewRepository> = match &config.database_url {
            Some(url) => {
                let pool = database::pool::create_pool(url).await?;
                database::pool::run_migrations(&pool).await?;
                tracing::info!("using PostgreSQL interview store");
                Arc::new(PgRepository::new(pool))
            }
            None => {
                tracing::info!("DATABASE_URL not set, using in-memory interview store");
                Arc::new(MemoryRepository::new())
            }
        };

        if let Some(candidate_id) = config.sample_seed_target() {
            let now = utils::time::now();
            for interview in samples::sample_interviews(now) {
                repo.save(candidate_id, &interview).await?;
            }
            tracing::info!(candidate_id = %candidate_id, "seeded sample interviews");
        } else if config.seed_candidate_id.is_some() {
            tracing::warn!("SEED_CANDIDATE_ID is ignored when DATABASE_URL is set");
        }

        Ok(Self::new(
            repo,
            config.jwt_secret.as_str(),
            config.meeting_base_url.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, LogFormat};

    #[tokio::test]
    async fn memory_state_is_seeded_for_the_configured_candidate() {
        let config = Config {
            server_address: "127.0.0.1:0".to_string(),
            jwt_secret: "secret".to_string(),
            api_rps: 10,
            database_url: None,
            meeting_base_url: "https://meet.test".to_string(),
            seed_candidate_id: Some("cand-7".to_string()),
            log_format: LogFormat::Text,
        };

        let state = AppState::from_config(&config).await.unwrap();
        let seeded = state.interview_service.list("cand-7").await.unwrap();
        assert_eq!(seeded.len(), samples::sample_interviews(utils::time::now()).len());
        assert!(state.interview_service.list("cand-8").await.unwrap().is_empty());
    }
}
