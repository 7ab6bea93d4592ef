use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::{header, Client, Method};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;
use url::Url;

use crate::client::envelope::Envelope;
use crate::client::token::TokenProvider;
use crate::dto::interview_dto::{
    ActionResult, AvailabilityResponse, FeedbackResponse, InterviewListResponse,
    InterviewResponse, PreparationResponse, StatsResponse,
};
use crate::error::{Error, Result};
use crate::models::interview::InterviewFeedback;
use crate::models::record::InterviewRecord;

pub const INTERVIEWS_PATH: &str = "api/candidate/interviews/";

/// Client for the candidate interview endpoints.
///
/// Every call resolves to an [`Envelope`]: any transport failure, non-2xx
/// status or undecodable body becomes `Envelope::Failure` and nothing is
/// ever returned as an `Err`. Interview records come back as
/// [`InterviewRecord`]s, byte-for-byte the JSON the server sent.
#[derive(Clone)]
pub struct InterviewClient {
    client: Client,
    base_url: Url,
    tokens: Arc<dyn TokenProvider>,
}

impl InterviewClient {
    pub fn new(api_base_url: &str, tokens: impl TokenProvider + 'static) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;
        Self::with_client(client, api_base_url, tokens)
    }

    pub fn with_client(
        client: Client,
        api_base_url: &str,
        tokens: impl TokenProvider + 'static,
    ) -> Result<Self> {
        let mut root = Url::parse(api_base_url.trim())?;
        if root.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "API base URL cannot be used as a base: {}",
                api_base_url
            )));
        }
        if !root.path().ends_with('/') {
            let path = format!("{}/", root.path());
            root.set_path(&path);
        }
        let base_url = root.join(INTERVIEWS_PATH)?;

        Ok(Self {
            client,
            base_url,
            tokens: Arc::new(tokens),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// URL of `/{segments...}/` under the interviews base, with each segment
    /// percent-encoded.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            path.extend(segments);
            path.push("");
        }
        url
    }

    pub async fn list_interviews(&self) -> Envelope<InterviewListResponse<InterviewRecord>> {
        self.send(Method::GET, &[], None::<&()>, "Failed to fetch interviews")
            .await
    }

    pub async fn interview_details(
        &self,
        id: &str,
    ) -> Envelope<InterviewResponse<InterviewRecord>> {
        self.send(Method::GET, &[id], None::<&()>, "Failed to fetch interview details")
            .await
    }

    pub async fn join_interview(&self, id: &str) -> Envelope<InterviewResponse<InterviewRecord>> {
        self.send(Method::POST, &[id, "join"], None::<&()>, "Failed to join interview")
            .await
    }

    pub async fn complete_interview(
        &self,
        id: &str,
        feedback: &InterviewFeedback,
    ) -> Envelope<ActionResult<InterviewRecord>> {
        self.send(
            Method::POST,
            &[id, "complete"],
            Some(feedback),
            "Failed to complete interview",
        )
        .await
    }

    pub async fn reschedule_interview(
        &self,
        id: &str,
        new_datetime: DateTime<Utc>,
    ) -> Envelope<InterviewResponse<InterviewRecord>> {
        let body = json!({ "new_datetime": new_datetime });
        self.send(
            Method::POST,
            &[id, "reschedule"],
            Some(&body),
            "Failed to reschedule interview",
        )
        .await
    }

    pub async fn cancel_interview(
        &self,
        id: &str,
        reason: &str,
    ) -> Envelope<ActionResult<InterviewRecord>> {
        let body = json!({ "reason": reason });
        self.send(
            Method::POST,
            &[id, "cancel"],
            Some(&body),
            "Failed to cancel interview",
        )
        .await
    }

    pub async fn interview_feedback(&self, id: &str) -> Envelope<FeedbackResponse> {
        self.send(Method::GET, &[id, "feedback"], None::<&()>, "Failed to fetch feedback")
            .await
    }

    pub async fn submit_feedback(
        &self,
        id: &str,
        feedback: &InterviewFeedback,
    ) -> Envelope<ActionResult<InterviewRecord>> {
        self.send(
            Method::POST,
            &[id, "feedback"],
            Some(feedback),
            "Failed to submit feedback",
        )
        .await
    }

    pub async fn preparation_materials(&self, id: &str) -> Envelope<PreparationResponse> {
        self.send(
            Method::GET,
            &[id, "preparation"],
            None::<&()>,
            "Failed to fetch preparation materials",
        )
        .await
    }

    pub async fn interview_stats(&self) -> Envelope<StatsResponse> {
        self.send(Method::GET, &["stats"], None::<&()>, "Failed to fetch interview stats")
            .await
    }

    pub async fn availability(&self, id: &str) -> Envelope<AvailabilityResponse> {
        self.send(
            Method::GET,
            &[id, "availability"],
            None::<&()>,
            "Failed to fetch availability",
        )
        .await
    }

    async fn send<T, B>(
        &self,
        method: Method,
        segments: &[&str],
        body: Option<&B>,
        failure: &str,
    ) -> Envelope<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(segments);
        let mut request = self
            .client
            .request(method.clone(), url.clone())
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = self.tokens.token() {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(%method, %url, error = %e, "interview API request failed");
                return Envelope::failure(e.to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%method, %url, %status, "interview API returned an error status");
            return Envelope::failure(failure);
        }

        match response.json::<T>().await {
            Ok(data) => Envelope::Success(data),
            Err(e) => {
                tracing::warn!(%method, %url, error = %e, "interview API returned an unreadable body");
                Envelope::failure(e.to_string())
            }
        }
    }
}
