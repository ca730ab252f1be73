//! Remote scraping service client (Apify REST API v2).
//!
//! `ScrapeService` is the seam the orchestrator depends on. `ApifyClient` is the
//! production implementation; tests use the scripted fake in `scraping::fake`.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

/// One dataset record as the actor wrote it. Schema varies by actor.
pub type RawRecord = Map<String, Value>;

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("run {0} succeeded without a dataset")]
    MissingDataset(String),
}

/// Lifecycle state of a remote actor run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RunStatus {
    Pending,
    Running,
    Succeeded,
    Failed,
    Aborting,
    Aborted,
    TimingOut,
    TimedOut,
    /// A status string this client does not know. Treated as still in flight.
    Unknown(String),
}

impl RunStatus {
    /// Terminal statuses never transition again.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunStatus::Succeeded | RunStatus::Failed | RunStatus::Aborted | RunStatus::TimedOut
        )
    }

    pub fn as_str(&self) -> &str {
        match self {
            RunStatus::Pending => "READY",
            RunStatus::Running => "RUNNING",
            RunStatus::Succeeded => "SUCCEEDED",
            RunStatus::Failed => "FAILED",
            RunStatus::Aborting => "ABORTING",
            RunStatus::Aborted => "ABORTED",
            RunStatus::TimingOut => "TIMING-OUT",
            RunStatus::TimedOut => "TIMED-OUT",
            RunStatus::Unknown(s) => s,
        }
    }
}

impl From<String> for RunStatus {
    fn from(s: String) -> Self {
        match s.to_ascii_uppercase().as_str() {
            "READY" | "PENDING" => RunStatus::Pending,
            "RUNNING" => RunStatus::Running,
            "SUCCEEDED" => RunStatus::Succeeded,
            "FAILED" => RunStatus::Failed,
            "ABORTING" => RunStatus::Aborting,
            "ABORTED" => RunStatus::Aborted,
            "TIMING-OUT" => RunStatus::TimingOut,
            "TIMED-OUT" => RunStatus::TimedOut,
            _ => RunStatus::Unknown(s),
        }
    }
}

impl From<RunStatus> for String {
    fn from(status: RunStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Handle on one remote actor execution.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRun {
    pub id: String,
    pub status: RunStatus,
    pub default_dataset_id: Option<String>,
}

#[async_trait]
pub trait ScrapeService: Send + Sync {
    /// Starts an actor run and returns immediately with its initial status.
    async fn start_run(&self, actor_id: &str, input: Value) -> Result<ScrapeRun, ScrapeError>;

    async fn get_run(&self, run_id: &str) -> Result<ScrapeRun, ScrapeError>;

    async fn abort_run(&self, run_id: &str) -> Result<(), ScrapeError>;

    async fn dataset_items(&self, dataset_id: &str) -> Result<Vec<RawRecord>, ScrapeError>;

    /// Username owning the API token. Used as a connectivity check.
    async fn current_user(&self) -> Result<String, ScrapeError>;
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct UserInfo {
    username: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApifyError {
    error: ApifyErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApifyErrorBody {
    message: String,
}

/// Apify client. One instance per process, shared read-only across requests.
#[derive(Clone)]
pub struct ApifyClient {
    client: Client,
    base_url: String,
    token: String,
}

impl ApifyClient {
    pub fn new(token: String, base_url: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(60))
                .user_agent(concat!("scout/", env!("CARGO_PKG_VERSION")))
                .build()
                .expect("Failed to build HTTP client"),
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ScrapeError> {
        let response = request.bearer_auth(&self.token).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApifyError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(ScrapeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl ScrapeService for ApifyClient {
    async fn start_run(&self, actor_id: &str, input: Value) -> Result<ScrapeRun, ScrapeError> {
        debug!("POST acts/{actor_id}/runs");
        let request = self
            .client
            .post(self.url(&format!("acts/{actor_id}/runs")))
            .json(&input);
        let envelope: Envelope<ScrapeRun> = self.send(request).await?;
        Ok(envelope.data)
    }

    async fn get_run(&self, run_id: &str) -> Result<ScrapeRun, ScrapeError> {
        let request = self.client.get(self.url(&format!("actor-runs/{run_id}")));
        let envelope: Envelope<ScrapeRun> = self.send(request).await?;
        Ok(envelope.data)
    }

    async fn abort_run(&self, run_id: &str) -> Result<(), ScrapeError> {
        let request = self
            .client
            .post(self.url(&format!("actor-runs/{run_id}/abort")));
        let _: Value = self.send(request).await?;
        Ok(())
    }

    async fn dataset_items(&self, dataset_id: &str) -> Result<Vec<RawRecord>, ScrapeError> {
        let request = self
            .client
            .get(self.url(&format!("datasets/{dataset_id}/items")))
            .query(&[("format", "json"), ("clean", "true")]);
        let items: Vec<Value> = self.send(request).await?;
        Ok(items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect())
    }

    async fn current_user(&self) -> Result<String, ScrapeError> {
        let request = self.client.get(self.url("users/me"));
        let envelope: Envelope<UserInfo> = self.send(request).await?;
        Ok(envelope
            .data
            .username
            .unwrap_or_else(|| "Unknown user".to_string()))
    }
}
