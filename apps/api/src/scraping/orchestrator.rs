//! Job Retrieval Orchestrator.
//!
//! Flow per attempt: build actor input → start run → poll until terminal (bounded)
//! → read dataset → normalize → truncate to `rows`.
//!
//! Nothing here returns an error to the caller. Every failure is folded into a
//! `SearchOutcome` so "no matches" and "service down" stay distinguishable,
//! while `into_listings()` keeps the plain "empty on failure" contract.

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::scraping::client::{RunStatus, ScrapeError, ScrapeService};
use crate::scraping::listing::JobListing;
use crate::scraping::platform::{Platform, QueryVariant, SearchQuery};

/// How long to wait for a remote run before giving up on it.
#[derive(Debug, Clone, Copy)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_polls: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(2),
            max_polls: 150,
        }
    }
}

/// Result of one platform search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Found(Vec<JobListing>),
    /// The run succeeded but its dataset had no records.
    Empty,
    /// The run reached a terminal status other than SUCCEEDED.
    RunFailed(RunStatus),
    /// The poll cap was hit before the run finished.
    TimedOut { polls: u32 },
    ServiceError(String),
}

impl SearchOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchOutcome::Found(_))
    }

    /// Short machine-readable label.
    pub fn kind(&self) -> &'static str {
        match self {
            SearchOutcome::Found(_) => "found",
            SearchOutcome::Empty => "empty",
            SearchOutcome::RunFailed(_) => "run_failed",
            SearchOutcome::TimedOut { .. } => "timed_out",
            SearchOutcome::ServiceError(_) => "service_error",
        }
    }

    pub fn detail(&self) -> Option<String> {
        match self {
            SearchOutcome::RunFailed(status) => Some(format!("run ended with status {status}")),
            SearchOutcome::TimedOut { polls } => {
                Some(format!("run still in progress after {polls} status checks"))
            }
            SearchOutcome::ServiceError(detail) => Some(detail.clone()),
            SearchOutcome::Found(_) | SearchOutcome::Empty => None,
        }
    }

    pub fn into_listings(self) -> Vec<JobListing> {
        match self {
            SearchOutcome::Found(listings) => listings,
            _ => Vec::new(),
        }
    }
}

/// Outcomes for both platforms from one query.
#[derive(Debug, Clone)]
pub struct PlatformSearchResults {
    pub linkedin: SearchOutcome,
    pub naukri: SearchOutcome,
}

#[derive(Clone)]
pub struct JobOrchestrator {
    service: Arc<dyn ScrapeService>,
    policy: PollPolicy,
    default_location: String,
}

impl JobOrchestrator {
    pub fn new(
        service: Arc<dyn ScrapeService>,
        policy: PollPolicy,
        default_location: impl Into<String>,
    ) -> Self {
        Self {
            service,
            policy,
            default_location: default_location.into(),
        }
    }

    pub fn default_location(&self) -> &str {
        &self.default_location
    }

    /// LinkedIn listings for `keywords` in the default region, empty on any failure.
    pub async fn fetch_linkedin_jobs(&self, keywords: &str, rows: u32) -> Vec<JobListing> {
        let query = SearchQuery::new(keywords, self.default_location.as_str(), rows);
        self.search(Platform::LinkedIn, &query).await.into_listings()
    }

    /// Naukri listings for `keywords`, empty on any failure.
    pub async fn fetch_naukri_jobs(&self, keywords: &str, rows: u32) -> Vec<JobListing> {
        let query = SearchQuery::new(keywords, self.default_location.as_str(), rows);
        self.search(Platform::Naukri, &query).await.into_listings()
    }

    /// Runs both platforms concurrently. Neither result depends on the other.
    pub async fn search_all(&self, query: &SearchQuery) -> PlatformSearchResults {
        let (linkedin, naukri) = tokio::join!(
            self.search(Platform::LinkedIn, query),
            self.search(Platform::Naukri, query)
        );
        PlatformSearchResults { linkedin, naukri }
    }

    /// Walks the platform's attempt plan; the first `Found` wins. Otherwise the
    /// last attempt's outcome is reported.
    pub async fn search(&self, platform: Platform, query: &SearchQuery) -> SearchOutcome {
        let mut outcome = SearchOutcome::Empty;
        for (attempt, (variant, attempt_query)) in
            platform.attempt_plan(query).into_iter().enumerate()
        {
            if attempt > 0 {
                info!(
                    "Retrying {} search ({:?} vocabulary, location '{}')",
                    platform.display_name(),
                    variant,
                    attempt_query.location
                );
            }
            outcome = self.run_attempt(platform, variant, &attempt_query).await;
            if outcome.is_found() {
                break;
            }
        }
        outcome
    }

    pub async fn check_connection(&self) -> Result<String, ScrapeError> {
        self.service.current_user().await
    }

    async fn run_attempt(
        &self,
        platform: Platform,
        variant: QueryVariant,
        query: &SearchQuery,
    ) -> SearchOutcome {
        info!(
            "Searching {} jobs for '{}' in '{}' (rows: {})",
            platform.display_name(),
            query.keywords,
            query.location,
            query.rows
        );
        let input = platform.build_input(variant, query);

        match self.execute(platform, input, query.rows).await {
            Ok(outcome) => {
                match &outcome {
                    SearchOutcome::Found(listings) => info!(
                        "{} search returned {} listings",
                        platform.display_name(),
                        listings.len()
                    ),
                    other => warn!(
                        "{} search produced no listings: {}",
                        platform.display_name(),
                        other.detail().unwrap_or_else(|| "empty dataset".to_string())
                    ),
                }
                outcome
            }
            Err(e) => {
                error!("Error fetching {} jobs: {e}", platform.display_name());
                SearchOutcome::ServiceError(e.to_string())
            }
        }
    }

    async fn execute(
        &self,
        platform: Platform,
        input: Value,
        rows: u32,
    ) -> Result<SearchOutcome, ScrapeError> {
        let mut run = self.service.start_run(platform.actor_id(), input).await?;
        info!(
            "Started {} scraper run {} ({})",
            platform.display_name(),
            run.id,
            run.status
        );

        let mut polls = 0u32;
        while !run.status.is_terminal() {
            if polls >= self.policy.max_polls {
                warn!(
                    "{} run {} not finished after {polls} status checks, aborting",
                    platform.display_name(),
                    run.id
                );
                self.abort_quietly(&run.id).await;
                return Ok(SearchOutcome::TimedOut { polls });
            }
            tokio::time::sleep(self.policy.interval).await;
            run = match self.service.get_run(&run.id).await {
                Ok(current) => current,
                Err(e) => {
                    warn!("Status check for run {} failed, aborting: {e}", run.id);
                    self.abort_quietly(&run.id).await;
                    return Err(e);
                }
            };
            polls += 1;
            debug!("Run {} status after check {polls}: {}", run.id, run.status);
        }

        info!("Scraper run {} completed with status: {}", run.id, run.status);
        if run.status != RunStatus::Succeeded {
            return Ok(SearchOutcome::RunFailed(run.status));
        }

        let dataset_id = run
            .default_dataset_id
            .ok_or_else(|| ScrapeError::MissingDataset(run.id.clone()))?;
        debug!("Fetching data from dataset: {dataset_id}");
        let records = self.service.dataset_items(&dataset_id).await?;
        info!(
            "Dataset {dataset_id} holds {} {} records",
            records.len(),
            platform.display_name()
        );
        if let Some(first) = records.first() {
            debug!("Sample record keys: {:?}", first.keys().collect::<Vec<_>>());
        }

        let listings: Vec<JobListing> = records
            .iter()
            .take(rows as usize)
            .map(|record| JobListing::from_record(platform, record))
            .collect();

        if listings.is_empty() {
            Ok(SearchOutcome::Empty)
        } else {
            Ok(SearchOutcome::Found(listings))
        }
    }

    /// Best-effort abort so an abandoned run stops consuming compute.
    async fn abort_quietly(&self, run_id: &str) {
        if let Err(e) = self.service.abort_run(run_id).await {
            warn!("Failed to abort run {run_id}: {e}");
        }
    }
}
