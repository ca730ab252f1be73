//! Scripted in-memory `ScrapeService` for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::scraping::client::{RawRecord, RunStatus, ScrapeError, ScrapeRun, ScrapeService};

/// How one started run behaves.
#[derive(Debug, Clone)]
pub struct FakeRun {
    initial: RunStatus,
    /// Statuses returned by successive `get_run` calls. The last one repeats.
    polled: Vec<RunStatus>,
    items: Vec<RawRecord>,
    start_error: Option<String>,
    status_error: Option<String>,
    dataset_error: Option<String>,
    /// Finished runs report no default dataset.
    no_dataset: bool,
}

impl FakeRun {
    pub fn with_statuses(initial: RunStatus, polled: Vec<RunStatus>, items: Vec<RawRecord>) -> Self {
        Self {
            initial,
            polled,
            items,
            start_error: None,
            status_error: None,
            dataset_error: None,
            no_dataset: false,
        }
    }

    pub fn succeeded(items: Vec<RawRecord>) -> Self {
        Self::with_statuses(RunStatus::Running, vec![RunStatus::Succeeded], items)
    }

    pub fn empty() -> Self {
        Self::succeeded(vec![])
    }

    pub fn ends_with(status: RunStatus) -> Self {
        Self::with_statuses(RunStatus::Running, vec![status], vec![record("never read")])
    }

    pub fn never_finishes() -> Self {
        Self::with_statuses(RunStatus::Running, vec![RunStatus::Running], vec![])
    }

    pub fn start_error(message: &str) -> Self {
        Self {
            start_error: Some(message.to_string()),
            ..Self::empty()
        }
    }

    pub fn status_error(message: &str) -> Self {
        Self {
            status_error: Some(message.to_string()),
            ..Self::never_finishes()
        }
    }

    pub fn no_dataset() -> Self {
        Self {
            no_dataset: true,
            ..Self::succeeded(records(2))
        }
    }

    pub fn dataset_error(message: &str) -> Self {
        Self {
            dataset_error: Some(message.to_string()),
            ..Self::empty()
        }
    }
}

/// Builds a LinkedIn-shaped dataset record.
pub fn record(title: &str) -> RawRecord {
    json!({
        "title": title,
        "companyName": format!("{title} Co"),
        "location": "Colombo, Sri Lanka",
        "link": format!("https://www.linkedin.com/jobs/view/{}", title.len()),
    })
    .as_object()
    .cloned()
    .unwrap_or_default()
}

pub fn records(n: usize) -> Vec<RawRecord> {
    (0..n).map(|i| record(&format!("Job {i}"))).collect()
}

#[derive(Default)]
struct FakeState {
    scripts: VecDeque<FakeRun>,
    repeat: Option<FakeRun>,
    runs: HashMap<String, (FakeRun, usize)>,
    starts: Vec<(String, Value)>,
    status_checks: usize,
    dataset_reads: usize,
    aborts: Vec<String>,
}

#[derive(Default)]
pub struct FakeScrapeService {
    state: Mutex<FakeState>,
    username: Option<String>,
}

impl FakeScrapeService {
    /// Each started run consumes the next script in order.
    pub fn scripted(runs: Vec<FakeRun>) -> Self {
        Self {
            state: Mutex::new(FakeState {
                scripts: runs.into(),
                ..FakeState::default()
            }),
            username: Some("tester".to_string()),
        }
    }

    /// Every started run behaves like `run`.
    pub fn repeating(run: FakeRun) -> Self {
        Self {
            state: Mutex::new(FakeState {
                repeat: Some(run),
                ..FakeState::default()
            }),
            username: Some("tester".to_string()),
        }
    }

    pub fn unauthorized() -> Self {
        Self::default()
    }

    pub fn starts(&self) -> Vec<(String, Value)> {
        self.state.lock().unwrap().starts.clone()
    }

    pub fn status_checks(&self) -> usize {
        self.state.lock().unwrap().status_checks
    }

    pub fn dataset_reads(&self) -> usize {
        self.state.lock().unwrap().dataset_reads
    }

    pub fn aborts(&self) -> Vec<String> {
        self.state.lock().unwrap().aborts.clone()
    }
}

fn unknown_run(run_id: &str) -> ScrapeError {
    ScrapeError::Api {
        status: 404,
        message: format!("run {run_id} not found"),
    }
}

fn dataset_id(script: &FakeRun, run_id: &str) -> Option<String> {
    (!script.no_dataset).then(|| format!("ds-{run_id}"))
}

#[async_trait]
impl ScrapeService for FakeScrapeService {
    async fn start_run(&self, actor_id: &str, input: Value) -> Result<ScrapeRun, ScrapeError> {
        let mut state = self.state.lock().unwrap();
        state.starts.push((actor_id.to_string(), input));

        let script = match state.scripts.pop_front().or_else(|| state.repeat.clone()) {
            Some(script) => script,
            None => {
                return Err(ScrapeError::Api {
                    status: 500,
                    message: "no scripted run".to_string(),
                })
            }
        };
        if let Some(message) = &script.start_error {
            return Err(ScrapeError::Api {
                status: 502,
                message: message.clone(),
            });
        }

        let id = format!("run-{}", state.starts.len());
        let run = ScrapeRun {
            id: id.clone(),
            status: script.initial.clone(),
            default_dataset_id: dataset_id(&script, &id),
        };
        state.runs.insert(id, (script, 0));
        Ok(run)
    }

    async fn get_run(&self, run_id: &str) -> Result<ScrapeRun, ScrapeError> {
        let mut state = self.state.lock().unwrap();
        state.status_checks += 1;
        let (script, cursor) = state
            .runs
            .get_mut(run_id)
            .ok_or_else(|| unknown_run(run_id))?;
        if let Some(message) = &script.status_error {
            return Err(ScrapeError::Api {
                status: 503,
                message: message.clone(),
            });
        }

        let status = script
            .polled
            .get(*cursor)
            .or_else(|| script.polled.last())
            .cloned()
            .unwrap_or_else(|| script.initial.clone());
        *cursor += 1;

        Ok(ScrapeRun {
            id: run_id.to_string(),
            status,
            default_dataset_id: dataset_id(script, run_id),
        })
    }

    async fn abort_run(&self, run_id: &str) -> Result<(), ScrapeError> {
        self.state.lock().unwrap().aborts.push(run_id.to_string());
        Ok(())
    }

    async fn dataset_items(&self, dataset_id: &str) -> Result<Vec<RawRecord>, ScrapeError> {
        let mut state = self.state.lock().unwrap();
        state.dataset_reads += 1;
        let run_id = dataset_id.trim_start_matches("ds-");
        let (script, _) = state.runs.get(run_id).ok_or_else(|| unknown_run(run_id))?;
        if let Some(message) = &script.dataset_error {
            return Err(ScrapeError::Api {
                status: 503,
                message: message.clone(),
            });
        }
        Ok(script.items.clone())
    }

    async fn current_user(&self) -> Result<String, ScrapeError> {
        self.username.clone().ok_or(ScrapeError::Api {
            status: 401,
            message: "User was not found or authentication token is not valid".to_string(),
        })
    }
}
