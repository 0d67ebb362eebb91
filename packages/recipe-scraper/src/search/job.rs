//! Bulk-search job state and snapshots.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::types::search::DietaryFilters;

/// Overall job state. Every state but `InProgress` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobState {
    InProgress,
    Completed,
    Error,
    Cancelled,
}

impl JobState {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobState::InProgress)
    }
}

/// State of one site within a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteState {
    Pending,
    InProgress,
    Completed,
    Error,
}

impl SiteState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, SiteState::Completed | SiteState::Error)
    }
}

/// How sites are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionMode {
    /// Bounded-width batches of concurrent sites
    Parallel,

    /// One site at a time with a pause in between
    Sequential,
}

impl ExecutionMode {
    /// Parallel at or below the threshold, sequential above it.
    pub fn for_limit(limit: usize, parallel_threshold: usize) -> Self {
        if limit <= parallel_threshold {
            ExecutionMode::Parallel
        } else {
            ExecutionMode::Sequential
        }
    }
}

/// Which sites a search covers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SiteSelection {
    #[default]
    All,
    Named(Vec<String>),
}

/// Parameters of a bulk search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchRequest {
    pub keyword: Option<String>,
    #[serde(default)]
    pub filters: DietaryFilters,
    #[serde(default)]
    pub sites: SiteSelection,

    /// Total recipes wanted across all sites.
    pub limit: usize,
}

impl SearchRequest {
    /// All sites, no keyword, no filters.
    pub fn new(limit: usize) -> Self {
        Self {
            keyword: None,
            filters: DietaryFilters::default(),
            sites: SiteSelection::All,
            limit,
        }
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn with_filters(mut self, filters: DietaryFilters) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_sites(mut self, sites: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.sites = SiteSelection::Named(sites.into_iter().map(Into::into).collect());
        self
    }
}

/// Counters and status for one site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteProgress {
    pub name: String,
    pub state: SiteState,

    /// Candidates returned by the search page
    pub found: usize,

    /// Candidates imported
    pub new: usize,

    /// Candidates already stored
    pub duplicate: usize,

    pub error_message: Option<String>,
}

impl SiteProgress {
    fn pending(name: &str) -> Self {
        Self {
            name: name.to_string(),
            state: SiteState::Pending,
            found: 0,
            new: 0,
            duplicate: 0,
            error_message: None,
        }
    }
}

/// Full state of a bulk search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchJob {
    pub id: Uuid,
    pub state: JobState,
    pub execution_mode: ExecutionMode,
    pub keyword: Option<String>,
    pub filters: DietaryFilters,
    pub limit: usize,
    pub per_site_limit: usize,

    /// 0..=100
    pub progress: u8,

    /// Per-site entries in scheduling order
    pub sites: IndexMap<String, SiteProgress>,

    pub total_found: usize,
    pub total_new: usize,
    pub total_duplicate: usize,

    /// `"<site>: <message>"` per failed site, plus any job-level failure
    pub errors: Vec<String>,

    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
    pub cancelled: bool,
}

impl SearchJob {
    /// A fresh job over `sites`, which must be non-empty.
    pub fn new(
        id: Uuid,
        request: &SearchRequest,
        sites: &[&str],
        parallel_threshold: usize,
    ) -> Self {
        let per_site_limit = (request.limit / sites.len().max(1)).max(1);

        Self {
            id,
            state: JobState::InProgress,
            execution_mode: ExecutionMode::for_limit(request.limit, parallel_threshold),
            keyword: request.keyword.clone(),
            filters: request.filters,
            limit: request.limit,
            per_site_limit,
            progress: 0,
            sites: sites
                .iter()
                .map(|name| (name.to_string(), SiteProgress::pending(name)))
                .collect(),
            total_found: 0,
            total_new: 0,
            total_duplicate: 0,
            errors: Vec::new(),
            started_at: Utc::now(),
            elapsed: Duration::ZERO,
            cancelled: false,
        }
    }

    pub fn site_names(&self) -> Vec<String> {
        self.sites.keys().cloned().collect()
    }

    pub fn terminal_site_count(&self) -> usize {
        self.sites.values().filter(|s| s.state.is_terminal()).count()
    }

    /// Progress from the share of sites in a terminal state.
    pub fn update_progress_from_sites(&mut self) {
        self.set_progress(self.terminal_site_count(), self.sites.len());
    }

    /// Progress as `done / total` percent, rounded down.
    pub fn set_progress(&mut self, done: usize, total: usize) {
        if total == 0 {
            return;
        }
        self.progress = ((done.min(total) * 100) / total) as u8;
    }

    pub fn set_site_state(&mut self, site: &str, state: SiteState) {
        if let Some(entry) = self.sites.get_mut(site) {
            entry.state = state;
        }
    }

    pub fn record_found(&mut self, site: &str, count: usize) {
        if let Some(entry) = self.sites.get_mut(site) {
            entry.found = count;
        }
        self.total_found += count;
    }

    pub fn record_new(&mut self, site: &str) {
        if let Some(entry) = self.sites.get_mut(site) {
            entry.new += 1;
        }
        self.total_new += 1;
    }

    pub fn record_duplicate(&mut self, site: &str) {
        if let Some(entry) = self.sites.get_mut(site) {
            entry.duplicate += 1;
        }
        self.total_duplicate += 1;
    }

    /// Mark a site failed and append `"<site>: <message>"` to the job errors.
    pub fn record_site_error(&mut self, site: &str, message: String) {
        self.errors.push(format!("{}: {}", site, message));
        if let Some(entry) = self.sites.get_mut(site) {
            entry.state = SiteState::Error;
            entry.error_message = Some(message);
        }
    }

    pub fn refresh_elapsed(&mut self) {
        self.elapsed = (Utc::now() - self.started_at).to_std().unwrap_or_default();
    }

    /// Final summary of the job.
    pub fn report(&self) -> JobReport {
        JobReport {
            id: self.id,
            state: self.state,
            total_found: self.total_found,
            total_new: self.total_new,
            total_duplicate: self.total_duplicate,
            sites: self.sites.values().cloned().collect(),
            errors: self.errors.clone(),
            elapsed: self.elapsed,
        }
    }
}

/// Outcome of a bulk search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobReport {
    pub id: Uuid,
    pub state: JobState,
    pub total_found: usize,
    pub total_new: usize,
    pub total_duplicate: usize,
    pub sites: Vec<SiteProgress>,
    pub errors: Vec<String>,
    pub elapsed: Duration,
}
