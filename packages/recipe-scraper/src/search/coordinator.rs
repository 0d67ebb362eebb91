//! Bulk multi-site search.
//!
//! A job fans a keyword search out over several sites and imports every
//! new candidate it finds. Small jobs run sites in bounded concurrent
//! batches; large ones run sites one at a time with a pause in between.
//! Failures stay local: a bad candidate is skipped, a bad site is marked
//! `error`, and the job carries on. A panic inside one site's work is
//! caught at that site. Only a panic in the orchestration loop itself puts
//! the whole job in the `error` state.

use futures::future::join_all;
use futures::FutureExt;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::job::{ExecutionMode, JobReport, JobState, SearchJob, SearchRequest, SiteSelection, SiteState};
use crate::config::SearchConfig;
use crate::error::{ScrapeError, SearchError, SearchResult, SiteError};
use crate::service::RecipeScraper;
use crate::traits::store::RecipeStore;

/// One job in the table: its state plus its cancellation flag.
struct JobHandle {
    job: Mutex<SearchJob>,
    cancel: CancellationToken,
}

impl JobHandle {
    fn lock(&self) -> MutexGuard<'_, SearchJob> {
        self.job.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

/// Runs bulk searches and keeps their state until cleaned up.
///
/// Finished jobs stay in the table until [`cleanup`](Self::cleanup).
pub struct SearchCoordinator<S: RecipeStore + ?Sized> {
    scraper: RecipeScraper<S>,
    config: SearchConfig,
    jobs: RwLock<HashMap<Uuid, Arc<JobHandle>>>,
}

impl<S: RecipeStore + ?Sized + 'static> SearchCoordinator<S> {
    pub fn new(scraper: RecipeScraper<S>, config: SearchConfig) -> Self {
        Self {
            scraper,
            config,
            jobs: RwLock::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Create a job and run it in the background.
    pub async fn start(self: &Arc<Self>, request: SearchRequest) -> SearchResult<Uuid> {
        let id = self.create_job(request).await?;

        let coordinator = Arc::clone(self);
        tokio::spawn(async move {
            if let Err(e) = coordinator.run_job(id).await {
                warn!(job_id = %id, error = %e, "Search job vanished before it ran");
            }
        });

        Ok(id)
    }

    /// Register a job without running it.
    ///
    /// Named sites are intersected with the registry in request order; an
    /// empty intersection, or [`SiteSelection::All`], selects every site.
    pub async fn create_job(&self, request: SearchRequest) -> SearchResult<Uuid> {
        if request.limit == 0 || request.limit > self.config.max_limit {
            return Err(SearchError::InvalidLimit {
                limit: request.limit,
                max: self.config.max_limit,
            });
        }

        let known = self.scraper.registry().site_names();
        let mut sites: Vec<&str> = Vec::new();
        if let SiteSelection::Named(names) = &request.sites {
            for name in names {
                if let Some(site) = known.iter().copied().find(|k| *k == name.as_str()) {
                    if !sites.contains(&site) {
                        sites.push(site);
                    }
                }
            }
        }
        if sites.is_empty() {
            sites = known.clone();
        }

        let id = Uuid::new_v4();
        let job = SearchJob::new(id, &request, &sites, self.config.parallel_threshold);
        info!(
            job_id = %id,
            keyword = ?job.keyword,
            sites = sites.len(),
            limit = job.limit,
            mode = ?job.execution_mode,
            "Search job created"
        );

        self.jobs.write().await.insert(
            id,
            Arc::new(JobHandle {
                job: Mutex::new(job),
                cancel: CancellationToken::new(),
            }),
        );

        Ok(id)
    }

    async fn handle(&self, id: Uuid) -> SearchResult<Arc<JobHandle>> {
        self.jobs
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| SearchError::JobNotFound { id: id.to_string() })
    }

    /// Run a created job to a terminal state.
    pub async fn run_job(&self, id: Uuid) -> SearchResult<()> {
        let handle = self.handle(id).await?;

        let outcome = AssertUnwindSafe(self.execute(&handle)).catch_unwind().await;

        let mut job = handle.lock();
        match outcome {
            Ok(()) => {
                if !job.cancelled {
                    job.state = JobState::Completed;
                    job.progress = 100;
                }
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                warn!(job_id = %id, error = %message, "Search job aborted");
                job.state = JobState::Error;
                job.errors.push(format!("Error general: {}", message));
            }
        }
        job.refresh_elapsed();

        info!(
            job_id = %id,
            state = ?job.state,
            found = job.total_found,
            new = job.total_new,
            duplicate = job.total_duplicate,
            elapsed_ms = job.elapsed.as_millis() as u64,
            "Search job finished"
        );
        Ok(())
    }

    async fn execute(&self, handle: &JobHandle) {
        let (mode, sites) = {
            let job = handle.lock();
            (job.execution_mode, job.site_names())
        };

        match mode {
            ExecutionMode::Parallel => self.run_parallel(handle, &sites).await,
            ExecutionMode::Sequential => self.run_sequential(handle, &sites).await,
        }
    }

    async fn run_parallel(&self, handle: &JobHandle, sites: &[String]) {
        for batch in sites.chunks(self.config.max_parallel.max(1)) {
            if handle.is_cancelled() {
                break;
            }

            join_all(batch.iter().map(|site| self.search_site(handle, site))).await;

            handle.lock().update_progress_from_sites();
        }
    }

    async fn run_sequential(&self, handle: &JobHandle, sites: &[String]) {
        let total = sites.len();

        for (idx, site) in sites.iter().enumerate() {
            if handle.is_cancelled() {
                break;
            }

            self.search_site(handle, site).await;
            handle.lock().set_progress(idx + 1, total);

            if idx + 1 < total && !self.config.sequential_delay.is_zero() {
                tokio::select! {
                    _ = handle.cancel.cancelled() => break,
                    _ = tokio::time::sleep(self.config.sequential_delay) => {}
                }
            }
        }
    }

    /// Per-site unit of work. Never fails and never unwinds: the outcome,
    /// a panic included, lands on the job as that site's state.
    async fn search_site(&self, handle: &JobHandle, site: &str) {
        handle.lock().set_site_state(site, SiteState::InProgress);

        let outcome = AssertUnwindSafe(self.import_site(handle, site))
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(())) => handle.lock().set_site_state(site, SiteState::Completed),
            Ok(Err(e)) => {
                warn!(site = %site, error = %e, "Site search failed");
                handle.lock().record_site_error(site, e.to_string());
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                warn!(site = %site, error = %message, "Site search panicked");
                handle.lock().record_site_error(site, message);
            }
        }
    }

    async fn import_site(&self, handle: &JobHandle, site: &str) -> Result<(), SiteError> {
        let scraper = self
            .scraper
            .registry()
            .resolve_by_name(site)
            .ok_or_else(|| SiteError::StrategyNotFound {
                site: site.to_string(),
            })?;

        let (keyword, filters, limit) = {
            let job = handle.lock();
            (job.keyword.clone(), job.filters, job.per_site_limit)
        };

        let candidates = self
            .scraper
            .search_site(&scraper, keyword.as_deref(), &filters, limit)
            .await?;
        handle.lock().record_found(site, candidates.len());

        for candidate in candidates {
            if handle.is_cancelled() {
                break;
            }
            if candidate.url.is_empty() {
                continue;
            }

            if self.scraper.store().exists_by_url(&candidate.url).await? {
                handle.lock().record_duplicate(site);
                continue;
            }

            match self.scraper.import_with(&scraper, &candidate.url).await {
                Ok(_) => handle.lock().record_new(site),
                Err(ScrapeError::DuplicateSource { .. }) => handle.lock().record_duplicate(site),
                Err(e) => debug!(site = %site, url = %candidate.url, error = %e, "Skipping candidate"),
            }
        }

        Ok(())
    }

    /// Snapshot of a job.
    pub async fn progress(&self, id: Uuid) -> SearchResult<SearchJob> {
        let handle = self.handle(id).await?;
        let mut job = handle.lock();
        if job.state == JobState::InProgress {
            job.refresh_elapsed();
        }
        Ok(job.clone())
    }

    /// Summary of a job, final once its state is terminal.
    pub async fn result(&self, id: Uuid) -> SearchResult<JobReport> {
        let handle = self.handle(id).await?;
        let job = handle.lock();
        Ok(job.report())
    }

    /// Stop a running job. Work already in flight finishes; nothing new
    /// starts. Returns false when the job is already terminal.
    pub async fn cancel(&self, id: Uuid) -> SearchResult<bool> {
        let handle = self.handle(id).await?;
        let mut job = handle.lock();
        if job.state != JobState::InProgress {
            return Ok(false);
        }

        job.cancelled = true;
        job.state = JobState::Cancelled;
        handle.cancel.cancel();
        info!(job_id = %id, "Search job cancelled");
        Ok(true)
    }

    /// Drop a job from the table, cancelling it if still running.
    pub async fn cleanup(&self, id: Uuid) -> bool {
        match self.jobs.write().await.remove(&id) {
            Some(handle) => {
                handle.cancel.cancel();
                true
            }
            None => false,
        }
    }

    pub async fn job_ids(&self) -> Vec<Uuid> {
        self.jobs.read().await.keys().copied().collect()
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScraperConfig;
    use crate::dispatcher::SiteRegistry;
    use crate::error::StoreError;
    use crate::stores::MemoryRecipeStore;
    use crate::testing::{fixtures, MockBrowser};
    use crate::traits::store::MockRecipeStore;
    use crate::types::search::DietaryFilters;
    use std::time::Duration;

    fn search_url(site: &str, keyword: &str) -> String {
        SiteRegistry::with_builtin_sites(ScraperConfig::immediate())
            .resolve_by_name(site)
            .unwrap()
            .strategy()
            .build_search_url(Some(keyword), &DietaryFilters::default())
    }

    fn coordinator<S: RecipeStore + 'static>(browser: &MockBrowser, store: Arc<S>) -> Arc<SearchCoordinator<S>> {
        let registry = SiteRegistry::with_builtin_sites(ScraperConfig::immediate());
        let scraper = RecipeScraper::new(Arc::new(registry), Arc::new(browser.clone()), store);
        Arc::new(SearchCoordinator::new(
            scraper,
            SearchConfig::default().with_sequential_delay(Duration::ZERO),
        ))
    }

    fn cookpad_browser() -> MockBrowser {
        MockBrowser::new()
            .with_page(
                search_url("Cookpad", "tarta"),
                fixtures::search_page(&[
                    "https://cookpad.com/ar/recetas/1",
                    "https://cookpad.com/ar/recetas/2",
                    "https://cookpad.com/ar/recetas/3",
                ]),
            )
            .with_page("https://cookpad.com/ar/recetas/1", fixtures::spanish_recipe("Tarta de jamón"))
            .with_page("https://cookpad.com/ar/recetas/2", fixtures::spanish_recipe("Tarta de verdura"))
            .with_page("https://cookpad.com/ar/recetas/3", fixtures::english_recipe("Apple pie"))
    }

    #[tokio::test]
    async fn test_counts_new_duplicate_and_skipped() {
        let browser = cookpad_browser();
        let store = Arc::new(MemoryRecipeStore::new());
        store
            .insert(&crate::types::recipe::ExtractedRecipe::new(
                "Ya guardada",
                "https://cookpad.com/ar/recetas/2",
                "Cookpad",
            ))
            .await
            .unwrap();
        let coordinator = coordinator(&browser, store.clone());

        let id = coordinator
            .create_job(SearchRequest::new(9).with_keyword("tarta").with_sites(["Cookpad"]))
            .await
            .unwrap();
        coordinator.run_job(id).await.unwrap();

        let job = coordinator.progress(id).await.unwrap();
        let site = &job.sites["Cookpad"];
        assert_eq!(job.state, JobState::Completed);
        assert_eq!(job.progress, 100);
        assert_eq!(site.state, SiteState::Completed);
        assert_eq!(site.found, 3);
        assert_eq!(site.new, 1);
        assert_eq!(site.duplicate, 1);
        assert_eq!(store.count().await.unwrap(), 2);
        assert!(!browser.navigations().contains(&"https://cookpad.com/ar/recetas/2".to_string()));
    }

    #[tokio::test]
    async fn test_site_failure_does_not_abort_job() {
        let browser = cookpad_browser();
        let coordinator = coordinator(&browser, Arc::new(MemoryRecipeStore::new()));

        let id = coordinator
            .create_job(SearchRequest::new(30).with_keyword("tarta").with_sites(["Cookpad", "Tasty"]))
            .await
            .unwrap();
        coordinator.run_job(id).await.unwrap();

        let report = coordinator.result(id).await.unwrap();
        assert_eq!(report.state, JobState::Completed);
        assert_eq!(report.sites[0].state, SiteState::Completed);
        assert_eq!(report.sites[1].state, SiteState::Error);
        assert!(report.sites[1].error_message.is_some());
        assert_eq!(report.errors.len(), 1);
        assert!(report.errors[0].starts_with("Tasty: "));
    }

    #[tokio::test]
    async fn test_unknown_sites_fall_back_to_all() {
        let coordinator = coordinator(&MockBrowser::new(), Arc::new(MemoryRecipeStore::new()));

        let id = coordinator
            .create_job(SearchRequest::new(1000).with_sites(["Nope"]))
            .await
            .unwrap();

        let job = coordinator.progress(id).await.unwrap();
        assert_eq!(job.sites.len(), 10);
        assert_eq!(job.per_site_limit, 100);
        assert_eq!(job.execution_mode, ExecutionMode::Sequential);
    }

    #[tokio::test]
    async fn test_named_sites_keep_request_order() {
        let coordinator = coordinator(&MockBrowser::new(), Arc::new(MemoryRecipeStore::new()));

        let id = coordinator
            .create_job(SearchRequest::new(10).with_sites(["Tasty", "Nope", "Cookpad"]))
            .await
            .unwrap();

        let job = coordinator.progress(id).await.unwrap();
        assert_eq!(job.site_names(), vec!["Tasty", "Cookpad"]);
    }

    #[tokio::test]
    async fn test_limit_bounds() {
        let coordinator = coordinator(&MockBrowser::new(), Arc::new(MemoryRecipeStore::new()));

        for limit in [0, 1001] {
            let err = coordinator.create_job(SearchRequest::new(limit)).await.unwrap_err();
            assert!(matches!(err, SearchError::InvalidLimit { .. }), "Limit: {}", limit);
        }
    }

    #[tokio::test]
    async fn test_unknown_job() {
        let coordinator = coordinator(&MockBrowser::new(), Arc::new(MemoryRecipeStore::new()));
        let id = Uuid::new_v4();

        assert!(matches!(coordinator.progress(id).await, Err(SearchError::JobNotFound { .. })));
        assert!(matches!(coordinator.result(id).await, Err(SearchError::JobNotFound { .. })));
        assert!(matches!(coordinator.cancel(id).await, Err(SearchError::JobNotFound { .. })));
        assert!(!coordinator.cleanup(id).await);
    }

    #[tokio::test]
    async fn test_cancel_before_run_starts_nothing() {
        let browser = cookpad_browser();
        let coordinator = coordinator(&browser, Arc::new(MemoryRecipeStore::new()));

        let id = coordinator
            .create_job(SearchRequest::new(9).with_keyword("tarta").with_sites(["Cookpad"]))
            .await
            .unwrap();
        assert!(coordinator.cancel(id).await.unwrap());
        assert!(!coordinator.cancel(id).await.unwrap());

        coordinator.run_job(id).await.unwrap();

        let job = coordinator.progress(id).await.unwrap();
        assert_eq!(job.state, JobState::Cancelled);
        assert!(job.cancelled);
        assert!(browser.calls().is_empty());
    }

    #[tokio::test]
    async fn test_cleanup_removes_job() {
        let coordinator = coordinator(&MockBrowser::new(), Arc::new(MemoryRecipeStore::new()));
        let id = coordinator.create_job(SearchRequest::new(5)).await.unwrap();

        assert_eq!(coordinator.job_ids().await, vec![id]);
        assert!(coordinator.cleanup(id).await);
        assert!(coordinator.job_ids().await.is_empty());
    }

    #[tokio::test]
    async fn test_store_failure_marks_site_error() {
        let browser = cookpad_browser();
        let mut store = MockRecipeStore::new();
        store.expect_exists_by_url().returning(|_| {
            Err(StoreError::Backend(Box::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                "database is locked",
            ))))
        });
        let coordinator = coordinator(&browser, Arc::new(store));

        let id = coordinator
            .create_job(SearchRequest::new(9).with_keyword("tarta").with_sites(["Cookpad"]))
            .await
            .unwrap();
        coordinator.run_job(id).await.unwrap();

        let job = coordinator.progress(id).await.unwrap();
        assert_eq!(job.state, JobState::Completed);
        assert_eq!(job.sites["Cookpad"].state, SiteState::Error);
        assert!(job.errors[0].contains("database is locked"));
    }

    #[tokio::test]
    async fn test_site_panic_stays_local() {
        let paulina_recipe = "https://www.paulinacocina.net/tarta-de-atun/";
        let browser = cookpad_browser()
            .with_page(
                search_url("Paulina Cocina", "tarta"),
                fixtures::search_page(&[paulina_recipe]),
            )
            .with_page(paulina_recipe, fixtures::spanish_recipe("Tarta de atún"))
            .with_latency(Duration::from_millis(20));

        let mut store = MockRecipeStore::new();
        store
            .expect_exists_by_url()
            .withf(|url: &str| url.contains("cookpad.com"))
            .returning(|_| panic!("connection pool poisoned"));
        store
            .expect_exists_by_url()
            .withf(|url: &str| !url.contains("cookpad.com"))
            .returning(|_| Ok(false));
        store.expect_insert().returning(|_| Ok(1));
        let coordinator = coordinator(&browser, Arc::new(store));

        let id = coordinator
            .create_job(
                SearchRequest::new(9)
                    .with_keyword("tarta")
                    .with_sites(["Cookpad", "Paulina Cocina"]),
            )
            .await
            .unwrap();
        coordinator.run_job(id).await.unwrap();

        let job = coordinator.progress(id).await.unwrap();
        assert_eq!(job.execution_mode, ExecutionMode::Parallel);
        assert_eq!(job.state, JobState::Completed);
        assert_eq!(job.progress, 100);
        assert_eq!(job.sites["Cookpad"].state, SiteState::Error);
        assert_eq!(
            job.sites["Cookpad"].error_message.as_deref(),
            Some("connection pool poisoned")
        );
        assert_eq!(job.sites["Paulina Cocina"].state, SiteState::Completed);
        assert_eq!(job.sites["Paulina Cocina"].new, 1);
        assert_eq!(job.errors, vec!["Cookpad: connection pool poisoned"]);
    }

    #[tokio::test]
    async fn test_cancel_mid_run_stops_between_candidates() {
        let browser = cookpad_browser().with_latency(Duration::from_millis(40));
        let coordinator = coordinator(&browser, Arc::new(MemoryRecipeStore::new()));

        let id = coordinator
            .create_job(SearchRequest::new(9).with_keyword("tarta").with_sites(["Cookpad"]))
            .await
            .unwrap();
        let runner = {
            let coordinator = coordinator.clone();
            tokio::spawn(async move { coordinator.run_job(id).await })
        };

        // Candidates are known once the search page has loaded.
        for _ in 0..200 {
            if coordinator.progress(id).await.unwrap().total_found > 0 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
        assert!(coordinator.cancel(id).await.unwrap());
        runner.await.unwrap().unwrap();

        let job = coordinator.progress(id).await.unwrap();
        let recipe_navigations = browser
            .navigations()
            .iter()
            .filter(|url| url.contains("/recetas/"))
            .count();
        assert_eq!(job.state, JobState::Cancelled);
        assert_eq!(job.total_found, 3);
        assert!(recipe_navigations < 3, "navigated {} recipes", recipe_navigations);
        assert!(job.total_new <= 1);
    }

    #[test]
    fn test_panic_message() {
        let text: Box<dyn std::any::Any + Send> = Box::new("boom");
        let owned: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        let other: Box<dyn std::any::Any + Send> = Box::new(7u8);

        assert_eq!(panic_message(text.as_ref()), "boom");
        assert_eq!(panic_message(owned.as_ref()), "bang");
        assert_eq!(panic_message(other.as_ref()), "unknown panic");
    }

    #[tokio::test]
    async fn test_start_runs_in_background() {
        let browser = cookpad_browser();
        let coordinator = coordinator(&browser, Arc::new(MemoryRecipeStore::new()));

        let id = coordinator
            .start(SearchRequest::new(9).with_keyword("tarta").with_sites(["Cookpad"]))
            .await
            .unwrap();

        let mut job = coordinator.progress(id).await.unwrap();
        for _ in 0..200 {
            if job.state.is_terminal() {
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
            job = coordinator.progress(id).await.unwrap();
        }

        assert_eq!(job.state, JobState::Completed);
        assert_eq!(job.total_new, 2);
    }
}
