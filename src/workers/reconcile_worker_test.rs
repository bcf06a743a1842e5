#[cfg(test)]
mod tests {
    use crate::application::usecases::start_scrape::ScrapeActors;
    use crate::config::settings::ReconcilerSettings;
    use crate::domain::models::monitoring::{MonitoringConfig, MonitoringLog, MonitoringStatus};
    use crate::domain::models::product::NormalizedProduct;
    use crate::domain::models::product_change::ProductChangeRecord;
    use crate::domain::models::scrape_job::{JobStatus, ScrapeJob, ScraperType, STALE_REASON};
    use crate::domain::models::store::{Store, StorePlatform};
    use crate::domain::repositories::monitoring_repository::MonitoringRepository;
    use crate::domain::repositories::product_change_repository::ProductChangeRepository;
    use crate::domain::repositories::product_repository::ProductRepository;
    use crate::domain::repositories::scrape_job_repository::{
        RepositoryError, ScrapeJobRepository,
    };
    use crate::domain::repositories::store_repository::StoreRepository;
    use crate::providers::traits::{
        ProviderError, RunProvider, RunState, RunStatus, StartedRun,
    };
    use crate::workers::reconcile_worker::ReconcileWorker;
    use async_trait::async_trait;
    use chrono::{DateTime, Duration, FixedOffset, Utc};
    use serde_json::{json, Value};
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    #[derive(Default)]
    struct MockJobRepo {
        jobs: Mutex<HashMap<Uuid, ScrapeJob>>,
        deny_claims: bool,
        rearms: Mutex<Vec<(Uuid, ScraperType, String)>>,
        // Extra rows served as if fetched before another poller converged them
        lagged: Mutex<Vec<ScrapeJob>>,
    }

    #[async_trait]
    impl ScrapeJobRepository for MockJobRepo {
        async fn create(&self, job: &ScrapeJob) -> Result<ScrapeJob, RepositoryError> {
            self.jobs.lock().unwrap().insert(job.id, job.clone());
            Ok(job.clone())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<ScrapeJob>, RepositoryError> {
            Ok(self.jobs.lock().unwrap().get(&id).cloned())
        }

        async fn set_run(
            &self,
            _id: Uuid,
            _run_id: &str,
            _dataset_id: Option<&str>,
        ) -> Result<(), RepositoryError> {
            Ok(())
        }

        async fn find_running_with_run(
            &self,
            _limit: u64,
        ) -> Result<Vec<ScrapeJob>, RepositoryError> {
            let jobs = self.jobs.lock().unwrap();
            let mut running: Vec<ScrapeJob> = jobs
                .values()
                .filter(|j| j.status == JobStatus::Running && j.run_id.is_some())
                .cloned()
                .collect();
            running.extend(self.lagged.lock().unwrap().iter().cloned());
            running.sort_by_key(|j| j.started_at);
            Ok(running)
        }

        async fn claim_processing(&self, id: Uuid) -> Result<bool, RepositoryError> {
            if self.deny_claims {
                return Ok(false);
            }
            let mut jobs = self.jobs.lock().unwrap();
            let job = jobs.get_mut(&id).ok_or(RepositoryError::NotFound)?;
            if job.status == JobStatus::Running {
                job.status = JobStatus::Processing;
                Ok(true)
            } else {
                Ok(false)
            }
        }

        async fn rearm_with_fallback(
            &self,
            id: Uuid,
            scraper_type: ScraperType,
            run_id: &str,
            dataset_id: Option<&str>,
        ) -> Result<(), RepositoryError> {
            self.rearms
                .lock()
                .unwrap()
                .push((id, scraper_type, run_id.to_string()));
            let mut jobs = self.jobs.lock().unwrap();
            let job = jobs.get_mut(&id).ok_or(RepositoryError::NotFound)?;
            job.status = JobStatus::Running;
            job.scraper_type = scraper_type;
            job.fallback_attempted = true;
            job.run_id = Some(run_id.to_string());
            job.dataset_id = dataset_id.map(str::to_string);
            job.started_at = Utc::now().into();
            Ok(())
        }

        async fn mark_completed(
            &self,
            id: Uuid,
            products_found: i32,
            products_updated: i32,
        ) -> Result<bool, RepositoryError> {
            let mut jobs = self.jobs.lock().unwrap();
            let job = jobs.get_mut(&id).ok_or(RepositoryError::NotFound)?;
            if job.status != JobStatus::Processing {
                return Ok(false);
            }
            job.status = JobStatus::Completed;
            job.products_found = products_found;
            job.products_updated = products_updated;
            Ok(true)
        }

        async fn mark_failed(&self, id: Uuid, error: &str) -> Result<bool, RepositoryError> {
            let mut jobs = self.jobs.lock().unwrap();
            let job = jobs.get_mut(&id).ok_or(RepositoryError::NotFound)?;
            if job.status.is_terminal() {
                return Ok(false);
            }
            job.status = JobStatus::Failed;
            job.error_message = Some(error.to_string());
            Ok(true)
        }
    }

    #[derive(Default)]
    struct MockStoreRepo {
        stores: Mutex<HashMap<Uuid, Store>>,
        stats_updates: Mutex<Vec<(Uuid, i32)>>,
    }

    #[async_trait]
    impl StoreRepository for MockStoreRepo {
        async fn create(&self, store: &Store) -> Result<Store, RepositoryError> {
            self.stores.lock().unwrap().insert(store.id, store.clone());
            Ok(store.clone())
        }

        async fn find_by_id(&self, id: Uuid) -> Result<Option<Store>, RepositoryError> {
            Ok(self.stores.lock().unwrap().get(&id).cloned())
        }

        async fn update_scrape_stats(
            &self,
            id: Uuid,
            product_count: i32,
            _last_scraped_at: DateTime<FixedOffset>,
        ) -> Result<(), RepositoryError> {
            self.stats_updates.lock().unwrap().push((id, product_count));
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockProductRepo {
        snapshot: Mutex<Vec<NormalizedProduct>>,
        upserted: Mutex<Vec<String>>,
        removed: Mutex<Vec<String>>,
        fail_batches: bool,
        fail_one_hash: Option<String>,
    }

    #[async_trait]
    impl ProductRepository for MockProductRepo {
        async fn find_active_by_store(
            &self,
            _store_id: Uuid,
        ) -> Result<Vec<NormalizedProduct>, RepositoryError> {
            Ok(self.snapshot.lock().unwrap().clone())
        }

        async fn upsert_batch(
            &self,
            products: &[NormalizedProduct],
        ) -> Result<u64, RepositoryError> {
            if self.fail_batches {
                return Err(RepositoryError::NotFound);
            }
            let mut upserted = self.upserted.lock().unwrap();
            for p in products {
                upserted.push(p.hash_id.clone());
            }
            Ok(products.len() as u64)
        }

        async fn upsert_one(&self, product: &NormalizedProduct) -> Result<(), RepositoryError> {
            if self.fail_one_hash.as_deref() == Some(product.hash_id.as_str()) {
                return Err(RepositoryError::NotFound);
            }
            self.upserted.lock().unwrap().push(product.hash_id.clone());
            Ok(())
        }

        async fn mark_removed(
            &self,
            _store_id: Uuid,
            hash_ids: &[String],
        ) -> Result<u64, RepositoryError> {
            self.removed.lock().unwrap().extend_from_slice(hash_ids);
            Ok(hash_ids.len() as u64)
        }
    }

    #[derive(Default)]
    struct MockChangeRepo {
        records: Mutex<Vec<ProductChangeRecord>>,
    }

    #[async_trait]
    impl ProductChangeRepository for MockChangeRepo {
        async fn insert_batch(
            &self,
            records: &[ProductChangeRecord],
        ) -> Result<(), RepositoryError> {
            self.records.lock().unwrap().extend_from_slice(records);
            Ok(())
        }

        async fn find_recent_by_store(
            &self,
            _store_id: Uuid,
            _limit: u64,
        ) -> Result<Vec<ProductChangeRecord>, RepositoryError> {
            Ok(self.records.lock().unwrap().clone())
        }
    }

    #[derive(Default)]
    struct MockMonitoringRepo {
        completed_logs: Mutex<Vec<(Uuid, MonitoringStatus, i32, i32, i32, Option<String>)>>,
    }

    #[async_trait]
    impl MonitoringRepository for MockMonitoringRepo {
        async fn create_config(
            &self,
            config: &MonitoringConfig,
        ) -> Result<MonitoringConfig, RepositoryError> {
            Ok(config.clone())
        }

        async fn find_due_configs(
            &self,
            _now: DateTime<Utc>,
            _limit: u64,
        ) -> Result<Vec<MonitoringConfig>, RepositoryError> {
            Ok(vec![])
        }

        async fn reschedule(
            &self,
            _config_id: Uuid,
            _last_check_at: DateTime<FixedOffset>,
            _next_check_at: DateTime<FixedOffset>,
        ) -> Result<(), RepositoryError> {
            Ok(())
        }

        async fn disable_for_store(&self, _store_id: Uuid) -> Result<(), RepositoryError> {
            Ok(())
        }

        async fn create_log(&self, log: &MonitoringLog) -> Result<MonitoringLog, RepositoryError> {
            Ok(log.clone())
        }

        async fn complete_log(
            &self,
            log_id: Uuid,
            status: MonitoringStatus,
            new_products: i32,
            updated_products: i32,
            removed_products: i32,
            error_message: Option<&str>,
        ) -> Result<(), RepositoryError> {
            self.completed_logs.lock().unwrap().push((
                log_id,
                status,
                new_products,
                updated_products,
                removed_products,
                error_message.map(str::to_string),
            ));
            Ok(())
        }
    }

    #[derive(Default)]
    struct MockProvider {
        statuses: Mutex<HashMap<String, Result<RunStatus, ()>>>,
        datasets: Mutex<HashMap<String, Vec<Value>>>,
        start_result: Mutex<Option<Result<StartedRun, ProviderError>>>,
    }

    impl MockProvider {
        fn with_status(self, run_id: &str, state: RunState, dataset_id: Option<&str>) -> Self {
            self.statuses.lock().unwrap().insert(
                run_id.to_string(),
                Ok(RunStatus {
                    state,
                    dataset_id: dataset_id.map(str::to_string),
                }),
            );
            self
        }

        fn with_status_error(self, run_id: &str) -> Self {
            self.statuses
                .lock()
                .unwrap()
                .insert(run_id.to_string(), Err(()));
            self
        }

        fn with_dataset(self, dataset_id: &str, items: Vec<Value>) -> Self {
            self.datasets
                .lock()
                .unwrap()
                .insert(dataset_id.to_string(), items);
            self
        }

        fn with_start(self, run: StartedRun) -> Self {
            *self.start_result.lock().unwrap() = Some(Ok(run));
            self
        }
    }

    #[async_trait]
    impl RunProvider for MockProvider {
        async fn start_run(
            &self,
            _actor_id: &str,
            _input: &Value,
        ) -> Result<StartedRun, ProviderError> {
            self.start_result
                .lock()
                .unwrap()
                .take()
                .expect("unexpected start_run call")
        }

        async fn run_status(&self, run_id: &str) -> Result<RunStatus, ProviderError> {
            match self.statuses.lock().unwrap().get(run_id) {
                Some(Ok(status)) => Ok(status.clone()),
                Some(Err(())) => Err(ProviderError::Api {
                    status: 503,
                    message: "unavailable".to_string(),
                }),
                None => panic!("unexpected run_status for {run_id}"),
            }
        }

        async fn dataset_items(&self, dataset_id: &str) -> Result<Vec<Value>, ProviderError> {
            self.datasets
                .lock()
                .unwrap()
                .get(dataset_id)
                .cloned()
                .ok_or_else(|| ProviderError::Api {
                    status: 404,
                    message: "dataset not found".to_string(),
                })
        }
    }

    fn settings() -> ReconcilerSettings {
        ReconcilerSettings {
            poll_interval_secs: 60,
            poll_batch_size: 20,
            stale_after_hours: 2,
            upsert_batch_size: 50,
            change_batch_size: 100,
        }
    }

    fn actors() -> ScrapeActors {
        ScrapeActors {
            primary: "shop~catalog".to_string(),
            fallback: Some("shop~fallback".to_string()),
            platform: "shop~woo".to_string(),
        }
    }

    struct Harness {
        jobs: Arc<MockJobRepo>,
        stores: Arc<MockStoreRepo>,
        products: Arc<MockProductRepo>,
        changes: Arc<MockChangeRepo>,
        monitoring: Arc<MockMonitoringRepo>,
        worker: ReconcileWorker<
            MockJobRepo,
            MockStoreRepo,
            MockProductRepo,
            MockChangeRepo,
            MockMonitoringRepo,
        >,
    }

    fn harness(
        jobs: MockJobRepo,
        products: MockProductRepo,
        provider: MockProvider,
    ) -> Harness {
        let jobs = Arc::new(jobs);
        let stores = Arc::new(MockStoreRepo::default());
        let products = Arc::new(products);
        let changes = Arc::new(MockChangeRepo::default());
        let monitoring = Arc::new(MockMonitoringRepo::default());
        let worker = ReconcileWorker::new(
            jobs.clone(),
            stores.clone(),
            products.clone(),
            changes.clone(),
            monitoring.clone(),
            Arc::new(provider),
            actors(),
            &settings(),
        );
        Harness {
            jobs,
            stores,
            products,
            changes,
            monitoring,
            worker,
        }
    }

    async fn seed_store(h: &Harness) -> Store {
        let store = Store::new(
            "demo".to_string(),
            "https://demo.example".to_string(),
            StorePlatform::Shopify,
        );
        h.stores.create(&store).await.unwrap();
        store
    }

    fn running_job(store_id: Uuid, run_id: &str, log_id: Option<Uuid>) -> ScrapeJob {
        let mut job = ScrapeJob::new(store_id, ScraperType::Primary, log_id);
        job.run_id = Some(run_id.to_string());
        job.dataset_id = Some(format!("{run_id}-ds"));
        job
    }

    fn raw_item(id: &str, handle: &str, price_minor: i64) -> Value {
        json!({
            "id": id,
            "title": format!("Product {id}"),
            "handle": handle,
            "variants": [{"price": {"current": price_minor, "currency": "USD"}, "available": true}]
        })
    }

    #[tokio::test]
    async fn stale_job_is_force_failed() {
        let log_id = Uuid::new_v4();
        let h = harness(
            MockJobRepo::default(),
            MockProductRepo::default(),
            MockProvider::default(),
        );
        let store = seed_store(&h).await;

        let mut job = running_job(store.id, "run-stale", Some(log_id));
        job.started_at = (Utc::now() - Duration::hours(3)).fixed_offset();
        h.jobs.create(&job).await.unwrap();

        h.worker.run_once().await.unwrap();

        let stored = h.jobs.find_by_id(job.id).await.unwrap().unwrap();
        assert_eq!(stored.status, JobStatus::Failed);
        assert_eq!(stored.error_message.as_deref(), Some(STALE_REASON));

        let logs = h.monitoring.completed_logs.lock().unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].1, MonitoringStatus::Failed);
        assert_eq!(logs[0].5.as_deref(), Some(STALE_REASON));
    }

    #[tokio::test]
    async fn provider_outage_leaves_job_running() {
        let h = harness(
            MockJobRepo::default(),
            MockProductRepo::default(),
            MockProvider::default().with_status_error("run-1"),
        );
        let store = seed_store(&h).await;
        let job = running_job(store.id, "run-1", None);
        h.jobs.create(&job).await.unwrap();

        h.worker.run_once().await.unwrap();

        let stored = h.jobs.find_by_id(job.id).await.unwrap().unwrap();
        assert_eq!(stored.status, JobStatus::Running);
        assert!(stored.error_message.is_none());
    }

    #[tokio::test]
    async fn in_progress_run_is_left_alone() {
        let h = harness(
            MockJobRepo::default(),
            MockProductRepo::default(),
            MockProvider::default().with_status("run-2", RunState::Running, None),
        );
        let store = seed_store(&h).await;
        let job = running_job(store.id, "run-2", None);
        h.jobs.create(&job).await.unwrap();

        h.worker.run_once().await.unwrap();

        let stored = h.jobs.find_by_id(job.id).await.unwrap().unwrap();
        assert_eq!(stored.status, JobStatus::Running);
    }

    #[tokio::test]
    async fn terminal_failure_records_state_verbatim() {
        let h = harness(
            MockJobRepo::default(),
            MockProductRepo::default(),
            MockProvider::default().with_status("run-3", RunState::TimedOut, None),
        );
        let store = seed_store(&h).await;
        let job = running_job(store.id, "run-3", None);
        h.jobs.create(&job).await.unwrap();

        h.worker.run_once().await.unwrap();

        let stored = h.jobs.find_by_id(job.id).await.unwrap().unwrap();
        assert_eq!(stored.status, JobStatus::Failed);
        assert_eq!(stored.error_message.as_deref(), Some("TIMED-OUT"));
    }

    #[tokio::test]
    async fn zero_items_escalates_to_fallback() {
        let provider = MockProvider::default()
            .with_status("run-4", RunState::Succeeded, Some("ds-4"))
            .with_dataset("ds-4", vec![])
            .with_start(StartedRun {
                run_id: "run-4b".to_string(),
                dataset_id: Some("ds-4b".to_string()),
            });
        let h = harness(MockJobRepo::default(), MockProductRepo::default(), provider);
        let store = seed_store(&h).await;
        let job = running_job(store.id, "run-4", None);
        h.jobs.create(&job).await.unwrap();

        h.worker.run_once().await.unwrap();

        let rearms = h.jobs.rearms.lock().unwrap();
        assert_eq!(rearms.len(), 1);
        assert_eq!(rearms[0].1, ScraperType::PrimaryFallback);
        assert_eq!(rearms[0].2, "run-4b");
        drop(rearms);

        let stored = h.jobs.find_by_id(job.id).await.unwrap().unwrap();
        assert_eq!(stored.status, JobStatus::Running);
        assert!(stored.fallback_attempted);
        // No snapshot writes happened
        assert!(h.products.upserted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn zero_items_after_fallback_completes_empty() {
        let provider = MockProvider::default()
            .with_status("run-5", RunState::Succeeded, Some("ds-5"))
            .with_dataset("ds-5", vec![]);
        let h = harness(MockJobRepo::default(), MockProductRepo::default(), provider);
        let store = seed_store(&h).await;
        let mut job = running_job(store.id, "run-5", None);
        job.scraper_type = ScraperType::PrimaryFallback;
        job.fallback_attempted = true;
        h.jobs.create(&job).await.unwrap();

        h.worker.run_once().await.unwrap();

        let stored = h.jobs.find_by_id(job.id).await.unwrap().unwrap();
        assert_eq!(stored.status, JobStatus::Completed);
        assert_eq!(stored.products_found, 0);
        assert_eq!(stored.products_updated, 0);
        assert!(h.jobs.rearms.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn successful_run_converges_end_to_end() {
        let log_id = Uuid::new_v4();
        let provider = MockProvider::default()
            .with_status("run-6", RunState::Succeeded, Some("ds-6"))
            .with_dataset(
                "ds-6",
                vec![
                    raw_item("p1", "tee", 8000),
                    // Duplicate handle, dropped by dedupe
                    raw_item("p1-fr", "tee", 8000),
                    raw_item("p2", "cap", 3000),
                ],
            );

        // Prior snapshot: p1 at a different price, p3 now gone
        let store_id;
        let products = MockProductRepo::default();
        {
            let mut snapshot = products.snapshot.lock().unwrap();
            let mut p1 = NormalizedProduct::empty(Uuid::nil(), "p1".to_string());
            p1.price = 100.0;
            let p3 = NormalizedProduct::empty(Uuid::nil(), "p3".to_string());
            snapshot.push(p1);
            snapshot.push(p3);
        }

        let h = harness(MockJobRepo::default(), products, provider);
        let store = seed_store(&h).await;
        store_id = store.id;
        let job = running_job(store_id, "run-6", Some(log_id));
        h.jobs.create(&job).await.unwrap();

        h.worker.run_once().await.unwrap();

        let stored = h.jobs.find_by_id(job.id).await.unwrap().unwrap();
        assert_eq!(stored.status, JobStatus::Completed);
        // Deduped count, not raw item count
        assert_eq!(stored.products_found, 2);
        assert_eq!(stored.products_updated, 2);

        // p1 price change, p2 new, p3 removed
        let records = h.changes.records.lock().unwrap();
        assert_eq!(records.len(), 3);
        drop(records);
        assert_eq!(*h.products.removed.lock().unwrap(), vec!["p3".to_string()]);

        assert_eq!(*h.stores.stats_updates.lock().unwrap(), vec![(store_id, 2)]);

        let logs = h.monitoring.completed_logs.lock().unwrap();
        assert_eq!(logs.len(), 1);
        let (id, status, new, updated, removed, error) = logs[0].clone();
        assert_eq!(id, log_id);
        assert_eq!(status, MonitoringStatus::Completed);
        assert_eq!((new, updated, removed), (1, 1, 1));
        assert!(error.is_none());
    }

    #[tokio::test]
    async fn batch_failure_falls_back_to_row_writes() {
        let provider = MockProvider::default()
            .with_status("run-7", RunState::Succeeded, Some("ds-7"))
            .with_dataset(
                "ds-7",
                vec![
                    raw_item("p1", "a", 1000),
                    raw_item("p2", "b", 1000),
                    raw_item("p3", "c", 1000),
                ],
            );
        let products = MockProductRepo {
            fail_batches: true,
            fail_one_hash: Some("p2".to_string()),
            ..Default::default()
        };
        let h = harness(MockJobRepo::default(), products, provider);
        let store = seed_store(&h).await;
        let job = running_job(store.id, "run-7", None);
        h.jobs.create(&job).await.unwrap();

        h.worker.run_once().await.unwrap();

        let stored = h.jobs.find_by_id(job.id).await.unwrap().unwrap();
        assert_eq!(stored.status, JobStatus::Completed);
        assert_eq!(stored.products_found, 3);
        // One row dropped, the other two recovered individually
        assert_eq!(stored.products_updated, 2);
    }

    #[tokio::test]
    async fn lost_claim_race_is_a_no_op() {
        let provider = MockProvider::default()
            .with_status("run-8", RunState::Succeeded, Some("ds-8"))
            .with_dataset("ds-8", vec![raw_item("p1", "a", 1000)]);
        let jobs = MockJobRepo {
            deny_claims: true,
            ..Default::default()
        };
        let h = harness(jobs, MockProductRepo::default(), provider);
        let store = seed_store(&h).await;
        let job = running_job(store.id, "run-8", None);
        h.jobs.create(&job).await.unwrap();

        h.worker.run_once().await.unwrap();

        let stored = h.jobs.find_by_id(job.id).await.unwrap().unwrap();
        assert_eq!(stored.status, JobStatus::Running);
        assert!(h.products.upserted.lock().unwrap().is_empty());
        assert!(h.monitoring.completed_logs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn late_staleness_sweep_skips_finished_job() {
        let h = harness(
            MockJobRepo::default(),
            MockProductRepo::default(),
            MockProvider::default(),
        );
        let store = seed_store(&h).await;

        // The repo row converged while this pass still held an old batch
        let mut job = running_job(store.id, "run-10", Some(Uuid::new_v4()));
        job.started_at = (Utc::now() - Duration::hours(3)).fixed_offset();
        let mut finished = job.clone();
        finished.status = JobStatus::Completed;
        finished.products_found = 5;
        h.jobs.jobs.lock().unwrap().insert(finished.id, finished);
        h.jobs.lagged.lock().unwrap().push(job.clone());

        h.worker.run_once().await.unwrap();

        let stored = h.jobs.find_by_id(job.id).await.unwrap().unwrap();
        assert_eq!(stored.status, JobStatus::Completed);
        assert!(stored.error_message.is_none());
        assert_eq!(stored.products_found, 5);
        assert!(h.monitoring.completed_logs.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn dataset_fetch_failure_fails_the_job() {
        let provider =
            MockProvider::default().with_status("run-9", RunState::Succeeded, Some("ds-missing"));
        let h = harness(MockJobRepo::default(), MockProductRepo::default(), provider);
        let store = seed_store(&h).await;
        let job = running_job(store.id, "run-9", None);
        h.jobs.create(&job).await.unwrap();

        h.worker.run_once().await.unwrap();

        let stored = h.jobs.find_by_id(job.id).await.unwrap().unwrap();
        assert_eq!(stored.status, JobStatus::Failed);
        assert!(stored.error_message.is_some());
    }
}
