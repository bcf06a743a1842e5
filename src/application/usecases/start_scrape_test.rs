#[cfg(test)]
mod tests {
    use crate::application::usecases::start_scrape::{
        ScrapeActors, StartScrapeError, StartScrapeUseCase,
    };
    use crate::domain::models::monitoring::{MonitoringConfig, MonitoringLog, MonitoringStatus};
    use crate::domain::models::scrape_job::{JobStatus, ScrapeJob, ScraperType};
    use crate::domain::models::store::{Store, StorePlatform};
    use crate::domain::repositories::monitoring_repository::MonitoringRepository;
    use crate::domain::repositories::scrape_job_repository::{
        RepositoryError, ScrapeJobRepository,
    };
    use crate::providers::traits::{
        ProviderError, RunProvider, RunStatus, StartedRun,
    };
    use async_trait::async_trait;
    use chrono::{DateTime, FixedOffset, Utc};
    use serde_json::Value;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use uuid::Uuid;

    #[derive(Default)]
    pub struct MockJobRepo {
        pub jobs: Mutex<HashMap<Uuid, ScrapeJob>>,
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
            id: Uuid,
            run_id: &str,
            dataset_id: Option<&str>,
        ) -> Result<(), RepositoryError> {
            let mut jobs = self.jobs.lock().unwrap();
            let job = jobs.get_mut(&id).ok_or(RepositoryError::NotFound)?;
            job.run_id = Some(run_id.to_string());
            job.dataset_id = dataset_id.map(str::to_string);
            Ok(())
        }

        async fn find_running_with_run(
            &self,
            _limit: u64,
        ) -> Result<Vec<ScrapeJob>, RepositoryError> {
            Ok(vec![])
        }

        async fn claim_processing(&self, id: Uuid) -> Result<bool, RepositoryError> {
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
            _id: Uuid,
            _scraper_type: ScraperType,
            _run_id: &str,
            _dataset_id: Option<&str>,
        ) -> Result<(), RepositoryError> {
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
    pub struct MockMonitoringRepo {
        pub completed_logs: Mutex<Vec<(Uuid, MonitoringStatus, Option<String>)>>,
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
            _new_products: i32,
            _updated_products: i32,
            _removed_products: i32,
            error_message: Option<&str>,
        ) -> Result<(), RepositoryError> {
            self.completed_logs.lock().unwrap().push((
                log_id,
                status,
                error_message.map(str::to_string),
            ));
            Ok(())
        }
    }

    pub struct MockProvider {
        pub start_result: Mutex<Option<Result<StartedRun, ProviderError>>>,
        pub started_actors: Mutex<Vec<String>>,
    }

    impl MockProvider {
        pub fn starting_ok(run_id: &str, dataset_id: Option<&str>) -> Self {
            Self {
                start_result: Mutex::new(Some(Ok(StartedRun {
                    run_id: run_id.to_string(),
                    dataset_id: dataset_id.map(str::to_string),
                }))),
                started_actors: Mutex::new(Vec::new()),
            }
        }

        pub fn refusing(status: u16) -> Self {
            Self {
                start_result: Mutex::new(Some(Err(ProviderError::Api {
                    status,
                    message: "no capacity".to_string(),
                }))),
                started_actors: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl RunProvider for MockProvider {
        async fn start_run(
            &self,
            actor_id: &str,
            _input: &Value,
        ) -> Result<StartedRun, ProviderError> {
            self.started_actors
                .lock()
                .unwrap()
                .push(actor_id.to_string());
            self.start_result
                .lock()
                .unwrap()
                .take()
                .expect("unexpected start_run call")
        }

        async fn run_status(&self, _run_id: &str) -> Result<RunStatus, ProviderError> {
            unreachable!("not used in these tests")
        }

        async fn dataset_items(&self, _dataset_id: &str) -> Result<Vec<Value>, ProviderError> {
            unreachable!("not used in these tests")
        }
    }

    fn actors() -> ScrapeActors {
        ScrapeActors {
            primary: "shop~catalog".to_string(),
            fallback: Some("shop~fallback".to_string()),
            platform: "shop~woo".to_string(),
        }
    }

    fn store() -> Store {
        Store::new(
            "demo".to_string(),
            "https://demo.example".to_string(),
            StorePlatform::Shopify,
        )
    }

    #[tokio::test]
    async fn start_creates_running_job_with_run_ids() {
        let jobs = Arc::new(MockJobRepo::default());
        let monitoring = Arc::new(MockMonitoringRepo::default());
        let provider = Arc::new(MockProvider::starting_ok("run-1", Some("ds-1")));
        let usecase = StartScrapeUseCase::new(
            jobs.clone(),
            monitoring,
            provider.clone(),
            actors(),
        );

        let job = usecase
            .execute(&store(), ScraperType::Primary, None)
            .await
            .unwrap();

        assert_eq!(job.status, JobStatus::Running);
        assert_eq!(job.run_id.as_deref(), Some("run-1"));
        assert_eq!(job.dataset_id.as_deref(), Some("ds-1"));
        assert_eq!(
            *provider.started_actors.lock().unwrap(),
            vec!["shop~catalog".to_string()]
        );

        let stored = jobs.jobs.lock().unwrap();
        let stored_job = stored.get(&job.id).unwrap();
        assert_eq!(stored_job.run_id.as_deref(), Some("run-1"));
    }

    #[tokio::test]
    async fn platform_store_uses_platform_actor() {
        let jobs = Arc::new(MockJobRepo::default());
        let monitoring = Arc::new(MockMonitoringRepo::default());
        let provider = Arc::new(MockProvider::starting_ok("run-2", None));
        let usecase =
            StartScrapeUseCase::new(jobs, monitoring, provider.clone(), actors());

        let mut woo_store = store();
        woo_store.platform = StorePlatform::Woocommerce;
        usecase
            .execute(&woo_store, ScraperType::Platform, None)
            .await
            .unwrap();

        assert_eq!(
            *provider.started_actors.lock().unwrap(),
            vec!["shop~woo".to_string()]
        );
    }

    #[tokio::test]
    async fn provider_refusal_fails_job_and_log() {
        let jobs = Arc::new(MockJobRepo::default());
        let monitoring = Arc::new(MockMonitoringRepo::default());
        let provider = Arc::new(MockProvider::refusing(402));
        let usecase = StartScrapeUseCase::new(
            jobs.clone(),
            monitoring.clone(),
            provider,
            actors(),
        );

        let log_id = Uuid::new_v4();
        let result = usecase
            .execute(&store(), ScraperType::Primary, Some(log_id))
            .await;

        assert!(matches!(result, Err(StartScrapeError::Provider(_))));

        let stored = jobs.jobs.lock().unwrap();
        let job = stored.values().next().unwrap();
        assert_eq!(job.status, JobStatus::Failed);
        assert!(job.error_message.as_deref().unwrap().contains("402"));

        let logs = monitoring.completed_logs.lock().unwrap();
        assert_eq!(logs.len(), 1);
        assert_eq!(logs[0].0, log_id);
        assert_eq!(logs[0].1, MonitoringStatus::Failed);
    }

    #[tokio::test]
    async fn missing_fallback_actor_is_rejected_before_any_write() {
        let jobs = Arc::new(MockJobRepo::default());
        let monitoring = Arc::new(MockMonitoringRepo::default());
        let provider = Arc::new(MockProvider::starting_ok("run-3", None));
        let mut no_fallback = actors();
        no_fallback.fallback = None;
        let usecase =
            StartScrapeUseCase::new(jobs.clone(), monitoring, provider, no_fallback);

        let result = usecase
            .execute(&store(), ScraperType::PrimaryFallback, None)
            .await;

        assert!(matches!(
            result,
            Err(StartScrapeError::ActorNotConfigured(_))
        ));
        assert!(jobs.jobs.lock().unwrap().is_empty());
    }
}
