// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::Utc;
use metrics::{counter, histogram};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::application::usecases::start_scrape::ScrapeActors;
use crate::config::settings::ReconcilerSettings;
use crate::domain::models::monitoring::MonitoringStatus;
use crate::domain::models::product::NormalizedProduct;
use crate::domain::models::product_change::ChangeSummary;
use crate::domain::models::scrape_job::{ScrapeJob, ScraperType, STALE_REASON};
use crate::domain::repositories::monitoring_repository::MonitoringRepository;
use crate::domain::repositories::product_change_repository::ProductChangeRepository;
use crate::domain::repositories::product_repository::ProductRepository;
use crate::domain::repositories::scrape_job_repository::ScrapeJobRepository;
use crate::domain::repositories::store_repository::StoreRepository;
use crate::domain::services::change_detection::ChangeDetector;
use crate::domain::services::deduplicator::dedupe_by_handle;
use crate::domain::services::normalizer::{normalize, MapperKind};
use crate::providers::traits::{RunProvider, RunState};

/// 数据集无法解析时的失败原因
const NO_DATASET_REASON: &str = "NO_DATASET";

/// 任务调和工作器
///
/// 周期性轮询 Running 任务的外部运行状态，驱动任务状态机：
/// 陈旧清扫、认领、备用升级、规范化、变更检测和快照落库
/// 都在这里串联。每轮按 started_at 最旧优先顺序逐个处理，
/// 单个任务的错误被隔离，不会中断整批。
pub struct ReconcileWorker<J, St, P, C, M>
where
    J: ScrapeJobRepository + 'static,
    St: StoreRepository + 'static,
    P: ProductRepository + 'static,
    C: ProductChangeRepository + 'static,
    M: MonitoringRepository + 'static,
{
    job_repo: Arc<J>,
    store_repo: Arc<St>,
    product_repo: Arc<P>,
    monitoring_repo: Arc<M>,
    provider: Arc<dyn RunProvider>,
    detector: ChangeDetector<P, C>,
    actors: ScrapeActors,
    poll_interval: Duration,
    poll_batch_size: u64,
    stale_after: chrono::Duration,
    upsert_batch_size: usize,
}

impl<J, St, P, C, M> ReconcileWorker<J, St, P, C, M>
where
    J: ScrapeJobRepository + 'static,
    St: StoreRepository + 'static,
    P: ProductRepository + 'static,
    C: ProductChangeRepository + 'static,
    M: MonitoringRepository + 'static,
{
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        job_repo: Arc<J>,
        store_repo: Arc<St>,
        product_repo: Arc<P>,
        change_repo: Arc<C>,
        monitoring_repo: Arc<M>,
        provider: Arc<dyn RunProvider>,
        actors: ScrapeActors,
        settings: &ReconcilerSettings,
    ) -> Self {
        let detector = ChangeDetector::new(
            product_repo.clone(),
            change_repo,
            settings.change_batch_size,
        );
        Self {
            job_repo,
            store_repo,
            product_repo,
            monitoring_repo,
            provider,
            detector,
            actors,
            poll_interval: Duration::from_secs(settings.poll_interval_secs),
            poll_batch_size: settings.poll_batch_size,
            stale_after: chrono::Duration::hours(settings.stale_after_hours),
            upsert_batch_size: settings.upsert_batch_size.max(1),
        }
    }

    /// 运行工作器
    pub async fn run(&self) {
        info!("Scrape job reconcile worker started");

        let mut interval = tokio::time::interval(self.poll_interval);

        loop {
            interval.tick().await;

            if let Err(e) = self.run_once().await {
                error!("Reconcile pass failed: {}", e);
            }
        }
    }

    /// 启动后台运行
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    /// 执行一轮调和
    ///
    /// 任务按顺序处理而不是并发，限制单轮的资源占用。
    pub async fn run_once(&self) -> Result<(), String> {
        let start = Instant::now();
        let jobs = self
            .job_repo
            .find_running_with_run(self.poll_batch_size)
            .await
            .map_err(|e| e.to_string())?;

        for job in jobs {
            let job_id = job.id;
            if let Err(e) = self.reconcile_job(job).await {
                error!(job_id = %job_id, "Failed to reconcile job: {}", e);
            }
        }

        histogram!("reconcile_pass_duration_seconds").record(start.elapsed().as_secs_f64());
        Ok(())
    }

    /// 调和单个任务
    async fn reconcile_job(&self, job: ScrapeJob) -> Result<(), String> {
        // Staleness wins over whatever the provider would say
        if job.is_stale(Utc::now(), self.stale_after) {
            warn!(job_id = %job.id, "job exceeded staleness threshold, force-failing");
            counter!("scrape_jobs_stale_total").increment(1);
            self.fail_job(&job, STALE_REASON).await?;
            return Ok(());
        }

        let run_id = match &job.run_id {
            Some(run_id) => run_id.clone(),
            None => return Ok(()),
        };

        // Provider unavailability is transient, leave the job running
        let status = match self.provider.run_status(&run_id).await {
            Ok(status) => status,
            Err(e) => {
                debug!(job_id = %job.id, "provider status check failed, retrying next poll: {}", e);
                return Ok(());
            }
        };

        match status.state {
            state if !state.is_terminal() => Ok(()),
            RunState::Succeeded => {
                let dataset_id = status.dataset_id.or_else(|| job.dataset_id.clone());
                self.converge_succeeded(job, dataset_id).await
            }
            state => {
                let reason = match state {
                    RunState::Failed => "FAILED",
                    RunState::Aborted => "ABORTED",
                    RunState::TimedOut => "TIMED-OUT",
                    _ => "FAILED",
                };
                info!(job_id = %job.id, reason, "provider run ended in failure");
                self.fail_job(&job, reason).await?;
                Ok(())
            }
        }
    }

    /// 收敛一个提供方运行成功的任务
    async fn converge_succeeded(
        &self,
        job: ScrapeJob,
        dataset_id: Option<String>,
    ) -> Result<(), String> {
        // Losing the claim race is a benign no-op
        let claimed = self
            .job_repo
            .claim_processing(job.id)
            .await
            .map_err(|e| e.to_string())?;
        if !claimed {
            debug!(job_id = %job.id, "job already claimed by another poller");
            return Ok(());
        }

        let dataset_id = match dataset_id {
            Some(id) => id,
            None => {
                self.fail_job(&job, NO_DATASET_REASON).await?;
                return Ok(());
            }
        };

        let items = match self.provider.dataset_items(&dataset_id).await {
            Ok(items) => items,
            Err(e) => {
                self.fail_job(&job, &e.to_string()).await?;
                return Ok(());
            }
        };

        let store = self
            .store_repo
            .find_by_id(job.store_id)
            .await
            .map_err(|e| e.to_string())?;
        let store = match store {
            Some(store) => store,
            None => {
                self.fail_job(&job, "store no longer exists").await?;
                return Ok(());
            }
        };

        if items.is_empty() && job.can_escalate_to_fallback() {
            if let Some(fallback_actor) = self.actors.fallback.clone() {
                info!(job_id = %job.id, "primary run returned zero items, escalating to fallback");
                let input = self
                    .actors
                    .run_input(&store, ScraperType::PrimaryFallback);
                match self.provider.start_run(&fallback_actor, &input).await {
                    Ok(started) => {
                        self.job_repo
                            .rearm_with_fallback(
                                job.id,
                                ScraperType::PrimaryFallback,
                                &started.run_id,
                                started.dataset_id.as_deref(),
                            )
                            .await
                            .map_err(|e| e.to_string())?;
                        counter!("scrape_jobs_fallback_total").increment(1);
                        return Ok(());
                    }
                    Err(e) => {
                        self.fail_job(&job, &e.to_string()).await?;
                        return Ok(());
                    }
                }
            }
        }

        let kind = MapperKind::for_scraper(job.scraper_type);
        let products: Vec<NormalizedProduct> = items
            .iter()
            .map(|item| normalize(item, job.store_id, kind))
            .collect();
        let products = dedupe_by_handle(products);

        // Diff runs against the snapshot before it is overwritten
        let summary = self
            .detector
            .detect_and_record(job.store_id, &products)
            .await
            .map_err(|e| e.to_string())?;
        counter!("product_changes_total").increment(summary.total_changes as u64);

        let written = self.upsert_snapshot(&products).await;
        counter!("products_upserted_total").increment(written);

        self.store_repo
            .update_scrape_stats(store.id, products.len() as i32, Utc::now().into())
            .await
            .map_err(|e| e.to_string())?;

        let completed = self
            .job_repo
            .mark_completed(job.id, products.len() as i32, written as i32)
            .await
            .map_err(|e| e.to_string())?;
        if !completed {
            debug!(job_id = %job.id, "job no longer processing, completion skipped");
            return Ok(());
        }
        counter!("scrape_jobs_completed_total").increment(1);

        info!(
            job_id = %job.id,
            store_id = %store.id,
            products_found = products.len(),
            products_updated = written,
            new = summary.new,
            updated = summary.updated,
            removed = summary.removed,
            "scrape job completed"
        );

        self.complete_log(&job, MonitoringStatus::Completed, &summary, None)
            .await;
        Ok(())
    }

    /// 批量写入快照，批次失败时逐行兜底
    async fn upsert_snapshot(&self, products: &[NormalizedProduct]) -> u64 {
        let mut written: u64 = 0;
        for chunk in products.chunks(self.upsert_batch_size) {
            match self.product_repo.upsert_batch(chunk).await {
                Ok(count) => written += count,
                Err(e) => {
                    warn!("batch upsert failed, retrying rows individually: {}", e);
                    for product in chunk {
                        match self.product_repo.upsert_one(product).await {
                            Ok(()) => written += 1,
                            Err(e) => {
                                warn!(hash_id = %product.hash_id, "dropping product row: {}", e);
                            }
                        }
                    }
                }
            }
        }
        written
    }

    /// 将任务和关联监控日志一并收敛为失败
    ///
    /// 条件写入输掉竞争时整体退化为无操作，不动监控日志。
    async fn fail_job(&self, job: &ScrapeJob, reason: &str) -> Result<(), String> {
        let failed = self
            .job_repo
            .mark_failed(job.id, reason)
            .await
            .map_err(|e| e.to_string())?;
        if !failed {
            debug!(job_id = %job.id, "job already terminal, failure skipped");
            return Ok(());
        }
        counter!("scrape_jobs_failed_total").increment(1);
        self.complete_log(job, MonitoringStatus::Failed, &ChangeSummary::zero(), Some(reason))
            .await;
        Ok(())
    }

    /// 收敛关联的监控日志，失败只记日志
    async fn complete_log(
        &self,
        job: &ScrapeJob,
        status: MonitoringStatus,
        summary: &ChangeSummary,
        error_message: Option<&str>,
    ) {
        let Some(log_id) = job.monitoring_log_id else {
            return;
        };
        if let Err(e) = self
            .monitoring_repo
            .complete_log(
                log_id,
                status,
                summary.new as i32,
                summary.updated as i32,
                summary.removed as i32,
                error_message,
            )
            .await
        {
            warn!(log_id = %log_id, "failed to complete monitoring log: {}", e);
        }
    }
}

#[cfg(test)]
#[path = "reconcile_worker_test.rs"]
mod tests;
