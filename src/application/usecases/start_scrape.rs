// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use std::sync::Arc;

use metrics::counter;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::models::monitoring::MonitoringStatus;
use crate::domain::models::scrape_job::{ScrapeJob, ScraperType};
use crate::domain::models::store::Store;
use crate::domain::repositories::monitoring_repository::MonitoringRepository;
use crate::domain::repositories::scrape_job_repository::{RepositoryError, ScrapeJobRepository};
use crate::providers::traits::{ProviderError, RunProvider};

/// 抓取actor配置
///
/// 三种抓取器类型到提供方actor ID的映射，从配置装载。
#[derive(Debug, Clone)]
pub struct ScrapeActors {
    /// 主抓取actor
    pub primary: String,
    /// 备用抓取actor，缺省时不做备用升级
    pub fallback: Option<String>,
    /// 平台插件抓取actor
    pub platform: String,
}

impl ScrapeActors {
    /// 查找抓取器类型对应的actor ID
    pub fn actor_for(&self, scraper_type: ScraperType) -> Option<&str> {
        match scraper_type {
            ScraperType::Primary => Some(self.primary.as_str()),
            ScraperType::PrimaryFallback => self.fallback.as_deref(),
            ScraperType::Platform => Some(self.platform.as_str()),
        }
    }

    /// 构造actor的运行输入
    pub fn run_input(&self, store: &Store, scraper_type: ScraperType) -> Value {
        match scraper_type {
            ScraperType::Platform => json!({ "baseUrl": store.base_url }),
            _ => json!({ "startUrls": [{ "url": store.base_url }] }),
        }
    }
}

/// 用例错误类型
#[derive(Error, Debug)]
pub enum StartScrapeError {
    /// 持久化错误
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
    /// 提供方拒绝或失败，任务已被标记为失败
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
    /// 请求的抓取器类型没有配置actor
    #[error("No actor configured for scraper type {0}")]
    ActorNotConfigured(ScraperType),
}

/// 启动抓取用例
///
/// 任务进入状态机的唯一入口：创建 Running 任务、请求外部
/// 运行、回填运行ID。监控调度器和手动触发API都经过这里，
/// 保证两条路径产生完全相同的任务。
pub struct StartScrapeUseCase<J, M> {
    job_repo: Arc<J>,
    monitoring_repo: Arc<M>,
    provider: Arc<dyn RunProvider>,
    actors: ScrapeActors,
}

impl<J, M> StartScrapeUseCase<J, M>
where
    J: ScrapeJobRepository,
    M: MonitoringRepository,
{
    pub fn new(
        job_repo: Arc<J>,
        monitoring_repo: Arc<M>,
        provider: Arc<dyn RunProvider>,
        actors: ScrapeActors,
    ) -> Self {
        Self {
            job_repo,
            monitoring_repo,
            provider,
            actors,
        }
    }

    /// 为店铺启动一次抓取
    ///
    /// 任务先落库再请求提供方：提供方拒绝时任务已存在，
    /// 直接收敛为 Failed，关联的监控日志一并收敛，不会留下
    /// 悬挂记录。
    pub async fn execute(
        &self,
        store: &Store,
        scraper_type: ScraperType,
        monitoring_log_id: Option<Uuid>,
    ) -> Result<ScrapeJob, StartScrapeError> {
        let actor_id = self
            .actors
            .actor_for(scraper_type)
            .ok_or(StartScrapeError::ActorNotConfigured(scraper_type))?
            .to_string();

        let mut job = ScrapeJob::new(store.id, scraper_type, monitoring_log_id);
        self.job_repo.create(&job).await?;

        let input = self.actors.run_input(store, scraper_type);
        match self.provider.start_run(&actor_id, &input).await {
            Ok(started) => {
                self.job_repo
                    .set_run(job.id, &started.run_id, started.dataset_id.as_deref())
                    .await?;
                counter!("scrape_jobs_started_total").increment(1);
                info!(
                    store_id = %store.id,
                    job_id = %job.id,
                    run_id = %started.run_id,
                    scraper_type = %scraper_type,
                    "scrape job started"
                );
                job.run_id = Some(started.run_id);
                job.dataset_id = started.dataset_id;
                Ok(job)
            }
            Err(err) => {
                error!(
                    store_id = %store.id,
                    job_id = %job.id,
                    error = %err,
                    "provider refused to start run"
                );
                let reason = err.to_string();
                self.job_repo.mark_failed(job.id, &reason).await?;
                counter!("scrape_jobs_failed_total").increment(1);
                if let Some(log_id) = monitoring_log_id {
                    self.monitoring_repo
                        .complete_log(log_id, MonitoringStatus::Failed, 0, 0, 0, Some(&reason))
                        .await?;
                }
                Err(err.into())
            }
        }
    }
}

#[cfg(test)]
#[path = "start_scrape_test.rs"]
mod tests;
