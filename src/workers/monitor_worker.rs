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
use std::time::Duration;

use chrono::Utc;
use metrics::counter;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::application::usecases::start_scrape::StartScrapeUseCase;
use crate::config::settings::MonitoringSettings;
use crate::domain::models::monitoring::{MonitoringConfig, MonitoringLog};
use crate::domain::models::scrape_job::ScraperType;
use crate::domain::repositories::monitoring_repository::MonitoringRepository;
use crate::domain::repositories::scrape_job_repository::ScrapeJobRepository;
use crate::domain::repositories::store_repository::StoreRepository;

/// 监控调度工作器
///
/// 周期性扫描到期的监控配置，为每个到期店铺创建监控日志
/// 并启动一次抓取。重排程发生在触发时刻且与启动结果无关，
/// 单个店铺的失败不会冻结它的调度。
pub struct MonitorWorker<J, M, St>
where
    J: ScrapeJobRepository + 'static,
    M: MonitoringRepository + 'static,
    St: StoreRepository + 'static,
{
    monitoring_repo: Arc<M>,
    store_repo: Arc<St>,
    usecase: Arc<StartScrapeUseCase<J, M>>,
    tick_interval: Duration,
    batch_size: u64,
    jitter_secs: i64,
}

impl<J, M, St> MonitorWorker<J, M, St>
where
    J: ScrapeJobRepository + 'static,
    M: MonitoringRepository + 'static,
    St: StoreRepository + 'static,
{
    pub fn new(
        monitoring_repo: Arc<M>,
        store_repo: Arc<St>,
        usecase: Arc<StartScrapeUseCase<J, M>>,
        settings: &MonitoringSettings,
    ) -> Self {
        Self {
            monitoring_repo,
            store_repo,
            usecase,
            tick_interval: Duration::from_secs(settings.tick_interval_secs),
            batch_size: settings.batch_size,
            jitter_secs: settings.jitter_secs.max(0),
        }
    }

    /// 运行工作器
    pub async fn run(&self) {
        info!("Monitoring scheduler started");

        let mut interval = tokio::time::interval(self.tick_interval);

        loop {
            interval.tick().await;

            if let Err(e) = self.run_once().await {
                error!("Monitoring pass failed: {}", e);
            }
        }
    }

    /// 启动后台运行
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            self.run().await;
        })
    }

    /// 执行一轮调度
    pub async fn run_once(&self) -> Result<(), String> {
        let now = Utc::now();
        let configs = self
            .monitoring_repo
            .find_due_configs(now, self.batch_size)
            .await
            .map_err(|e| e.to_string())?;

        for config in configs {
            let config_id = config.id;
            if let Err(e) = self.trigger(config).await {
                error!(config_id = %config_id, "Failed to trigger monitoring check: {}", e);
            }
        }

        Ok(())
    }

    /// 触发单个到期配置的抓取
    async fn trigger(&self, config: MonitoringConfig) -> Result<(), String> {
        let store = self
            .store_repo
            .find_by_id(config.store_id)
            .await
            .map_err(|e| e.to_string())?;

        let store = match store {
            Some(store) if store.deleted => {
                warn!(store_id = %config.store_id, "store deleted, disabling monitoring");
                self.monitoring_repo
                    .disable_for_store(config.store_id)
                    .await
                    .map_err(|e| e.to_string())?;
                return Ok(());
            }
            Some(store) => store,
            None => {
                warn!(store_id = %config.store_id, "store missing, disabling monitoring");
                self.monitoring_repo
                    .disable_for_store(config.store_id)
                    .await
                    .map_err(|e| e.to_string())?;
                return Ok(());
            }
        };

        // Rescheduling happens at trigger time regardless of the start
        // outcome, so a refusing provider cannot stall the schedule.
        let now = Utc::now();
        let jitter = chrono::Duration::seconds(rand::random_range(0..=self.jitter_secs));
        self.monitoring_repo
            .reschedule(config.id, now.into(), config.next_check_from(now, jitter))
            .await
            .map_err(|e| e.to_string())?;

        if !store.is_monitorable() {
            info!(store_id = %store.id, "store paused, disabling monitoring");
            self.monitoring_repo
                .disable_for_store(store.id)
                .await
                .map_err(|e| e.to_string())?;
            return Ok(());
        }

        let log = self
            .monitoring_repo
            .create_log(&MonitoringLog::new(store.id))
            .await
            .map_err(|e| e.to_string())?;

        let scraper_type = if store.platform.is_plugin_platform() {
            ScraperType::Platform
        } else {
            ScraperType::Primary
        };

        counter!("monitoring_runs_total").increment(1);

        // A start failure already converged the job and the log
        if let Err(e) = self.usecase.execute(&store, scraper_type, Some(log.id)).await {
            warn!(store_id = %store.id, "monitoring-triggered scrape failed to start: {}", e);
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "monitor_worker_test.rs"]
mod tests;
