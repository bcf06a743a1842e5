// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::monitoring::{MonitoringConfig, MonitoringLog, MonitoringStatus};
use crate::domain::repositories::scrape_job_repository::RepositoryError;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use uuid::Uuid;

/// 监控仓库特质
///
/// 管理每店铺的调度配置和监控日志。
#[async_trait]
pub trait MonitoringRepository: Send + Sync {
    /// 创建店铺的监控配置
    async fn create_config(
        &self,
        config: &MonitoringConfig,
    ) -> Result<MonitoringConfig, RepositoryError>;
    /// 选出到期的启用配置，限制批量大小
    async fn find_due_configs(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<MonitoringConfig>, RepositoryError>;
    /// 触发时刻重算调度：last_check_at=now，next_check_at=next
    async fn reschedule(
        &self,
        config_id: Uuid,
        last_check_at: DateTime<FixedOffset>,
        next_check_at: DateTime<FixedOffset>,
    ) -> Result<(), RepositoryError>;
    /// 关闭店铺的监控配置（店铺暂停时）
    async fn disable_for_store(&self, store_id: Uuid) -> Result<(), RepositoryError>;
    /// 创建一条运行中的监控日志
    async fn create_log(&self, log: &MonitoringLog) -> Result<MonitoringLog, RepositoryError>;
    /// 收敛一条监控日志：写入终态、变更计数和错误信息
    async fn complete_log(
        &self,
        log_id: Uuid,
        status: MonitoringStatus,
        new_products: i32,
        updated_products: i32,
        removed_products: i32,
        error_message: Option<&str>,
    ) -> Result<(), RepositoryError>;
}
