// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::scrape_job::{ScrapeJob, ScraperType};
use async_trait::async_trait;
use sea_orm::DbErr;
use thiserror::Error;
use uuid::Uuid;

/// 仓库错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    /// 数据库错误
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    /// 记录未找到
    #[error("Record not found")]
    NotFound,
}

/// 抓取任务仓库特质
///
/// 定义抓取任务数据访问接口。状态机的所有持久化转换
/// 都经过这里，尤其是条件认领写入。
#[async_trait]
pub trait ScrapeJobRepository: Send + Sync {
    /// 创建新任务
    async fn create(&self, job: &ScrapeJob) -> Result<ScrapeJob, RepositoryError>;
    /// 根据ID查找任务
    async fn find_by_id(&self, id: Uuid) -> Result<Option<ScrapeJob>, RepositoryError>;
    /// 记录外部运行ID和数据集ID
    async fn set_run(
        &self,
        id: Uuid,
        run_id: &str,
        dataset_id: Option<&str>,
    ) -> Result<(), RepositoryError>;
    /// 查找携带运行ID的 Running 任务，按 started_at 最旧优先
    async fn find_running_with_run(&self, limit: u64) -> Result<Vec<ScrapeJob>, RepositoryError>;
    /// 条件认领：仅当任务仍为 Running 时转入 Processing
    ///
    /// 返回 false 表示零行受影响，任务已被其他轮询者认领，
    /// 调用方必须按无操作处理。这是并发安全的唯一保障。
    async fn claim_processing(&self, id: Uuid) -> Result<bool, RepositoryError>;
    /// 用备用提供方重新武装任务：状态回到 Running，
    /// scraper_type 切换，fallback_attempted 置真，运行ID更新
    async fn rearm_with_fallback(
        &self,
        id: Uuid,
        scraper_type: ScraperType,
        run_id: &str,
        dataset_id: Option<&str>,
    ) -> Result<(), RepositoryError>;
    /// 条件完成：仅当任务仍为 Processing 时写入计数并转入 Completed
    ///
    /// 返回 false 表示任务已不在 Processing，比如被陈旧清扫
    /// 抢先收敛，调用方按无操作处理。
    async fn mark_completed(
        &self,
        id: Uuid,
        products_found: i32,
        products_updated: i32,
    ) -> Result<bool, RepositoryError>;
    /// 条件失败：仅当任务仍为 Running 或 Processing 时记录原因
    ///
    /// 终态行从不被覆盖，返回 false 表示任务已收敛。
    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<bool, RepositoryError>;
}
