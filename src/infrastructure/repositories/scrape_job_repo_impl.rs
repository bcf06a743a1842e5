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

use crate::domain::models::scrape_job::{JobStatus, ScrapeJob, ScraperType};
use crate::domain::repositories::scrape_job_repository::{RepositoryError, ScrapeJobRepository};
use crate::infrastructure::database::entities::scrape_job as job_entity;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// 抓取任务仓库实现
///
/// 基于SeaORM实现的抓取任务数据访问层
#[derive(Clone)]
pub struct ScrapeJobRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl ScrapeJobRepositoryImpl {
    /// 创建新的抓取任务仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<job_entity::Model> for ScrapeJob {
    fn from(model: job_entity::Model) -> Self {
        Self {
            id: model.id,
            store_id: model.store_id,
            status: model.status.parse().unwrap_or_default(),
            scraper_type: model.scraper_type.parse().unwrap_or_default(),
            run_id: model.run_id,
            dataset_id: model.dataset_id,
            fallback_attempted: model.fallback_attempted,
            products_found: model.products_found,
            products_updated: model.products_updated,
            error_message: model.error_message,
            monitoring_log_id: model.monitoring_log_id,
            started_at: model.started_at,
            completed_at: model.completed_at,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<ScrapeJob> for job_entity::ActiveModel {
    fn from(job: ScrapeJob) -> Self {
        Self {
            id: Set(job.id),
            store_id: Set(job.store_id),
            status: Set(job.status.to_string()),
            scraper_type: Set(job.scraper_type.to_string()),
            run_id: Set(job.run_id),
            dataset_id: Set(job.dataset_id),
            fallback_attempted: Set(job.fallback_attempted),
            products_found: Set(job.products_found),
            products_updated: Set(job.products_updated),
            error_message: Set(job.error_message),
            monitoring_log_id: Set(job.monitoring_log_id),
            started_at: Set(job.started_at),
            completed_at: Set(job.completed_at),
            created_at: Set(job.created_at),
            updated_at: Set(job.updated_at),
        }
    }
}

#[async_trait]
impl ScrapeJobRepository for ScrapeJobRepositoryImpl {
    async fn create(&self, job: &ScrapeJob) -> Result<ScrapeJob, RepositoryError> {
        let model: job_entity::ActiveModel = job.clone().into();

        model.insert(self.db.as_ref()).await?;
        Ok(job.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<ScrapeJob>, RepositoryError> {
        let model = job_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn set_run(
        &self,
        id: Uuid,
        run_id: &str,
        dataset_id: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let result = job_entity::Entity::update_many()
            .col_expr(
                job_entity::Column::RunId,
                Expr::value(Some(run_id.to_string())),
            )
            .col_expr(
                job_entity::Column::DatasetId,
                Expr::value(dataset_id.map(str::to_string)),
            )
            .col_expr(
                job_entity::Column::UpdatedAt,
                Expr::value(DateTime::<FixedOffset>::from(Utc::now())),
            )
            .filter(job_entity::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn find_running_with_run(&self, limit: u64) -> Result<Vec<ScrapeJob>, RepositoryError> {
        let models = job_entity::Entity::find()
            .filter(job_entity::Column::Status.eq(JobStatus::Running.to_string()))
            .filter(job_entity::Column::RunId.is_not_null())
            .order_by_asc(job_entity::Column::StartedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(ScrapeJob::from).collect())
    }

    async fn claim_processing(&self, id: Uuid) -> Result<bool, RepositoryError> {
        // Conditional write: the status filter makes concurrent claims
        // race on rows_affected, exactly one poller wins
        let result = job_entity::Entity::update_many()
            .col_expr(
                job_entity::Column::Status,
                Expr::value(JobStatus::Processing.to_string()),
            )
            .col_expr(
                job_entity::Column::UpdatedAt,
                Expr::value(DateTime::<FixedOffset>::from(Utc::now())),
            )
            .filter(job_entity::Column::Id.eq(id))
            .filter(job_entity::Column::Status.eq(JobStatus::Running.to_string()))
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn rearm_with_fallback(
        &self,
        id: Uuid,
        scraper_type: ScraperType,
        run_id: &str,
        dataset_id: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let now: DateTime<FixedOffset> = Utc::now().into();
        let result = job_entity::Entity::update_many()
            .col_expr(
                job_entity::Column::Status,
                Expr::value(JobStatus::Running.to_string()),
            )
            .col_expr(
                job_entity::Column::ScraperType,
                Expr::value(scraper_type.to_string()),
            )
            .col_expr(job_entity::Column::FallbackAttempted, Expr::value(true))
            .col_expr(
                job_entity::Column::RunId,
                Expr::value(Some(run_id.to_string())),
            )
            .col_expr(
                job_entity::Column::DatasetId,
                Expr::value(dataset_id.map(str::to_string)),
            )
            // Reset the staleness clock, the fallback run starts fresh
            .col_expr(job_entity::Column::StartedAt, Expr::value(now))
            .col_expr(job_entity::Column::UpdatedAt, Expr::value(now))
            .filter(job_entity::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn mark_completed(
        &self,
        id: Uuid,
        products_found: i32,
        products_updated: i32,
    ) -> Result<bool, RepositoryError> {
        let now: DateTime<FixedOffset> = Utc::now().into();
        // Only the claim holder completes, everything else lost the race
        let result = job_entity::Entity::update_many()
            .col_expr(
                job_entity::Column::Status,
                Expr::value(JobStatus::Completed.to_string()),
            )
            .col_expr(
                job_entity::Column::ProductsFound,
                Expr::value(products_found),
            )
            .col_expr(
                job_entity::Column::ProductsUpdated,
                Expr::value(products_updated),
            )
            .col_expr(job_entity::Column::CompletedAt, Expr::value(Some(now)))
            .col_expr(job_entity::Column::UpdatedAt, Expr::value(now))
            .filter(job_entity::Column::Id.eq(id))
            .filter(job_entity::Column::Status.eq(JobStatus::Processing.to_string()))
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected > 0)
    }

    async fn mark_failed(&self, id: Uuid, error: &str) -> Result<bool, RepositoryError> {
        let now: DateTime<FixedOffset> = Utc::now().into();
        // Terminal rows are never overwritten, the staleness sweep can
        // race a poller that already converged this job
        let result = job_entity::Entity::update_many()
            .col_expr(
                job_entity::Column::Status,
                Expr::value(JobStatus::Failed.to_string()),
            )
            .col_expr(
                job_entity::Column::ErrorMessage,
                Expr::value(Some(error.to_string())),
            )
            .col_expr(job_entity::Column::CompletedAt, Expr::value(Some(now)))
            .col_expr(job_entity::Column::UpdatedAt, Expr::value(now))
            .filter(job_entity::Column::Id.eq(id))
            .filter(job_entity::Column::Status.is_in([
                JobStatus::Running.to_string(),
                JobStatus::Processing.to_string(),
            ]))
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected > 0)
    }
}

#[cfg(test)]
#[path = "scrape_job_repo_impl_test.rs"]
mod tests;
