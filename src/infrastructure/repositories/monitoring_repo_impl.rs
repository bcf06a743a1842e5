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

use crate::domain::models::monitoring::{MonitoringConfig, MonitoringLog, MonitoringStatus};
use crate::domain::repositories::monitoring_repository::MonitoringRepository;
use crate::domain::repositories::scrape_job_repository::RepositoryError;
use crate::infrastructure::database::entities::monitoring_config as config_entity;
use crate::infrastructure::database::entities::monitoring_log as log_entity;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// 监控仓库实现
///
/// 基于SeaORM实现的监控配置和监控日志数据访问层
#[derive(Clone)]
pub struct MonitoringRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl MonitoringRepositoryImpl {
    /// 创建新的监控仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<config_entity::Model> for MonitoringConfig {
    fn from(model: config_entity::Model) -> Self {
        Self {
            id: model.id,
            store_id: model.store_id,
            enabled: model.enabled,
            check_interval_hours: model.check_interval_hours,
            last_check_at: model.last_check_at,
            next_check_at: model.next_check_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<log_entity::Model> for MonitoringLog {
    fn from(model: log_entity::Model) -> Self {
        Self {
            id: model.id,
            store_id: model.store_id,
            status: model.status.parse().unwrap_or_default(),
            new_products: model.new_products,
            updated_products: model.updated_products,
            removed_products: model.removed_products,
            error_message: model.error_message,
            started_at: model.started_at,
            completed_at: model.completed_at,
        }
    }
}

impl From<&MonitoringLog> for log_entity::ActiveModel {
    fn from(log: &MonitoringLog) -> Self {
        Self {
            id: Set(log.id),
            store_id: Set(log.store_id),
            status: Set(log.status.to_string()),
            new_products: Set(log.new_products),
            updated_products: Set(log.updated_products),
            removed_products: Set(log.removed_products),
            error_message: Set(log.error_message.clone()),
            started_at: Set(log.started_at),
            completed_at: Set(log.completed_at),
        }
    }
}

impl From<&MonitoringConfig> for config_entity::ActiveModel {
    fn from(config: &MonitoringConfig) -> Self {
        Self {
            id: Set(config.id),
            store_id: Set(config.store_id),
            enabled: Set(config.enabled),
            check_interval_hours: Set(config.check_interval_hours),
            last_check_at: Set(config.last_check_at),
            next_check_at: Set(config.next_check_at),
            updated_at: Set(config.updated_at),
        }
    }
}

#[async_trait]
impl MonitoringRepository for MonitoringRepositoryImpl {
    async fn create_config(
        &self,
        config: &MonitoringConfig,
    ) -> Result<MonitoringConfig, RepositoryError> {
        let model: config_entity::ActiveModel = config.into();

        model.insert(self.db.as_ref()).await?;
        Ok(config.clone())
    }

    async fn find_due_configs(
        &self,
        now: DateTime<Utc>,
        limit: u64,
    ) -> Result<Vec<MonitoringConfig>, RepositoryError> {
        let models = config_entity::Entity::find()
            .filter(config_entity::Column::Enabled.eq(true))
            .filter(
                Condition::any()
                    .add(config_entity::Column::NextCheckAt.is_null())
                    .add(config_entity::Column::NextCheckAt.lte(now)),
            )
            .order_by_asc(config_entity::Column::NextCheckAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn reschedule(
        &self,
        config_id: Uuid,
        last_check_at: DateTime<FixedOffset>,
        next_check_at: DateTime<FixedOffset>,
    ) -> Result<(), RepositoryError> {
        let result = config_entity::Entity::update_many()
            .col_expr(
                config_entity::Column::LastCheckAt,
                Expr::value(Some(last_check_at)),
            )
            .col_expr(
                config_entity::Column::NextCheckAt,
                Expr::value(Some(next_check_at)),
            )
            .col_expr(
                config_entity::Column::UpdatedAt,
                Expr::value(DateTime::<FixedOffset>::from(Utc::now())),
            )
            .filter(config_entity::Column::Id.eq(config_id))
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    async fn disable_for_store(&self, store_id: Uuid) -> Result<(), RepositoryError> {
        config_entity::Entity::update_many()
            .col_expr(config_entity::Column::Enabled, Expr::value(false))
            .col_expr(
                config_entity::Column::UpdatedAt,
                Expr::value(DateTime::<FixedOffset>::from(Utc::now())),
            )
            .filter(config_entity::Column::StoreId.eq(store_id))
            .exec(self.db.as_ref())
            .await?;

        Ok(())
    }

    async fn create_log(&self, log: &MonitoringLog) -> Result<MonitoringLog, RepositoryError> {
        let model: log_entity::ActiveModel = log.into();

        model.insert(self.db.as_ref()).await?;
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
        let result = log_entity::Entity::update_many()
            .col_expr(log_entity::Column::Status, Expr::value(status.to_string()))
            .col_expr(log_entity::Column::NewProducts, Expr::value(new_products))
            .col_expr(
                log_entity::Column::UpdatedProducts,
                Expr::value(updated_products),
            )
            .col_expr(
                log_entity::Column::RemovedProducts,
                Expr::value(removed_products),
            )
            .col_expr(
                log_entity::Column::ErrorMessage,
                Expr::value(error_message.map(str::to_string)),
            )
            .col_expr(
                log_entity::Column::CompletedAt,
                Expr::value(Some(DateTime::<FixedOffset>::from(Utc::now()))),
            )
            .filter(log_entity::Column::Id.eq(log_id))
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
