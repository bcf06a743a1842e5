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

use crate::domain::models::store::Store;
use crate::domain::repositories::scrape_job_repository::RepositoryError;
use crate::domain::repositories::store_repository::StoreRepository;
use crate::infrastructure::database::entities::store as store_entity;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter,
    Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// 店铺仓库实现
///
/// 基于SeaORM实现的店铺数据访问层
#[derive(Clone)]
pub struct StoreRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl StoreRepositoryImpl {
    /// 创建新的店铺仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<store_entity::Model> for Store {
    fn from(model: store_entity::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            base_url: model.base_url,
            platform: model.platform.parse().unwrap_or_default(),
            status: model.status.parse().unwrap_or_default(),
            product_count: model.product_count,
            last_scraped_at: model.last_scraped_at,
            deleted: model.deleted,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

impl From<Store> for store_entity::ActiveModel {
    fn from(store: Store) -> Self {
        Self {
            id: Set(store.id),
            name: Set(store.name),
            base_url: Set(store.base_url),
            platform: Set(store.platform.to_string()),
            status: Set(store.status.to_string()),
            product_count: Set(store.product_count),
            last_scraped_at: Set(store.last_scraped_at),
            deleted: Set(store.deleted),
            created_at: Set(store.created_at),
            updated_at: Set(store.updated_at),
        }
    }
}

#[async_trait]
impl StoreRepository for StoreRepositoryImpl {
    async fn create(&self, store: &Store) -> Result<Store, RepositoryError> {
        let model: store_entity::ActiveModel = store.clone().into();

        model.insert(self.db.as_ref()).await?;
        Ok(store.clone())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Store>, RepositoryError> {
        let model = store_entity::Entity::find_by_id(id)
            .one(self.db.as_ref())
            .await?;

        Ok(model.map(Into::into))
    }

    async fn update_scrape_stats(
        &self,
        id: Uuid,
        product_count: i32,
        last_scraped_at: DateTime<FixedOffset>,
    ) -> Result<(), RepositoryError> {
        let result = store_entity::Entity::update_many()
            .col_expr(
                store_entity::Column::ProductCount,
                Expr::value(product_count),
            )
            .col_expr(
                store_entity::Column::LastScrapedAt,
                Expr::value(Some(last_scraped_at)),
            )
            .col_expr(
                store_entity::Column::UpdatedAt,
                Expr::value(DateTime::<FixedOffset>::from(Utc::now())),
            )
            .filter(store_entity::Column::Id.eq(id))
            .exec(self.db.as_ref())
            .await?;

        if result.rows_affected == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
