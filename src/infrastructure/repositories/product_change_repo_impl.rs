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

use crate::domain::models::product_change::ProductChangeRecord;
use crate::domain::repositories::product_change_repository::ProductChangeRepository;
use crate::domain::repositories::scrape_job_repository::RepositoryError;
use crate::infrastructure::database::entities::product_change as change_entity;
use async_trait::async_trait;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// 商品变更记录仓库实现
///
/// 基于SeaORM实现的变更审计数据访问层，只有插入和查询
#[derive(Clone)]
pub struct ProductChangeRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl ProductChangeRepositoryImpl {
    /// 创建新的变更记录仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }
}

impl From<change_entity::Model> for ProductChangeRecord {
    fn from(model: change_entity::Model) -> Self {
        Self {
            id: model.id,
            store_id: model.store_id,
            hash_id: model.hash_id,
            change_type: model
                .change_type
                .parse()
                .unwrap_or(crate::domain::models::product_change::ChangeType::Updated),
            field_changed: model.field_changed,
            old_value: model.old_value,
            new_value: model.new_value,
            product_title: model.product_title,
            product_image: model.product_image,
            detected_at: model.detected_at,
        }
    }
}

impl From<&ProductChangeRecord> for change_entity::ActiveModel {
    fn from(record: &ProductChangeRecord) -> Self {
        Self {
            id: Set(record.id),
            store_id: Set(record.store_id),
            hash_id: Set(record.hash_id.clone()),
            change_type: Set(record.change_type.to_string()),
            field_changed: Set(record.field_changed.clone()),
            old_value: Set(record.old_value.clone()),
            new_value: Set(record.new_value.clone()),
            product_title: Set(record.product_title.clone()),
            product_image: Set(record.product_image.clone()),
            detected_at: Set(record.detected_at),
        }
    }
}

#[async_trait]
impl ProductChangeRepository for ProductChangeRepositoryImpl {
    async fn insert_batch(&self, records: &[ProductChangeRecord]) -> Result<(), RepositoryError> {
        if records.is_empty() {
            return Ok(());
        }

        let models: Vec<change_entity::ActiveModel> = records.iter().map(Into::into).collect();

        change_entity::Entity::insert_many(models)
            .exec(self.db.as_ref())
            .await?;

        Ok(())
    }

    async fn find_recent_by_store(
        &self,
        store_id: Uuid,
        limit: u64,
    ) -> Result<Vec<ProductChangeRecord>, RepositoryError> {
        let models = change_entity::Entity::find()
            .filter(change_entity::Column::StoreId.eq(store_id))
            .order_by_desc(change_entity::Column::DetectedAt)
            .limit(limit)
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }
}
