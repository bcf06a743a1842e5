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

use crate::domain::models::product::{NormalizedProduct, ProductStatus};
use crate::domain::repositories::product_repository::ProductRepository;
use crate::domain::repositories::scrape_job_repository::RepositoryError;
use crate::infrastructure::database::entities::product as product_entity;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::{
    sea_query::{Expr, OnConflict},
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use std::sync::Arc;
use uuid::Uuid;

/// 商品仓库实现
///
/// 基于SeaORM实现的商品数据访问层。写入以 (store_id, hash_id)
/// 为冲突键，冲突时更新快照字段但保留策展标记和创建时间。
#[derive(Clone)]
pub struct ProductRepositoryImpl {
    /// 数据库连接
    db: Arc<DatabaseConnection>,
}

impl ProductRepositoryImpl {
    /// 创建新的商品仓库实例
    ///
    /// # 参数
    ///
    /// * `db` - 数据库连接
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// 冲突时更新的快照字段，策展标记（published/featured/
    /// on_slider）和 created_at 刻意排除在外
    fn upsert_conflict() -> OnConflict {
        OnConflict::columns([
            product_entity::Column::StoreId,
            product_entity::Column::HashId,
        ])
        .update_columns([
            product_entity::Column::Title,
            product_entity::Column::Handle,
            product_entity::Column::Sku,
            product_entity::Column::Brand,
            product_entity::Column::Description,
            product_entity::Column::Price,
            product_entity::Column::OriginalPrice,
            product_entity::Column::DiscountPercentage,
            product_entity::Column::Currency,
            product_entity::Column::InStock,
            product_entity::Column::ImageUrl,
            product_entity::Column::ProductUrl,
            product_entity::Column::Variants,
            product_entity::Column::Media,
            product_entity::Column::Options,
            product_entity::Column::SourceRetailer,
            product_entity::Column::SourceLanguage,
            product_entity::Column::SourceCreatedAt,
            product_entity::Column::SourceUpdatedAt,
            product_entity::Column::Status,
            product_entity::Column::UpdatedAt,
        ])
        .to_owned()
    }
}

impl From<product_entity::Model> for NormalizedProduct {
    fn from(model: product_entity::Model) -> Self {
        Self {
            store_id: model.store_id,
            hash_id: model.hash_id,
            title: model.title,
            handle: model.handle,
            sku: model.sku,
            brand: model.brand,
            description: model.description,
            price: model.price,
            original_price: model.original_price,
            discount_percentage: model.discount_percentage,
            currency: model.currency,
            in_stock: model.in_stock,
            image_url: model.image_url,
            product_url: model.product_url,
            variants: model.variants,
            media: model.media,
            options: model.options,
            source_retailer: model.source_retailer,
            source_language: model.source_language,
            source_created_at: model.source_created_at,
            source_updated_at: model.source_updated_at,
            status: model.status.parse().unwrap_or_default(),
        }
    }
}

impl From<&NormalizedProduct> for product_entity::ActiveModel {
    fn from(product: &NormalizedProduct) -> Self {
        let now: DateTime<FixedOffset> = Utc::now().into();
        Self {
            id: Set(Uuid::new_v4()),
            store_id: Set(product.store_id),
            hash_id: Set(product.hash_id.clone()),
            title: Set(product.title.clone()),
            handle: Set(product.handle.clone()),
            sku: Set(product.sku.clone()),
            brand: Set(product.brand.clone()),
            description: Set(product.description.clone()),
            price: Set(product.price),
            original_price: Set(product.original_price),
            discount_percentage: Set(product.discount_percentage),
            currency: Set(product.currency.clone()),
            in_stock: Set(product.in_stock),
            image_url: Set(product.image_url.clone()),
            product_url: Set(product.product_url.clone()),
            variants: Set(product.variants.clone()),
            media: Set(product.media.clone()),
            options: Set(product.options.clone()),
            source_retailer: Set(product.source_retailer.clone()),
            source_language: Set(product.source_language.clone()),
            source_created_at: Set(product.source_created_at.clone()),
            source_updated_at: Set(product.source_updated_at.clone()),
            status: Set(product.status.to_string()),
            published: Set(true),
            featured: Set(false),
            on_slider: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        }
    }
}

#[async_trait]
impl ProductRepository for ProductRepositoryImpl {
    async fn find_active_by_store(
        &self,
        store_id: Uuid,
    ) -> Result<Vec<NormalizedProduct>, RepositoryError> {
        let models = product_entity::Entity::find()
            .filter(product_entity::Column::StoreId.eq(store_id))
            .filter(product_entity::Column::Status.eq(ProductStatus::Active.to_string()))
            .all(self.db.as_ref())
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn upsert_batch(&self, products: &[NormalizedProduct]) -> Result<u64, RepositoryError> {
        if products.is_empty() {
            return Ok(0);
        }

        let models: Vec<product_entity::ActiveModel> =
            products.iter().map(Into::into).collect();

        product_entity::Entity::insert_many(models)
            .on_conflict(Self::upsert_conflict())
            .exec(self.db.as_ref())
            .await?;

        Ok(products.len() as u64)
    }

    async fn upsert_one(&self, product: &NormalizedProduct) -> Result<(), RepositoryError> {
        let model: product_entity::ActiveModel = product.into();

        product_entity::Entity::insert(model)
            .on_conflict(Self::upsert_conflict())
            .exec(self.db.as_ref())
            .await?;

        Ok(())
    }

    async fn mark_removed(
        &self,
        store_id: Uuid,
        hash_ids: &[String],
    ) -> Result<u64, RepositoryError> {
        if hash_ids.is_empty() {
            return Ok(0);
        }

        let result = product_entity::Entity::update_many()
            .col_expr(
                product_entity::Column::Status,
                Expr::value(ProductStatus::Removed.to_string()),
            )
            .col_expr(
                product_entity::Column::UpdatedAt,
                Expr::value(DateTime::<FixedOffset>::from(Utc::now())),
            )
            .filter(product_entity::Column::StoreId.eq(store_id))
            .filter(product_entity::Column::HashId.is_in(hash_ids.to_vec()))
            .exec(self.db.as_ref())
            .await?;

        Ok(result.rows_affected)
    }
}
