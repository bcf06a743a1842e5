// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::store::Store;
use crate::domain::repositories::scrape_job_repository::RepositoryError;
use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use uuid::Uuid;

/// 店铺仓库特质
#[async_trait]
pub trait StoreRepository: Send + Sync {
    /// 创建新店铺
    async fn create(&self, store: &Store) -> Result<Store, RepositoryError>;
    /// 根据ID查找店铺
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Store>, RepositoryError>;
    /// 抓取完成后更新店铺聚合字段
    async fn update_scrape_stats(
        &self,
        id: Uuid,
        product_count: i32,
        last_scraped_at: DateTime<FixedOffset>,
    ) -> Result<(), RepositoryError>;
}
