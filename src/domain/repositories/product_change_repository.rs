// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::product_change::ProductChangeRecord;
use crate::domain::repositories::scrape_job_repository::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 商品变更记录仓库特质
///
/// 审计表是追加写入的，从不更新。
#[async_trait]
pub trait ProductChangeRepository: Send + Sync {
    /// 批量插入一组变更记录
    async fn insert_batch(&self, records: &[ProductChangeRecord]) -> Result<(), RepositoryError>;
    /// 查找店铺最近的变更记录
    async fn find_recent_by_store(
        &self,
        store_id: Uuid,
        limit: u64,
    ) -> Result<Vec<ProductChangeRecord>, RepositoryError>;
}
