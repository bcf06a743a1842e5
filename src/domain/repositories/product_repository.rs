// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::domain::models::product::NormalizedProduct;
use crate::domain::repositories::scrape_job_repository::RepositoryError;
use async_trait::async_trait;
use uuid::Uuid;

/// 商品仓库特质
///
/// 快照的读写接口。写入以 (store_id, hash_id) 为冲突键做
/// 幂等 upsert，且不覆盖策展标记（published/featured/on_slider）。
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// 加载店铺当前活跃快照
    async fn find_active_by_store(
        &self,
        store_id: Uuid,
    ) -> Result<Vec<NormalizedProduct>, RepositoryError>;
    /// 批量幂等写入一组商品，返回写入行数
    async fn upsert_batch(&self, products: &[NormalizedProduct]) -> Result<u64, RepositoryError>;
    /// 单行幂等写入，批量失败后的逐行兜底
    async fn upsert_one(&self, product: &NormalizedProduct) -> Result<(), RepositoryError>;
    /// 将一组商品软移除（状态置为 removed，行保留）
    async fn mark_removed(
        &self,
        store_id: Uuid,
        hash_ids: &[String],
    ) -> Result<u64, RepositoryError>;
}
