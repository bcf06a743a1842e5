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

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::models::product::NormalizedProduct;
use crate::domain::models::product_change::{ChangeSummary, ChangeType, ProductChangeRecord};
use crate::domain::repositories::product_change_repository::ProductChangeRepository;
use crate::domain::repositories::product_repository::ProductRepository;
use crate::domain::repositories::scrape_job_repository::RepositoryError;

/// 参与对比的跟踪字段
const TRACKED_FIELDS: [&str; 4] = [
    "price",
    "in_stock",
    "discount_percentage",
    "original_price",
];

/// 变更检测引擎
///
/// 对比店铺的当前活跃快照和新抓取结果，产生审计记录并
/// 软移除消失的商品。必须在新快照落库之前运行，否则旧值
/// 已被覆盖，无从对比。
pub struct ChangeDetector<P, C> {
    product_repo: Arc<P>,
    change_repo: Arc<C>,
    insert_batch_size: usize,
}

impl<P, C> ChangeDetector<P, C>
where
    P: ProductRepository,
    C: ProductChangeRepository,
{
    pub fn new(product_repo: Arc<P>, change_repo: Arc<C>, insert_batch_size: usize) -> Self {
        Self {
            product_repo,
            change_repo,
            insert_batch_size: insert_batch_size.max(1),
        }
    }

    /// 对比并落审计记录，返回变更汇总
    ///
    /// 旧快照为空视为首次抓取：不产生任何记录，返回零汇总。
    /// updated 计数按商品去重，total_changes 是记录总数。
    /// 审计记录写入失败只记日志，不中断抓取收敛。
    pub async fn detect_and_record(
        &self,
        store_id: Uuid,
        incoming: &[NormalizedProduct],
    ) -> Result<ChangeSummary, RepositoryError> {
        let prior = self.product_repo.find_active_by_store(store_id).await?;
        if prior.is_empty() {
            debug!(%store_id, "no prior snapshot, skipping change detection");
            return Ok(ChangeSummary::zero());
        }

        let prior_by_hash: HashMap<&str, &NormalizedProduct> =
            prior.iter().map(|p| (p.hash_id.as_str(), p)).collect();
        let incoming_hashes: HashSet<&str> =
            incoming.iter().map(|p| p.hash_id.as_str()).collect();

        let mut records: Vec<ProductChangeRecord> = Vec::new();
        let mut summary = ChangeSummary::zero();

        for product in incoming {
            match prior_by_hash.get(product.hash_id.as_str()) {
                None => {
                    summary.new += 1;
                    records.push(ProductChangeRecord::new(
                        store_id,
                        product.hash_id.clone(),
                        ChangeType::New,
                        None,
                        None,
                        None,
                        Some(product.title.clone()),
                        product.image_url.clone(),
                    ));
                }
                Some(old) => {
                    let field_changes = diff_tracked_fields(old, product);
                    if !field_changes.is_empty() {
                        summary.updated += 1;
                        for (field, old_value, new_value) in field_changes {
                            records.push(ProductChangeRecord::new(
                                store_id,
                                product.hash_id.clone(),
                                ChangeType::Updated,
                                Some(field.to_string()),
                                old_value,
                                new_value,
                                Some(product.title.clone()),
                                product.image_url.clone(),
                            ));
                        }
                    }
                }
            }
        }

        let mut removed_hashes: Vec<String> = Vec::new();
        for old in &prior {
            if !incoming_hashes.contains(old.hash_id.as_str()) {
                summary.removed += 1;
                removed_hashes.push(old.hash_id.clone());
                records.push(ProductChangeRecord::new(
                    store_id,
                    old.hash_id.clone(),
                    ChangeType::Removed,
                    None,
                    None,
                    None,
                    Some(old.title.clone()),
                    old.image_url.clone(),
                ));
            }
        }

        if !removed_hashes.is_empty() {
            let marked = self
                .product_repo
                .mark_removed(store_id, &removed_hashes)
                .await?;
            debug!(%store_id, marked, "soft-removed vanished products");
        }

        summary.total_changes = records.len() as u32;

        for chunk in records.chunks(self.insert_batch_size) {
            if let Err(err) = self.change_repo.insert_batch(chunk).await {
                warn!(%store_id, error = %err, "failed to persist a change record batch");
            }
        }

        Ok(summary)
    }
}

/// 对比两个版本的跟踪字段，返回 (字段, 旧值, 新值)
///
/// 数值和布尔都折叠成规范字符串再比较，None 折叠为空缺，
/// 避免 10.0 与 10 这类表示差异产生假变更。
fn diff_tracked_fields<'a>(
    old: &NormalizedProduct,
    new: &NormalizedProduct,
) -> Vec<(&'a str, Option<String>, Option<String>)> {
    let mut changes = Vec::new();
    for field in TRACKED_FIELDS {
        let old_value = tracked_value(old, field);
        let new_value = tracked_value(new, field);
        if old_value != new_value {
            changes.push((field, old_value, new_value));
        }
    }
    changes
}

fn tracked_value(product: &NormalizedProduct, field: &str) -> Option<String> {
    match field {
        "price" => Some(fmt_number(product.price)),
        "in_stock" => Some(product.in_stock.to_string()),
        "discount_percentage" => product.discount_percentage.map(fmt_number),
        "original_price" => product.original_price.map(fmt_number),
        _ => None,
    }
}

/// 规范数值表示：整数值不带小数尾巴
fn fmt_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
