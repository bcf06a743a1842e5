// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::product_change::{ChangeType, ProductChangeRecord};
use crate::domain::models::scrape_job::{JobStatus, ScrapeJob, ScraperType};

/// 抓取任务响应数据传输对象
#[derive(Debug, Deserialize, Serialize)]
pub struct ScrapeJobResponseDto {
    /// 任务唯一标识符
    pub id: Uuid,
    /// 所属店铺ID
    pub store_id: Uuid,
    /// 任务状态
    pub status: JobStatus,
    /// 使用的抓取器类型
    pub scraper_type: ScraperType,
    /// 外部提供方的运行ID
    pub run_id: Option<String>,
    /// 本次抓取发现的商品数量
    pub products_found: i32,
    /// 成功写入的商品行数
    pub products_updated: i32,
    /// 失败原因
    pub error_message: Option<String>,
    /// 开始时间
    pub started_at: DateTime<FixedOffset>,
    /// 完成时间
    pub completed_at: Option<DateTime<FixedOffset>>,
}

impl From<ScrapeJob> for ScrapeJobResponseDto {
    fn from(job: ScrapeJob) -> Self {
        Self {
            id: job.id,
            store_id: job.store_id,
            status: job.status,
            scraper_type: job.scraper_type,
            run_id: job.run_id,
            products_found: job.products_found,
            products_updated: job.products_updated,
            error_message: job.error_message,
            started_at: job.started_at,
            completed_at: job.completed_at,
        }
    }
}

/// 商品变更记录响应数据传输对象
#[derive(Debug, Deserialize, Serialize)]
pub struct ProductChangeDto {
    /// 商品自然键
    pub hash_id: String,
    /// 变更类型
    pub change_type: ChangeType,
    /// 变更字段名
    pub field_changed: Option<String>,
    /// 旧值
    pub old_value: Option<String>,
    /// 新值
    pub new_value: Option<String>,
    /// 商品标题
    pub product_title: Option<String>,
    /// 检测时间
    pub detected_at: DateTime<FixedOffset>,
}

impl From<ProductChangeRecord> for ProductChangeDto {
    fn from(record: ProductChangeRecord) -> Self {
        Self {
            hash_id: record.hash_id,
            change_type: record.change_type,
            field_changed: record.field_changed,
            old_value: record.old_value,
            new_value: record.new_value,
            product_title: record.product_title,
            detected_at: record.detected_at,
        }
    }
}
