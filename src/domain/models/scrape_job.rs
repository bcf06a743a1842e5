// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 强制失败原因：任务超过陈旧阈值
pub const STALE_REASON: &str = "STALE";

/// 抓取任务实体
///
/// 表示针对一个店铺的一次快照拉取尝试。任务由任务状态机
/// 独占管理：创建后处于 Running 状态轮询外部运行，认领后
/// 进入 Processing，最终收敛到 Completed 或 Failed。
/// 状态转换遵循以下流程：
/// Running → Processing → Completed/Failed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeJob {
    /// 任务唯一标识符
    pub id: Uuid,
    /// 所属店铺ID
    pub store_id: Uuid,
    /// 任务状态
    pub status: JobStatus,
    /// 使用的抓取器类型，决定商品映射器
    pub scraper_type: ScraperType,
    /// 外部提供方的运行ID，运行被接受前为空
    pub run_id: Option<String>,
    /// 外部提供方的数据集ID
    pub dataset_id: Option<String>,
    /// 是否已切换过备用提供方
    pub fallback_attempted: bool,
    /// 本次抓取发现的商品数量（去重后）
    pub products_found: i32,
    /// 成功写入的商品行数
    pub products_updated: i32,
    /// 失败原因
    pub error_message: Option<String>,
    /// 关联的监控日志ID（监控触发的任务才有）
    pub monitoring_log_id: Option<Uuid>,
    /// 开始时间，陈旧检测的基准
    pub started_at: DateTime<FixedOffset>,
    /// 完成时间
    pub completed_at: Option<DateTime<FixedOffset>>,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
}

/// 任务状态枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// 外部运行已请求，轮询中
    #[default]
    Running,
    /// 数据集已被认领，转换/写入中
    Processing,
    /// 已成功完成
    Completed,
    /// 已失败
    Failed,
}

impl JobStatus {
    /// 判断状态是否为终态
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            JobStatus::Running => write!(f, "running"),
            JobStatus::Processing => write!(f, "processing"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for JobStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(JobStatus::Running),
            "processing" => Ok(JobStatus::Processing),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            _ => Err(()),
        }
    }
}

/// 抓取器类型枚举
///
/// 任务的映射器选择依据：平台任务固定走平台映射器，
/// 已切换备用提供方的任务走备用映射器，其余走主映射器。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScraperType {
    /// 主抓取提供方
    #[default]
    Primary,
    /// 主提供方零结果后切换的备用提供方
    PrimaryFallback,
    /// 平台插件API抓取（如 WooCommerce）
    Platform,
}

impl fmt::Display for ScraperType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ScraperType::Primary => write!(f, "primary"),
            ScraperType::PrimaryFallback => write!(f, "primary_fallback"),
            ScraperType::Platform => write!(f, "platform"),
        }
    }
}

impl FromStr for ScraperType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "primary" => Ok(ScraperType::Primary),
            "primary_fallback" => Ok(ScraperType::PrimaryFallback),
            "platform" => Ok(ScraperType::Platform),
            _ => Err(()),
        }
    }
}

impl ScrapeJob {
    /// 创建一个新的抓取任务（Running 状态，运行ID待填）
    pub fn new(store_id: Uuid, scraper_type: ScraperType, monitoring_log_id: Option<Uuid>) -> Self {
        Self {
            id: Uuid::new_v4(),
            store_id,
            status: JobStatus::Running,
            scraper_type,
            run_id: None,
            dataset_id: None,
            fallback_attempted: false,
            products_found: 0,
            products_updated: 0,
            error_message: None,
            monitoring_log_id,
            started_at: Utc::now().into(),
            completed_at: None,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    /// 判断任务是否已陈旧
    ///
    /// Running 状态下 started_at 早于阈值的任务视为被遗弃，
    /// 无论提供方状态如何都会被强制置为失败。
    pub fn is_stale(&self, now: DateTime<Utc>, stale_after: Duration) -> bool {
        self.status == JobStatus::Running && self.started_at < (now - stale_after).fixed_offset()
    }

    /// 判断任务是否满足备用提供方升级条件
    ///
    /// 主提供方返回零条目、尚未尝试过备用、且不是平台任务时才升级。
    pub fn can_escalate_to_fallback(&self) -> bool {
        !self.fallback_attempted && self.scraper_type != ScraperType::Platform
    }
}
