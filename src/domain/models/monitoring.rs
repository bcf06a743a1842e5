// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, Duration, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 监控配置
///
/// 每个店铺一条的调度记录。next_check_at 只由监控调度器
/// 在触发时刻重算，从不推断，卡住的任务不会冻结调度。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    /// 配置唯一标识符
    pub id: Uuid,
    /// 所属店铺ID
    pub store_id: Uuid,
    /// 是否启用
    pub enabled: bool,
    /// 检查间隔（小时）
    pub check_interval_hours: i32,
    /// 上次检查时间
    pub last_check_at: Option<DateTime<FixedOffset>>,
    /// 下次检查时间
    pub next_check_at: Option<DateTime<FixedOffset>>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
}

impl MonitoringConfig {
    /// 创建一个新的监控配置，立即到期
    pub fn new(store_id: Uuid, check_interval_hours: i32) -> Self {
        Self {
            id: Uuid::new_v4(),
            store_id,
            enabled: true,
            check_interval_hours,
            last_check_at: None,
            next_check_at: Some(Utc::now().into()),
            updated_at: Utc::now().into(),
        }
    }

    /// 计算下一次检查时间
    ///
    /// 在触发时刻调用，加入抖动避免批量店铺同时到期。
    pub fn next_check_from(&self, now: DateTime<Utc>, jitter: Duration) -> DateTime<FixedOffset> {
        (now + Duration::hours(self.check_interval_hours as i64) + jitter).fixed_offset()
    }
}

/// 监控日志
///
/// 包裹一次监控触发的抓取：任务开始前创建，任务收敛时
/// 补全。任务悬挂时日志可能暂时遗留在 Running 状态，
/// 由陈旧清扫兜底收敛。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringLog {
    /// 日志唯一标识符
    pub id: Uuid,
    /// 所属店铺ID
    pub store_id: Uuid,
    /// 日志状态
    pub status: MonitoringStatus,
    /// 新增商品数
    pub new_products: i32,
    /// 更新商品数
    pub updated_products: i32,
    /// 移除商品数
    pub removed_products: i32,
    /// 失败原因
    pub error_message: Option<String>,
    /// 开始时间
    pub started_at: DateTime<FixedOffset>,
    /// 完成时间
    pub completed_at: Option<DateTime<FixedOffset>>,
}

/// 监控日志状态枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MonitoringStatus {
    /// 抓取进行中
    #[default]
    Running,
    /// 抓取成功完成
    Completed,
    /// 抓取失败
    Failed,
}

impl fmt::Display for MonitoringStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MonitoringStatus::Running => write!(f, "running"),
            MonitoringStatus::Completed => write!(f, "completed"),
            MonitoringStatus::Failed => write!(f, "failed"),
        }
    }
}

impl FromStr for MonitoringStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "running" => Ok(MonitoringStatus::Running),
            "completed" => Ok(MonitoringStatus::Completed),
            "failed" => Ok(MonitoringStatus::Failed),
            _ => Err(()),
        }
    }
}

impl MonitoringLog {
    /// 创建一条运行中的监控日志
    pub fn new(store_id: Uuid) -> Self {
        Self {
            id: Uuid::new_v4(),
            store_id,
            status: MonitoringStatus::Running,
            new_products: 0,
            updated_products: 0,
            removed_products: 0,
            error_message: None,
            started_at: Utc::now().into(),
            completed_at: None,
        }
    }
}
