// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 商品变更记录
///
/// 不可变审计行，只由变更检测引擎创建，创建后不再更新。
/// updated 类型的变更每个字段一行；new/removed 每个商品一行，
/// field_changed 为空。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductChangeRecord {
    /// 记录唯一标识符
    pub id: Uuid,
    /// 所属店铺ID
    pub store_id: Uuid,
    /// 商品自然键
    pub hash_id: String,
    /// 变更类型
    pub change_type: ChangeType,
    /// 变更字段名，new/removed 为空
    pub field_changed: Option<String>,
    /// 旧值（字符串化，便于审计展示）
    pub old_value: Option<String>,
    /// 新值（字符串化）
    pub new_value: Option<String>,
    /// 商品标题，冗余存储便于展示
    pub product_title: Option<String>,
    /// 商品主图
    pub product_image: Option<String>,
    /// 检测时间
    pub detected_at: DateTime<FixedOffset>,
}

/// 变更类型枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    /// 新上架的商品
    New,
    /// 跟踪字段发生变化的商品
    Updated,
    /// 从快照中消失的商品
    Removed,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ChangeType::New => write!(f, "new"),
            ChangeType::Updated => write!(f, "updated"),
            ChangeType::Removed => write!(f, "removed"),
        }
    }
}

impl FromStr for ChangeType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(ChangeType::New),
            "updated" => Ok(ChangeType::Updated),
            "removed" => Ok(ChangeType::Removed),
            _ => Err(()),
        }
    }
}

/// 变更汇总
///
/// 一次快照对比的计数结果。updated 统计的是有至少一个
/// 跟踪字段变化的商品数（去重），不是字段级记录数；
/// total_changes 才是产生的记录总数。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSummary {
    /// 新增商品数
    pub new: u32,
    /// 有字段变化的商品数（按商品去重）
    pub updated: u32,
    /// 移除商品数
    pub removed: u32,
    /// 产生的变更记录总数
    pub total_changes: u32,
}

impl ChangeSummary {
    /// 空汇总，首次抓取时返回
    pub fn zero() -> Self {
        Self::default()
    }
}

impl ProductChangeRecord {
    /// 创建一条变更记录
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        store_id: Uuid,
        hash_id: String,
        change_type: ChangeType,
        field_changed: Option<String>,
        old_value: Option<String>,
        new_value: Option<String>,
        product_title: Option<String>,
        product_image: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            store_id,
            hash_id,
            change_type,
            field_changed,
            old_value,
            new_value,
            product_title,
            product_image,
            detected_at: Utc::now().into(),
        }
    }
}
