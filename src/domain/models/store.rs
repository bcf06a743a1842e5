// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 店铺实体
///
/// 表示一个被监控的外部店铺。店铺在注册时创建，
/// 删除时只做软删除（deleted 标记），抓取完成时
/// 更新商品数量和最后抓取时间。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    /// 店铺唯一标识符
    pub id: Uuid,
    /// 店铺名称
    pub name: String,
    /// 店铺基础URL
    pub base_url: String,
    /// 店铺平台类型
    pub platform: StorePlatform,
    /// 店铺状态
    pub status: StoreStatus,
    /// 当前快照中的商品数量
    pub product_count: i32,
    /// 最后一次抓取完成时间
    pub last_scraped_at: Option<DateTime<FixedOffset>>,
    /// 软删除标记，店铺从不物理删除
    pub deleted: bool,
    /// 创建时间
    pub created_at: DateTime<FixedOffset>,
    /// 更新时间
    pub updated_at: DateTime<FixedOffset>,
}

/// 店铺平台枚举
///
/// 决定抓取任务使用哪种商品格式映射器。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StorePlatform {
    /// Shopify 类店铺，走主抓取格式
    #[default]
    Shopify,
    /// WooCommerce 插件店铺，走平台专用格式
    Woocommerce,
    /// 自定义店铺
    Custom,
}

impl StorePlatform {
    /// 判断该平台是否走平台专用（插件API）映射器
    pub fn is_plugin_platform(&self) -> bool {
        matches!(self, StorePlatform::Woocommerce)
    }
}

impl fmt::Display for StorePlatform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StorePlatform::Shopify => write!(f, "shopify"),
            StorePlatform::Woocommerce => write!(f, "woocommerce"),
            StorePlatform::Custom => write!(f, "custom"),
        }
    }
}

impl FromStr for StorePlatform {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "shopify" => Ok(StorePlatform::Shopify),
            "woocommerce" => Ok(StorePlatform::Woocommerce),
            "custom" => Ok(StorePlatform::Custom),
            _ => Err(()),
        }
    }
}

/// 店铺状态枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StoreStatus {
    /// 活跃中，参与监控调度
    #[default]
    Active,
    /// 已暂停，监控配置会被关闭
    Paused,
}

impl fmt::Display for StoreStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            StoreStatus::Active => write!(f, "active"),
            StoreStatus::Paused => write!(f, "paused"),
        }
    }
}

impl FromStr for StoreStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(StoreStatus::Active),
            "paused" => Ok(StoreStatus::Paused),
            _ => Err(()),
        }
    }
}

impl Store {
    /// 创建一个新的店铺
    pub fn new(name: String, base_url: String, platform: StorePlatform) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            base_url,
            platform,
            status: StoreStatus::Active,
            product_count: 0,
            last_scraped_at: None,
            deleted: false,
            created_at: Utc::now().into(),
            updated_at: Utc::now().into(),
        }
    }

    /// 判断店铺是否可被监控调度选中
    pub fn is_monitorable(&self) -> bool {
        self.status == StoreStatus::Active && !self.deleted
    }
}
