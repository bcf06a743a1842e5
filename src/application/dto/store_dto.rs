// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::models::store::{Store, StorePlatform};

/// 创建店铺请求数据传输对象
#[derive(Debug, Deserialize, Serialize)]
pub struct CreateStoreRequestDto {
    /// 店铺名称
    pub name: String,
    /// 店铺基础URL
    pub base_url: String,
    /// 店铺平台类型
    #[serde(default)]
    pub platform: StorePlatform,
}

/// 店铺响应数据传输对象
#[derive(Debug, Deserialize, Serialize)]
pub struct StoreResponseDto {
    /// 店铺唯一标识符
    pub id: Uuid,
    /// 店铺名称
    pub name: String,
    /// 店铺基础URL
    pub base_url: String,
    /// 店铺平台类型
    pub platform: StorePlatform,
    /// 当前快照中的商品数量
    pub product_count: i32,
    /// 最后一次抓取完成时间
    pub last_scraped_at: Option<DateTime<FixedOffset>>,
}

impl From<Store> for StoreResponseDto {
    fn from(store: Store) -> Self {
        Self {
            id: store.id,
            name: store.name,
            base_url: store.base_url,
            platform: store.platform,
            product_count: store.product_count,
            last_scraped_at: store.last_scraped_at,
        }
    }
}
