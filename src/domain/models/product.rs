// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// 规范化商品
///
/// 三种提供方格式收敛后的统一商品形态。hash_id 是商品的
/// 稳定自然键：同一商品在多次抓取之间保持不变，是快照
/// 对比和幂等写入的关键。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedProduct {
    /// 所属店铺ID
    pub store_id: Uuid,
    /// 稳定内容哈希/自然键
    pub hash_id: String,
    /// 商品标题
    pub title: String,
    /// 商品slug，多语言店铺去重的依据
    pub handle: Option<String>,
    /// SKU
    pub sku: Option<String>,
    /// 品牌
    pub brand: Option<String>,
    /// 描述
    pub description: Option<String>,
    /// 当前售价（主货币单位）
    pub price: f64,
    /// 原价，仅在打折时存在
    pub original_price: Option<f64>,
    /// 折扣百分比，由价格派生
    pub discount_percentage: Option<f64>,
    /// 货币代码
    pub currency: Option<String>,
    /// 是否有库存
    pub in_stock: bool,
    /// 主图URL
    pub image_url: Option<String>,
    /// 商品页URL
    pub product_url: Option<String>,
    /// 变体（原始结构，不做解析）
    pub variants: Option<serde_json::Value>,
    /// 媒体（原始结构）
    pub media: Option<serde_json::Value>,
    /// 选项（原始结构）
    pub options: Option<serde_json::Value>,
    /// 来源零售商
    pub source_retailer: Option<String>,
    /// 来源语言
    pub source_language: Option<String>,
    /// 来源创建时间（ISO-8601）
    pub source_created_at: Option<String>,
    /// 来源更新时间（ISO-8601）
    pub source_updated_at: Option<String>,
    /// 商品状态
    pub status: ProductStatus,
}

/// 商品状态枚举
///
/// 移除是软移除：行保留，状态置为 Removed，
/// 快照对比不依赖行缺失。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    /// 当前快照中的活跃商品
    #[default]
    Active,
    /// 已从店铺下架，行保留
    Removed,
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ProductStatus::Active => write!(f, "active"),
            ProductStatus::Removed => write!(f, "removed"),
        }
    }
}

impl FromStr for ProductStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ProductStatus::Active),
            "removed" => Ok(ProductStatus::Removed),
            _ => Err(()),
        }
    }
}

impl NormalizedProduct {
    /// 创建一个只有必填字段的空白商品
    pub fn empty(store_id: Uuid, hash_id: String) -> Self {
        Self {
            store_id,
            hash_id,
            title: String::new(),
            handle: None,
            sku: None,
            brand: None,
            description: None,
            price: 0.0,
            original_price: None,
            discount_percentage: None,
            currency: None,
            in_stock: true,
            image_url: None,
            product_url: None,
            variants: None,
            media: None,
            options: None,
            source_retailer: None,
            source_language: None,
            source_created_at: None,
            source_updated_at: None,
            status: ProductStatus::Active,
        }
    }
}
