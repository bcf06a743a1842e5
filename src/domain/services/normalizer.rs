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

use chrono::DateTime;
use once_cell::sync::Lazy;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::models::product::NormalizedProduct;
use crate::domain::models::scrape_job::ScraperType;

/// 映射器类型枚举
///
/// 每种提供方条目格式对应一个映射器，按标签分发而不是
/// 字段探测，保证每种格式可以独立穷举测试。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapperKind {
    /// 主抓取格式：嵌套 source/variants/medias 的富结构
    Primary,
    /// 备用抓取格式：扁平字段，十进制价格
    Fallback,
    /// 平台插件API格式：最小货币单位价格
    Platform,
}

impl MapperKind {
    /// 根据任务的抓取器类型选择映射器
    ///
    /// 平台任务固定走平台映射器；已切换备用提供方的任务
    /// 走备用映射器；其余走主映射器。
    pub fn for_scraper(scraper_type: ScraperType) -> Self {
        match scraper_type {
            ScraperType::Platform => MapperKind::Platform,
            ScraperType::PrimaryFallback => MapperKind::Fallback,
            ScraperType::Primary => MapperKind::Primary,
        }
    }
}

/// 货币最小单位指数表，缺省为 2
static CURRENCY_MINOR_UNITS: Lazy<HashMap<&'static str, u32>> = Lazy::new(|| {
    let mut m = HashMap::new();
    m.insert("JPY", 0);
    m.insert("KRW", 0);
    m.insert("VND", 0);
    m.insert("BHD", 3);
    m.insert("KWD", 3);
    m.insert("OMR", 3);
    m
});

/// 将一条原始提供方条目规范化为统一商品
///
/// 对每种映射器都是全函数：可选字段缺失或畸形不会 panic，
/// 缺失数值回退到 0/None，缺失标志回退到有库存/活跃。
pub fn normalize(raw: &Value, store_id: Uuid, kind: MapperKind) -> NormalizedProduct {
    match kind {
        MapperKind::Primary => normalize_primary(raw, store_id),
        MapperKind::Fallback => normalize_fallback(raw, store_id),
        MapperKind::Platform => normalize_platform(raw, store_id),
    }
}

/// 主抓取格式映射器
///
/// 价格为当前变体价格的最小货币单位整数；折扣只在
/// 之前价格高于当前价格时计算；时间戳为 epoch 毫秒。
fn normalize_primary(raw: &Value, store_id: Uuid) -> NormalizedProduct {
    let product_url = str_field(raw, "url");
    let hash_id = str_field(raw, "id")
        .unwrap_or_else(|| derive_hash_id(product_url.as_deref(), str_field(raw, "title").as_deref()));

    let mut product = NormalizedProduct::empty(store_id, hash_id);
    product.title = str_field(raw, "title").unwrap_or_default();
    product.handle = str_field(raw, "handle");
    product.sku = str_field(raw, "sku");
    product.brand = str_field(raw, "brand");
    product.description = str_field(raw, "description");
    product.product_url = product_url;

    let variants = raw.get("variants").and_then(Value::as_array);
    let first_variant = variants.and_then(|v| v.first());

    if let Some(price_obj) = first_variant.and_then(|v| v.get("price")) {
        let current = minor_units_field(price_obj, "current");
        let previous = minor_units_field(price_obj, "previous");
        product.price = current / 100.0;
        product.currency = str_field(price_obj, "currency");
        // Previous price only counts as "original" when it is an actual markdown
        if previous > current && current > 0.0 {
            product.original_price = Some(previous / 100.0);
            product.discount_percentage = discount_pct(previous / 100.0, current / 100.0);
        }
    }

    // In stock when any variant is available; missing flag defaults to in stock
    product.in_stock = variants
        .map(|vs| {
            vs.is_empty()
                || vs
                    .iter()
                    .any(|v| v.get("available").and_then(Value::as_bool).unwrap_or(true))
        })
        .unwrap_or(true);

    if let Some(medias) = raw.get("medias").and_then(Value::as_array) {
        product.image_url = medias.first().and_then(|m| str_field(m, "url"));
        if !medias.is_empty() {
            product.media = Some(Value::Array(medias.to_vec()));
        }
    }
    if let Some(variants) = variants {
        if !variants.is_empty() {
            product.variants = Some(Value::Array(variants.to_vec()));
        }
    }
    if let Some(options) = raw.get("options").filter(|o| !o.is_null()) {
        product.options = Some(options.clone());
    }

    if let Some(source) = raw.get("source") {
        product.source_retailer = str_field(source, "name");
        product.source_language = str_field(source, "language");
        product.source_created_at = epoch_ms_field(source, "createdAt");
        product.source_updated_at = epoch_ms_field(source, "updatedAt");
    }

    product
}

/// 备用抓取格式映射器
///
/// 扁平字段，价格直接是十进制；handle 从商品URL的最后
/// 一个路径段解析，截掉查询串。
fn normalize_fallback(raw: &Value, store_id: Uuid) -> NormalizedProduct {
    let product_url = str_field(raw, "url");
    let hash_id = str_field(raw, "id")
        .unwrap_or_else(|| derive_hash_id(product_url.as_deref(), str_field(raw, "title").as_deref()));

    let mut product = NormalizedProduct::empty(store_id, hash_id);
    product.title = str_field(raw, "title").unwrap_or_default();
    product.handle = product_url.as_deref().and_then(handle_from_url);
    product.sku = str_field(raw, "sku");
    product.brand = str_field(raw, "brand");
    product.description = str_field(raw, "description");
    product.product_url = product_url;
    product.currency = str_field(raw, "currency");
    product.image_url = str_field(raw, "image");
    product.in_stock = raw.get("inStock").and_then(Value::as_bool).unwrap_or(true);

    product.price = lossy_f64(raw.get("price")).unwrap_or(0.0).max(0.0);
    if let Some(compare_at) = lossy_f64(raw.get("compareAtPrice")) {
        if compare_at > product.price && product.price > 0.0 {
            product.original_price = Some(compare_at);
            product.discount_percentage = discount_pct(compare_at, product.price);
        }
    }

    if let Some(variants) = raw.get("variants").filter(|v| !v.is_null()) {
        product.variants = Some(variants.clone());
    }

    product
}

/// 平台插件API格式映射器
///
/// 价格是按货币指数缩放的最小单位整数；on_sale 决定是否
/// 填充原价；品牌优先取专用字段，否则查品牌分类属性；
/// 只有标记控制变体的属性才会成为商品选项。
fn normalize_platform(raw: &Value, store_id: Uuid) -> NormalizedProduct {
    let hash_id = raw
        .get("id")
        .map(json_to_plain_string)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| {
            derive_hash_id(str_field(raw, "permalink").as_deref(), str_field(raw, "name").as_deref())
        });

    let mut product = NormalizedProduct::empty(store_id, hash_id);
    product.title = str_field(raw, "name").unwrap_or_default();
    product.handle = str_field(raw, "slug");
    product.sku = str_field(raw, "sku");
    product.description = str_field(raw, "description");
    product.product_url = str_field(raw, "permalink");
    product.in_stock = raw
        .get("is_in_stock")
        .and_then(Value::as_bool)
        .unwrap_or(true);

    if let Some(prices) = raw.get("prices") {
        let currency = str_field(prices, "currency_code");
        let exponent = prices
            .get("currency_minor_unit")
            .and_then(Value::as_u64)
            .map(|e| e as u32)
            .or_else(|| {
                currency
                    .as_deref()
                    .and_then(|c| CURRENCY_MINOR_UNITS.get(c).copied())
            })
            .unwrap_or(2);
        let scale = 10f64.powi(exponent as i32);

        product.price = (minor_units_field(prices, "price") / scale).max(0.0);
        product.currency = currency;

        let on_sale = raw.get("on_sale").and_then(Value::as_bool).unwrap_or(false);
        if on_sale {
            let regular = minor_units_field(prices, "regular_price") / scale;
            if regular > product.price && product.price > 0.0 {
                product.original_price = Some(regular);
                product.discount_percentage = discount_pct(regular, product.price);
            }
        }
    }

    product.image_url = raw
        .get("images")
        .and_then(Value::as_array)
        .and_then(|imgs| imgs.first())
        .and_then(|img| str_field(img, "src"));

    // Brand: dedicated field first, then the brand taxonomy attribute
    product.brand = raw
        .get("brands")
        .and_then(Value::as_array)
        .and_then(|bs| bs.first())
        .and_then(|b| str_field(b, "name"))
        .or_else(|| taxonomy_term(raw, "pa_brand"));

    if let Some(attributes) = raw.get("attributes").and_then(Value::as_array) {
        let options: Vec<Value> = attributes
            .iter()
            .filter(|a| {
                a.get("has_variations")
                    .and_then(Value::as_bool)
                    .unwrap_or(false)
            })
            .cloned()
            .collect();
        if !options.is_empty() {
            product.options = Some(Value::Array(options));
        }
    }

    if let Some(variations) = raw.get("variations").and_then(Value::as_array) {
        if !variations.is_empty() {
            product.variants = Some(Value::Array(variations.to_vec()));
        }
    }

    product
}

/// 从品牌分类属性中解析品牌名
fn taxonomy_term(raw: &Value, taxonomy: &str) -> Option<String> {
    raw.get("attributes")
        .and_then(Value::as_array)?
        .iter()
        .find(|a| str_field(a, "taxonomy").as_deref() == Some(taxonomy))
        .and_then(|a| a.get("terms"))
        .and_then(Value::as_array)
        .and_then(|terms| terms.first())
        .and_then(|term| str_field(term, "name"))
}

/// 从商品URL解析 handle：截掉查询串后的最后一个路径段
fn handle_from_url(url: &str) -> Option<String> {
    let without_query = url.split('?').next().unwrap_or(url);
    let segment = without_query
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("");
    if segment.is_empty() || segment.contains("://") {
        None
    } else {
        Some(segment.to_string())
    }
}

/// 无稳定ID时从URL或标题派生自然键
fn derive_hash_id(url: Option<&str>, title: Option<&str>) -> String {
    let basis = url.filter(|u| !u.is_empty()).map(str::to_string).unwrap_or_else(|| {
        title.unwrap_or_default().to_string()
    });
    let mut hasher = Sha256::new();
    hasher.update(basis.as_bytes());
    hex::encode(hasher.finalize())
}

/// 折扣百分比，保证落在 [0,100] 或 None
fn discount_pct(original: f64, current: f64) -> Option<f64> {
    if original <= 0.0 || current < 0.0 || current >= original {
        return None;
    }
    let pct = ((original - current) / original * 100.0).round();
    Some(pct.clamp(0.0, 100.0))
}

fn str_field(value: &Value, key: &str) -> Option<String> {
    value
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// 宽松数值解析：接受数字或数字字符串，其余算缺失
fn lossy_f64(value: Option<&Value>) -> Option<f64> {
    match value? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// 最小货币单位字段：缺失或畸形回退到 0
fn minor_units_field(value: &Value, key: &str) -> f64 {
    lossy_f64(value.get(key)).unwrap_or(0.0).max(0.0)
}

/// epoch 毫秒字段转 ISO-8601 字符串
fn epoch_ms_field(value: &Value, key: &str) -> Option<String> {
    let ms = value.get(key).and_then(Value::as_i64)?;
    DateTime::from_timestamp_millis(ms).map(|dt| dt.to_rfc3339())
}

/// 数字或字符串ID转为稳定的字符串键
fn json_to_plain_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store_id() -> Uuid {
        Uuid::new_v4()
    }

    #[test]
    fn mapper_selection_follows_scraper_type() {
        assert_eq!(
            MapperKind::for_scraper(ScraperType::Primary),
            MapperKind::Primary
        );
        assert_eq!(
            MapperKind::for_scraper(ScraperType::PrimaryFallback),
            MapperKind::Fallback
        );
        assert_eq!(
            MapperKind::for_scraper(ScraperType::Platform),
            MapperKind::Platform
        );
    }

    #[test]
    fn primary_converts_minor_units_and_discount() {
        let raw = json!({
            "id": "prod-1",
            "title": "Sneaker",
            "handle": "sneaker",
            "url": "https://shop.example/products/sneaker",
            "variants": [
                {"price": {"current": 8000, "previous": 10000, "currency": "USD"}, "available": true}
            ],
            "medias": [{"url": "https://cdn.example/sneaker.jpg"}],
            "source": {"name": "shop.example", "language": "en", "createdAt": 1700000000000i64}
        });
        let p = normalize(&raw, store_id(), MapperKind::Primary);
        assert_eq!(p.hash_id, "prod-1");
        assert_eq!(p.price, 80.0);
        assert_eq!(p.original_price, Some(100.0));
        assert_eq!(p.discount_percentage, Some(20.0));
        assert_eq!(p.currency.as_deref(), Some("USD"));
        assert!(p.in_stock);
        assert_eq!(p.image_url.as_deref(), Some("https://cdn.example/sneaker.jpg"));
        assert_eq!(p.source_retailer.as_deref(), Some("shop.example"));
        // epoch millis converted to ISO-8601
        assert!(p.source_created_at.as_deref().unwrap().starts_with("2023-11-14T22:13:20"));
    }

    #[test]
    fn primary_no_discount_when_previous_not_higher() {
        let raw = json!({
            "id": "prod-2",
            "title": "Shirt",
            "variants": [{"price": {"current": 5000, "previous": 5000, "currency": "EUR"}}]
        });
        let p = normalize(&raw, store_id(), MapperKind::Primary);
        assert_eq!(p.price, 50.0);
        assert_eq!(p.original_price, None);
        assert_eq!(p.discount_percentage, None);
    }

    #[test]
    fn primary_tolerates_missing_everything() {
        let p = normalize(&json!({}), store_id(), MapperKind::Primary);
        assert_eq!(p.price, 0.0);
        assert!(p.in_stock);
        assert_eq!(p.discount_percentage, None);
        // hash_id still derived deterministically
        assert_eq!(p.hash_id.len(), 64);
    }

    #[test]
    fn primary_out_of_stock_when_no_variant_available() {
        let raw = json!({
            "id": "prod-3",
            "title": "Boots",
            "variants": [
                {"price": {"current": 100}, "available": false},
                {"price": {"current": 100}, "available": false}
            ]
        });
        let p = normalize(&raw, store_id(), MapperKind::Primary);
        assert!(!p.in_stock);
    }

    #[test]
    fn fallback_parses_decimal_prices_and_handle() {
        let raw = json!({
            "id": "fb-1",
            "title": "Jacket",
            "price": 79.5,
            "compareAtPrice": 159.0,
            "currency": "USD",
            "url": "https://shop.example/collections/sale/winter-jacket?variant=42&utm=x",
            "inStock": false
        });
        let p = normalize(&raw, store_id(), MapperKind::Fallback);
        assert_eq!(p.price, 79.5);
        assert_eq!(p.original_price, Some(159.0));
        assert_eq!(p.discount_percentage, Some(50.0));
        assert_eq!(p.handle.as_deref(), Some("winter-jacket"));
        assert!(!p.in_stock);
    }

    #[test]
    fn fallback_handle_ignores_trailing_slash() {
        let raw = json!({
            "id": "fb-2",
            "title": "Hat",
            "url": "https://shop.example/products/wool-hat/"
        });
        let p = normalize(&raw, store_id(), MapperKind::Fallback);
        assert_eq!(p.handle.as_deref(), Some("wool-hat"));
    }

    #[test]
    fn fallback_price_from_string_is_accepted() {
        let raw = json!({"id": "fb-3", "title": "Belt", "price": "12.99"});
        let p = normalize(&raw, store_id(), MapperKind::Fallback);
        assert_eq!(p.price, 12.99);
    }

    #[test]
    fn platform_scales_by_currency_minor_unit() {
        let raw = json!({
            "id": 101,
            "name": "Mug",
            "slug": "mug",
            "is_in_stock": true,
            "on_sale": true,
            "prices": {
                "price": "1200",
                "regular_price": "1500",
                "currency_code": "USD",
                "currency_minor_unit": 2
            }
        });
        let p = normalize(&raw, store_id(), MapperKind::Platform);
        assert_eq!(p.hash_id, "101");
        assert_eq!(p.price, 12.0);
        assert_eq!(p.original_price, Some(15.0));
        assert_eq!(p.discount_percentage, Some(20.0));
    }

    #[test]
    fn platform_zero_exponent_currency() {
        let raw = json!({
            "id": 102,
            "name": "Tea",
            "on_sale": false,
            "prices": {"price": "500", "currency_code": "JPY"}
        });
        let p = normalize(&raw, store_id(), MapperKind::Platform);
        assert_eq!(p.price, 500.0);
        assert_eq!(p.original_price, None);
    }

    #[test]
    fn platform_on_sale_gates_original_price() {
        let raw = json!({
            "id": 103,
            "name": "Lamp",
            "on_sale": false,
            "prices": {"price": "1000", "regular_price": "2000", "currency_minor_unit": 2}
        });
        let p = normalize(&raw, store_id(), MapperKind::Platform);
        assert_eq!(p.original_price, None);
        assert_eq!(p.discount_percentage, None);
    }

    #[test]
    fn platform_brand_falls_back_to_taxonomy() {
        let raw = json!({
            "id": 104,
            "name": "Chair",
            "attributes": [
                {"name": "Brand", "taxonomy": "pa_brand", "has_variations": false,
                 "terms": [{"name": "Acme"}]},
                {"name": "Color", "taxonomy": "pa_color", "has_variations": true,
                 "terms": [{"name": "Red"}, {"name": "Blue"}]}
            ]
        });
        let p = normalize(&raw, store_id(), MapperKind::Platform);
        assert_eq!(p.brand.as_deref(), Some("Acme"));
        // Only variation-controlling attributes surface as options
        let options = p.options.unwrap();
        let options = options.as_array().unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0]["name"], "Color");
    }

    #[test]
    fn platform_dedicated_brand_field_wins() {
        let raw = json!({
            "id": 105,
            "name": "Desk",
            "brands": [{"name": "WoodWorks"}],
            "attributes": [
                {"taxonomy": "pa_brand", "terms": [{"name": "Other"}]}
            ]
        });
        let p = normalize(&raw, store_id(), MapperKind::Platform);
        assert_eq!(p.brand.as_deref(), Some("WoodWorks"));
    }

    #[test]
    fn discount_is_always_null_or_within_range() {
        for (orig, cur) in [(100.0, 0.01), (100.0, 99.99), (0.0, 10.0), (10.0, 10.0)] {
            if let Some(pct) = discount_pct(orig, cur) {
                assert!((0.0..=100.0).contains(&pct), "pct {pct} out of range");
            }
        }
    }

    #[test]
    fn price_is_never_negative() {
        let raw = json!({"id": "x", "title": "Weird", "price": -5.0});
        let p = normalize(&raw, store_id(), MapperKind::Fallback);
        assert!(p.price >= 0.0);

        let raw = json!({"id": 1, "name": "Weird", "prices": {"price": "-500"}});
        let p = normalize(&raw, store_id(), MapperKind::Platform);
        assert!(p.price >= 0.0);
    }
}
