// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub store_id: Uuid,
    pub hash_id: String,
    pub title: String,
    pub handle: Option<String>,
    pub sku: Option<String>,
    pub brand: Option<String>,
    pub description: Option<String>,
    pub price: f64,
    pub original_price: Option<f64>,
    pub discount_percentage: Option<f64>,
    pub currency: Option<String>,
    pub in_stock: bool,
    pub image_url: Option<String>,
    pub product_url: Option<String>,
    pub variants: Option<Json>,
    pub media: Option<Json>,
    pub options: Option<Json>,
    pub source_retailer: Option<String>,
    pub source_language: Option<String>,
    pub source_created_at: Option<String>,
    pub source_updated_at: Option<String>,
    pub status: String,
    pub published: bool,
    pub featured: bool,
    pub on_slider: bool,
    pub created_at: ChronoDateTimeWithTimeZone,
    pub updated_at: ChronoDateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
