// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::application::dto::scrape_dto::ProductChangeDto;
use crate::application::dto::store_dto::{CreateStoreRequestDto, StoreResponseDto};
use crate::domain::models::monitoring::MonitoringConfig;
use crate::domain::models::store::Store;
use crate::domain::repositories::monitoring_repository::MonitoringRepository;
use crate::domain::repositories::product_change_repository::ProductChangeRepository;
use crate::domain::repositories::scrape_job_repository::RepositoryError;
use crate::domain::repositories::store_repository::StoreRepository;
use crate::presentation::errors::AppError;

/// 新店铺的默认监控间隔（小时）
const DEFAULT_CHECK_INTERVAL_HOURS: i32 = 24;

/// 变更记录查询参数
#[derive(Debug, Deserialize)]
pub struct ChangesQuery {
    /// 返回条数上限
    pub limit: Option<u64>,
}

/// 注册店铺
///
/// 同时创建立即到期的监控配置，下一轮调度即触发首次抓取。
pub async fn create_store<St, M>(
    Extension(store_repo): Extension<Arc<St>>,
    Extension(monitoring_repo): Extension<Arc<M>>,
    Json(request): Json<CreateStoreRequestDto>,
) -> Result<(StatusCode, Json<StoreResponseDto>), AppError>
where
    St: StoreRepository,
    M: MonitoringRepository,
{
    if request.name.trim().is_empty() {
        return Err(AppError::from(anyhow::anyhow!("name cannot be empty")));
    }
    if request.base_url.trim().is_empty() {
        return Err(AppError::from(anyhow::anyhow!("base_url cannot be empty")));
    }

    let store = Store::new(request.name, request.base_url, request.platform);
    let store = store_repo.create(&store).await?;

    monitoring_repo
        .create_config(&MonitoringConfig::new(
            store.id,
            DEFAULT_CHECK_INTERVAL_HOURS,
        ))
        .await?;

    Ok((StatusCode::CREATED, Json(store.into())))
}

/// 查询店铺最近的变更记录
pub async fn get_store_changes<St, C>(
    Extension(store_repo): Extension<Arc<St>>,
    Extension(change_repo): Extension<Arc<C>>,
    Path(store_id): Path<Uuid>,
    Query(query): Query<ChangesQuery>,
) -> Result<Json<Vec<ProductChangeDto>>, AppError>
where
    St: StoreRepository,
    C: ProductChangeRepository,
{
    store_repo
        .find_by_id(store_id)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    let limit = query.limit.unwrap_or(100).min(1000);
    let records = change_repo.find_recent_by_store(store_id, limit).await?;

    Ok(Json(records.into_iter().map(Into::into).collect()))
}
