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

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use uuid::Uuid;

use crate::application::dto::scrape_dto::ScrapeJobResponseDto;
use crate::application::usecases::start_scrape::StartScrapeUseCase;
use crate::domain::models::scrape_job::ScraperType;
use crate::domain::repositories::monitoring_repository::MonitoringRepository;
use crate::domain::repositories::scrape_job_repository::{RepositoryError, ScrapeJobRepository};
use crate::domain::repositories::store_repository::StoreRepository;
use crate::presentation::errors::AppError;

/// 手动触发店铺抓取
///
/// 与监控调度器共用同一用例，产生完全相同的任务。
pub async fn trigger_scrape<J, M, St>(
    Extension(store_repo): Extension<Arc<St>>,
    Extension(usecase): Extension<Arc<StartScrapeUseCase<J, M>>>,
    Path(store_id): Path<Uuid>,
) -> Result<(StatusCode, Json<ScrapeJobResponseDto>), AppError>
where
    J: ScrapeJobRepository,
    M: MonitoringRepository,
    St: StoreRepository,
{
    let store = store_repo
        .find_by_id(store_id)
        .await?
        .filter(|store| !store.deleted)
        .ok_or(RepositoryError::NotFound)?;

    let scraper_type = if store.platform.is_plugin_platform() {
        ScraperType::Platform
    } else {
        ScraperType::Primary
    };

    let job = usecase.execute(&store, scraper_type, None).await?;

    Ok((StatusCode::ACCEPTED, Json(job.into())))
}

/// 查询抓取任务
pub async fn get_job<J>(
    Extension(job_repo): Extension<Arc<J>>,
    Path(job_id): Path<Uuid>,
) -> Result<Json<ScrapeJobResponseDto>, AppError>
where
    J: ScrapeJobRepository,
{
    let job = job_repo
        .find_by_id(job_id)
        .await?
        .ok_or(RepositoryError::NotFound)?;

    Ok(Json(job.into()))
}
