// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use crate::infrastructure::repositories::monitoring_repo_impl::MonitoringRepositoryImpl;
use crate::infrastructure::repositories::product_change_repo_impl::ProductChangeRepositoryImpl;
use crate::infrastructure::repositories::scrape_job_repo_impl::ScrapeJobRepositoryImpl;
use crate::infrastructure::repositories::store_repo_impl::StoreRepositoryImpl;
use crate::presentation::handlers::{scrape_handler, store_handler};
use axum::{
    routing::{get, post},
    Router,
};

/// 创建应用路由
///
/// # 返回值
///
/// 返回配置好的路由
pub fn routes() -> Router {
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .route("/v1/version", get(version));

    let api_routes = Router::new()
        .route(
            "/v1/stores",
            post(store_handler::create_store::<StoreRepositoryImpl, MonitoringRepositoryImpl>),
        )
        .route(
            "/v1/stores/{id}/scrape",
            post(
                scrape_handler::trigger_scrape::<
                    ScrapeJobRepositoryImpl,
                    MonitoringRepositoryImpl,
                    StoreRepositoryImpl,
                >,
            ),
        )
        .route(
            "/v1/jobs/{id}",
            get(scrape_handler::get_job::<ScrapeJobRepositoryImpl>),
        )
        .route(
            "/v1/stores/{id}/changes",
            get(store_handler::get_store_changes::<
                StoreRepositoryImpl,
                ProductChangeRepositoryImpl,
            >),
        );

    Router::new().merge(public_routes).merge(api_routes)
}

/// 健康检查端点
///
/// # 返回值
///
/// 返回"OK"字符串
pub async fn health_check() -> &'static str {
    "OK"
}

/// 版本信息端点
///
/// # 返回值
///
/// 返回应用版本号
pub async fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
