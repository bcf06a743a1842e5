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

use axum::Extension;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::info;

use storewatch::application::usecases::start_scrape::{ScrapeActors, StartScrapeUseCase};
use storewatch::config::settings::Settings;
use storewatch::infrastructure::database::connection;
use storewatch::infrastructure::observability::metrics;
use storewatch::infrastructure::repositories::monitoring_repo_impl::MonitoringRepositoryImpl;
use storewatch::infrastructure::repositories::product_change_repo_impl::ProductChangeRepositoryImpl;
use storewatch::infrastructure::repositories::product_repo_impl::ProductRepositoryImpl;
use storewatch::infrastructure::repositories::scrape_job_repo_impl::ScrapeJobRepositoryImpl;
use storewatch::infrastructure::repositories::store_repo_impl::StoreRepositoryImpl;
use storewatch::presentation::routes;
use storewatch::providers::apify_provider::ApifyProvider;
use storewatch::providers::traits::RunProvider;
use storewatch::utils::telemetry;
use storewatch::workers::{MonitorWorker, ReconcileWorker};

use migration::{Migrator, MigratorTrait};

/// 主函数
///
/// 应用程序入口点，负责初始化所有组件并启动服务
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Initialize logging
    telemetry::init_telemetry();
    info!("Starting storewatch...");

    // Initialize Prometheus Metrics
    metrics::init_metrics();

    // 2. Load configuration
    let settings = Arc::new(Settings::new()?);
    info!("Configuration loaded");

    // 3. Connect to database
    let db = connection::create_pool(&settings.database).await?;
    let db = Arc::new(db);
    info!("Database connection established");

    // Run database migrations
    info!("Running database migrations...");
    Migrator::up(db.as_ref(), None).await?;
    info!("Database migrations applied");

    // 4. Initialize repositories
    let store_repo = Arc::new(StoreRepositoryImpl::new(db.clone()));
    let job_repo = Arc::new(ScrapeJobRepositoryImpl::new(db.clone()));
    let product_repo = Arc::new(ProductRepositoryImpl::new(db.clone()));
    let change_repo = Arc::new(ProductChangeRepositoryImpl::new(db.clone()));
    let monitoring_repo = Arc::new(MonitoringRepositoryImpl::new(db.clone()));

    // 5. Initialize the run provider and the shared start-scrape use case
    let provider: Arc<dyn RunProvider> = Arc::new(ApifyProvider::new(
        settings.provider.base_url.clone(),
        settings.provider.token.clone(),
        Duration::from_secs(settings.provider.request_timeout),
    )?);
    let actors = ScrapeActors {
        primary: settings.provider.primary_actor_id.clone(),
        fallback: settings.provider.fallback_actor_id.clone(),
        platform: settings.provider.platform_actor_id.clone(),
    };
    let usecase = Arc::new(StartScrapeUseCase::new(
        job_repo.clone(),
        monitoring_repo.clone(),
        provider.clone(),
        actors.clone(),
    ));

    // 6. Start background workers
    let reconcile_worker = ReconcileWorker::new(
        job_repo.clone(),
        store_repo.clone(),
        product_repo.clone(),
        change_repo.clone(),
        monitoring_repo.clone(),
        provider.clone(),
        actors,
        &settings.reconciler,
    );
    reconcile_worker.start();

    let monitor_worker = MonitorWorker::new(
        monitoring_repo.clone(),
        store_repo.clone(),
        usecase.clone(),
        &settings.monitoring,
    );
    monitor_worker.start();
    info!("Background workers started");

    // 7. Start HTTP server
    let app = routes::routes()
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .layer(Extension(store_repo))
        .layer(Extension(job_repo))
        .layer(Extension(change_repo))
        .layer(Extension(monitoring_repo))
        .layer(Extension(usecase))
        .layer(Extension(settings.clone()));

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
