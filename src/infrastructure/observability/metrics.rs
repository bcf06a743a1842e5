// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// 初始化指标系统
///
/// 配置并注册应用所需的各类监控指标
pub fn init_metrics() {
    let builder = PrometheusBuilder::new();
    builder
        .install()
        .expect("failed to install Prometheus recorder");

    // Register metrics
    describe_counter!(
        "scrape_jobs_started_total",
        "Total number of scrape jobs started"
    );
    describe_counter!(
        "scrape_jobs_completed_total",
        "Total number of scrape jobs completed"
    );
    describe_counter!(
        "scrape_jobs_failed_total",
        "Total number of scrape jobs failed"
    );
    describe_counter!(
        "scrape_jobs_stale_total",
        "Total number of scrape jobs force-failed as stale"
    );
    describe_counter!(
        "scrape_jobs_fallback_total",
        "Total number of jobs escalated to the fallback provider"
    );
    describe_counter!(
        "products_upserted_total",
        "Total number of product rows written"
    );
    describe_counter!(
        "product_changes_total",
        "Total number of change records produced"
    );
    describe_counter!(
        "monitoring_runs_total",
        "Total number of monitoring-triggered scrapes"
    );
    describe_histogram!(
        "reconcile_pass_duration_seconds",
        "Duration of one reconciler pass in seconds"
    );
}
