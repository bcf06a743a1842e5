// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 仓库接口模块
///
/// 该模块定义了数据持久化的抽象接口，领域层和工作器只
/// 依赖这些特质，不感知具体的数据库实现：
/// - 店铺仓库（store_repository）
/// - 抓取任务仓库（scrape_job_repository）：含条件认领语义
/// - 商品仓库（product_repository）：幂等 upsert 和软移除
/// - 商品变更仓库（product_change_repository）：追加写入审计
/// - 监控仓库（monitoring_repository）：调度配置和监控日志
pub mod monitoring_repository;
pub mod product_change_repository;
pub mod product_repository;
pub mod scrape_job_repository;
pub mod store_repository;
