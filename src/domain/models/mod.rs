// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域模型模块
///
/// 该模块定义了系统的核心业务实体，包括：
/// - 店铺（store）：被监控的电商店铺及其平台类型
/// - 抓取任务（scrape_job）：一次抓取运行的状态机
/// - 商品（product）：规范化后的统一商品形态
/// - 商品变更（product_change）：快照对比产生的审计记录
/// - 监控（monitoring）：每店铺的调度配置和监控日志
///
/// 这些模型构成了系统的数据基础，定义了业务概念的
/// 结构和行为，是领域驱动设计的核心组成部分。
pub mod monitoring;
pub mod product;
pub mod product_change;
pub mod scrape_job;
pub mod store;
