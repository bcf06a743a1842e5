// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 工作器模块
///
/// 提供后台任务处理功能
/// 包括监控调度和抓取任务调和
pub mod monitor_worker;
pub mod reconcile_worker;

pub use monitor_worker::MonitorWorker;
pub use reconcile_worker::ReconcileWorker;
