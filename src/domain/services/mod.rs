// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 领域服务模块
///
/// 该模块包含系统的核心业务逻辑服务，这些服务封装了复杂的
/// 业务规则和领域逻辑，协调多个领域对象来完成业务操作。
///
/// 包含的服务：
/// - 规范化服务（normalizer）：三种提供方条目格式到统一商品的映射
/// - 去重服务（deduplicator）：多语言店铺按 handle 去重
/// - 变更检测服务（change_detection）：快照对比与审计记录生成
pub mod change_detection;
pub mod deduplicator;
pub mod normalizer;
