// Copyright (c) 2025 Kirky.X
//
// Licensed under the MIT License
// See LICENSE file in the project root for full license information.

/// 提供方模块
///
/// 该模块封装对异步运行式抓取服务的访问：
/// - 特质（traits）：运行提供方抽象、运行状态和错误类型
/// - Apify提供方（apify_provider）：基于reqwest的HTTP实现
pub mod apify_provider;
pub mod traits;
