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

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

/// 应用程序配置设置
///
/// 包含数据库、服务器、提供方、调和器和监控调度等所有配置项
#[derive(Debug, Deserialize)]
pub struct Settings {
    /// 数据库配置
    pub database: DatabaseSettings,
    /// 服务器配置
    pub server: ServerSettings,
    /// 抓取提供方配置
    pub provider: ProviderSettings,
    /// 调和器配置
    pub reconciler: ReconcilerSettings,
    /// 监控调度配置
    pub monitoring: MonitoringSettings,
}

/// 数据库配置设置
#[derive(Debug, Deserialize)]
pub struct DatabaseSettings {
    /// 数据库连接URL
    pub url: String,
    /// 最大连接数
    pub max_connections: Option<u32>,
    /// 最小连接数
    pub min_connections: Option<u32>,
    /// 连接超时时间（秒）
    pub connect_timeout: Option<u64>,
    /// 空闲连接超时时间（秒）
    pub idle_timeout: Option<u64>,
    /// 连接最长存活时间（秒），到期后回收重建
    pub max_lifetime: Option<u64>,
    /// 是否在日志中输出SQL语句
    pub sqlx_logging: bool,
}

/// 服务器配置设置
#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    /// 服务器监听主机地址
    pub host: String,
    /// 服务器监听端口
    pub port: u16,
}

/// 抓取提供方配置设置
#[derive(Debug, Deserialize)]
pub struct ProviderSettings {
    /// 提供方API根地址
    pub base_url: String,
    /// API令牌
    pub token: String,
    /// 主抓取actor ID
    pub primary_actor_id: String,
    /// 备用抓取actor ID，缺省时不做备用升级
    pub fallback_actor_id: Option<String>,
    /// 平台插件抓取actor ID
    pub platform_actor_id: String,
    /// 单次请求超时（秒）
    pub request_timeout: u64,
}

/// 调和器配置设置
#[derive(Debug, Deserialize)]
pub struct ReconcilerSettings {
    /// 轮询间隔（秒）
    pub poll_interval_secs: u64,
    /// 每轮处理的任务数上限
    pub poll_batch_size: u64,
    /// 陈旧阈值（小时），超过则强制失败
    pub stale_after_hours: i64,
    /// 商品写入批量大小
    pub upsert_batch_size: usize,
    /// 变更记录写入批量大小
    pub change_batch_size: usize,
}

/// 监控调度配置设置
#[derive(Debug, Deserialize)]
pub struct MonitoringSettings {
    /// 调度扫描间隔（秒）
    pub tick_interval_secs: u64,
    /// 每轮触发的店铺数上限
    pub batch_size: u64,
    /// 下次检查时间的最大抖动（秒）
    pub jitter_secs: i64,
}

impl Settings {
    /// 创建新的配置实例
    ///
    /// 从环境变量加载配置，支持默认值
    ///
    /// # Returns
    ///
    /// * `Ok(Settings)` - 成功加载的配置
    /// * `Err(ConfigError)` - 配置加载失败
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("APP_ENVIRONMENT").unwrap_or_else(|_| "default".to_string());
        let builder = Config::builder()
            // Start with default settings
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?
            // Default DB pool settings
            .set_default("database.max_connections", 100)?
            .set_default("database.min_connections", 10)?
            .set_default("database.connect_timeout", 10)?
            .set_default("database.idle_timeout", 300)?
            .set_default("database.max_lifetime", 1800)?
            .set_default("database.sqlx_logging", false)?
            // Default Provider settings
            .set_default("provider.base_url", "https://api.apify.com")?
            .set_default("provider.request_timeout", 30)?
            // Default Reconciler settings
            .set_default("reconciler.poll_interval_secs", 60)?
            .set_default("reconciler.poll_batch_size", 20)?
            .set_default("reconciler.stale_after_hours", 2)?
            .set_default("reconciler.upsert_batch_size", 50)?
            .set_default("reconciler.change_batch_size", 100)?
            // Default Monitoring settings
            .set_default("monitoring.tick_interval_secs", 300)?
            .set_default("monitoring.batch_size", 10)?
            .set_default("monitoring.jitter_secs", 300)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(Environment::with_prefix("STOREWATCH").separator("__"));

        builder.build()?.try_deserialize()
    }
}

#[cfg(test)]
#[path = "settings_test.rs"]
mod tests;
