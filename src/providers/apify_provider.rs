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

use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

use crate::providers::traits::{ProviderError, RunProvider, RunState, RunStatus, StartedRun};

/// 数据集分页大小
const DATASET_PAGE_SIZE: usize = 1000;

/// Apify风格运行提供方
///
/// 基于reqwest实现的HTTP客户端，按 token 查询参数认证。
/// 连接复用一个客户端，超时在构造时固定。
pub struct ApifyProvider {
    client: reqwest::Client,
    base_url: String,
    token: String,
}

impl ApifyProvider {
    /// 创建提供方客户端
    ///
    /// # 参数
    ///
    /// * `base_url` - 提供方API根地址，不带结尾斜杠
    /// * `token` - API令牌
    /// * `timeout` - 单次请求超时
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .user_agent("storewatch/1.0")
            .timeout(timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    /// 校验响应状态，非2xx转为带响应体的API错误
    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ProviderError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response.text().await.unwrap_or_default();
        Err(ProviderError::Api {
            status: status.as_u16(),
            message: truncate(&message, 512),
        })
    }
}

/// 错误信息截断，避免把整页HTML写进任务错误字段
fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        let mut end = max;
        while !s.is_char_boundary(end) {
            end -= 1;
        }
        s[..end].to_string()
    }
}

fn data_field<'a>(body: &'a Value, key: &str) -> Option<&'a Value> {
    body.get("data").and_then(|d| d.get(key))
}

fn data_str(body: &Value, key: &str) -> Option<String> {
    data_field(body, key)
        .and_then(Value::as_str)
        .map(str::to_string)
}

#[async_trait]
impl RunProvider for ApifyProvider {
    /// 启动一个actor运行
    ///
    /// # 返回值
    ///
    /// * `Ok(StartedRun)` - 运行ID和缺省数据集ID
    /// * `Err(ProviderError)` - 提供方拒绝或请求失败
    async fn start_run(&self, actor_id: &str, input: &Value) -> Result<StartedRun, ProviderError> {
        let url = format!("{}/v2/acts/{}/runs", self.base_url, actor_id);
        let response = self
            .client
            .post(&url)
            .query(&[("token", self.token.as_str())])
            .json(input)
            .send()
            .await?;
        let response = Self::check(response).await?;

        let body: Value = response.json().await?;
        let run_id = data_str(&body, "id")
            .ok_or_else(|| ProviderError::MalformedResponse("run id missing".to_string()))?;
        let dataset_id = data_str(&body, "defaultDatasetId");
        debug!(actor_id, run_id, "started provider run");

        Ok(StartedRun { run_id, dataset_id })
    }

    /// 查询一个运行的状态
    async fn run_status(&self, run_id: &str) -> Result<RunStatus, ProviderError> {
        let url = format!("{}/v2/actor-runs/{}", self.base_url, run_id);
        let response = self
            .client
            .get(&url)
            .query(&[("token", self.token.as_str())])
            .send()
            .await?;
        let response = Self::check(response).await?;

        let body: Value = response.json().await?;
        let raw_status = data_str(&body, "status")
            .ok_or_else(|| ProviderError::MalformedResponse("run status missing".to_string()))?;

        Ok(RunStatus {
            state: RunState::parse(&raw_status),
            dataset_id: data_str(&body, "defaultDatasetId"),
        })
    }

    /// 拉取数据集的全部条目，内部分页直到短页
    async fn dataset_items(&self, dataset_id: &str) -> Result<Vec<Value>, ProviderError> {
        let url = format!("{}/v2/datasets/{}/items", self.base_url, dataset_id);
        let mut items: Vec<Value> = Vec::new();
        let mut offset = 0usize;

        loop {
            let response = self
                .client
                .get(&url)
                .query(&[
                    ("token", self.token.as_str()),
                    ("format", "json"),
                    ("offset", &offset.to_string()),
                    ("limit", &DATASET_PAGE_SIZE.to_string()),
                ])
                .send()
                .await?;
            let response = Self::check(response).await?;

            let page: Vec<Value> = response.json().await?;
            let page_len = page.len();
            items.extend(page);

            if page_len < DATASET_PAGE_SIZE {
                break;
            }
            offset += page_len;
        }

        debug!(dataset_id, count = items.len(), "fetched dataset items");
        Ok(items)
    }
}

#[cfg(test)]
#[path = "apify_provider_test.rs"]
mod tests;
