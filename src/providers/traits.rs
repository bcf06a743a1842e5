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
use thiserror::Error;

/// 提供方错误类型
#[derive(Error, Debug)]
pub enum ProviderError {
    /// 请求失败
    #[error("Request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),
    /// 提供方返回非预期状态码
    #[error("Provider returned status {status}: {message}")]
    Api { status: u16, message: String },
    /// 响应体缺少必要字段
    #[error("Malformed provider response: {0}")]
    MalformedResponse(String),
}

/// 远端运行状态
///
/// 提供方状态字符串的本地映射。未识别的状态归入 Unknown
/// 且视为非终态，轮询会继续等待而不是误判失败。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    /// 已就绪，尚未开始
    Ready,
    /// 运行中
    Running,
    /// 成功结束
    Succeeded,
    /// 失败结束
    Failed,
    /// 被中止
    Aborted,
    /// 超时结束
    TimedOut,
    /// 未识别的状态，按非终态处理
    Unknown,
}

impl RunState {
    /// 从提供方状态字符串解析
    pub fn parse(raw: &str) -> Self {
        match raw {
            "READY" => RunState::Ready,
            "RUNNING" => RunState::Running,
            "SUCCEEDED" => RunState::Succeeded,
            "FAILED" => RunState::Failed,
            "ABORTED" => RunState::Aborted,
            "TIMED-OUT" => RunState::TimedOut,
            _ => RunState::Unknown,
        }
    }

    /// 是否终态
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RunState::Succeeded | RunState::Failed | RunState::Aborted | RunState::TimedOut
        )
    }
}

/// 新启动的运行
#[derive(Debug, Clone)]
pub struct StartedRun {
    /// 提供方运行ID
    pub run_id: String,
    /// 运行的缺省数据集ID
    pub dataset_id: Option<String>,
}

/// 一次状态查询的结果
#[derive(Debug, Clone)]
pub struct RunStatus {
    /// 当前状态
    pub state: RunState,
    /// 数据集ID，启动响应缺失时从这里补齐
    pub dataset_id: Option<String>,
}

/// 抓取运行提供方特质
///
/// 对异步运行式抓取服务的抽象：启动一个actor运行、查询其
/// 状态、拉取其产出数据集。调和器只依赖这个特质。
#[async_trait]
pub trait RunProvider: Send + Sync {
    /// 启动一个actor运行
    async fn start_run(&self, actor_id: &str, input: &Value) -> Result<StartedRun, ProviderError>;

    /// 查询一个运行的状态
    async fn run_status(&self, run_id: &str) -> Result<RunStatus, ProviderError>;

    /// 拉取数据集的全部条目
    async fn dataset_items(&self, dataset_id: &str) -> Result<Vec<Value>, ProviderError>;
}
