// ==========================================
// 生产流程看板 - 对话模型客户端
// ==========================================
// 协议: POST {base_url}/chat/completions（OpenAI 兼容）
// 认证: Bearer API 密钥
// ==========================================

use crate::assistant::error::{AssistantError, AssistantResult};
use crate::assistant::session::ChatMessage;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

pub const DEFAULT_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Clone)]
pub struct ChatClientConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ChatClientConfig {
    pub fn new(base_url: &str, model: &str, api_key: Option<String>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key,
            temperature: DEFAULT_TEMPERATURE,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[derive(Debug, Serialize)]
pub struct ChatCompletionRequest<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub temperature: f32,
    pub max_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
}

pub struct ChatClient {
    client: Client,
    config: ChatClientConfig,
}

impl ChatClient {
    pub fn new(config: ChatClientConfig) -> AssistantResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AssistantError::ClientConfig(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &ChatClientConfig {
        &self.config
    }

    pub fn build_request<'a>(&'a self, messages: &'a [ChatMessage]) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.config.model,
            messages,
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        }
    }

    /// 发送对话并返回第一条回答
    ///
    /// # 错误
    /// - MissingApiKey: 未配置密钥（不发起请求）
    /// - Network / Api / Decode / EmptyResponse
    pub async fn complete(&self, messages: &[ChatMessage]) -> AssistantResult<String> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .filter(|k| !k.trim().is_empty())
            .ok_or(AssistantError::MissingApiKey)?;

        let url = self.config.endpoint();
        debug!(url = %url, messages = messages.len(), model = %self.config.model, "发送对话请求");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&self.build_request(messages))
            .send()
            .await
            .map_err(|e| AssistantError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp
                .json::<ErrorBody>()
                .await
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_else(|| format!("HTTP {}", status.as_u16()));
            warn!(status = status.as_u16(), message = %message, "助手服务返回错误");
            return Err(AssistantError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body: ChatCompletionResponse = resp
            .json()
            .await
            .map_err(|e| AssistantError::Decode(e.to_string()))?;

        body.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or(AssistantError::EmptyResponse)
    }
}
