//! 统一 LLM 客户端

use reqwest::Client;
use std::time::Duration;
use tracing::info;

use super::anthropic::complete_anthropic;
use super::format::{build_endpoint, detect_api_format, ApiFormat};
use super::openai::complete_openai;
use super::types::{ChatMessage, ChatOptions, CompletionResult, LlmError};

/// 统一 LLM 客户端
///
/// 支持 OpenAI 和 Anthropic API 格式，根据模型名称自动选择
pub struct LlmClient {
    client: Client,
    api_key: String,
    base_url: String,
}

impl LlmClient {
    /// 创建新的 LLM 客户端
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
        timeout_secs: u64,
    ) -> Result<Self, LlmError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(LlmError::ConfigError("API Key is required".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs.max(1)))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(LlmError::HttpError)?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into(),
        })
    }

    /// 给定模型实际请求的端点
    pub fn endpoint_for(&self, model: &str) -> String {
        build_endpoint(detect_api_format(model), &self.base_url)
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// 发送一次请求并返回完整响应（自动检测 API 格式）
    pub async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        model: &str,
        options: ChatOptions,
    ) -> Result<CompletionResult, LlmError> {
        let api_format = detect_api_format(model);
        info!("LLM request: model={}, api_format={:?}", model, api_format);

        match api_format {
            ApiFormat::OpenAi => {
                complete_openai(
                    &self.client,
                    &self.api_key,
                    &self.base_url,
                    messages,
                    model,
                    &options,
                )
                .await
            }
            ApiFormat::Anthropic => {
                complete_anthropic(
                    &self.client,
                    &self.api_key,
                    &self.base_url,
                    messages,
                    model,
                    &options,
                )
                .await
            }
        }
    }
}
