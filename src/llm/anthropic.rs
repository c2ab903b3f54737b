//! Anthropic Messages API 实现

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::format::{build_endpoint, ApiFormat};
use super::types::{ChatMessage, ChatOptions, CompletionResult, LlmError};

/// Anthropic 请求载荷
#[derive(Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    messages: Vec<AnthropicMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
}

#[derive(Serialize)]
struct AnthropicMessage {
    role: String,
    content: String,
}

/// Anthropic 响应体
#[derive(Deserialize, Debug)]
struct AnthropicResponse {
    #[serde(default)]
    content: Vec<AnthropicContentBlock>,
    stop_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct AnthropicContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    #[serde(default)]
    text: Option<String>,
}

/// 构建请求体：系统消息单独放到 `system` 字段
fn build_request<'a>(
    messages: Vec<ChatMessage>,
    model: &'a str,
    options: &ChatOptions,
) -> AnthropicRequest<'a> {
    let mut system_parts: Vec<String> = Vec::new();
    let mut anthropic_messages = Vec::new();

    for msg in messages {
        if msg.role == "system" {
            system_parts.push(msg.content);
        } else {
            anthropic_messages.push(AnthropicMessage {
                role: msg.role,
                content: msg.content,
            });
        }
    }

    AnthropicRequest {
        model,
        messages: anthropic_messages,
        system: (!system_parts.is_empty()).then(|| system_parts.join("\n\n")),
        max_tokens: options.max_tokens.unwrap_or(4096),
        temperature: options.temperature,
    }
}

/// 解析 Anthropic 响应，拼接所有文本块
fn parse_response(body: &str) -> Result<CompletionResult, LlmError> {
    let response: AnthropicResponse = serde_json::from_str(body)?;

    let content: String = response
        .content
        .into_iter()
        .filter(|block| block.block_type == "text")
        .filter_map(|block| block.text)
        .collect();

    if content.is_empty() {
        return Err(LlmError::EmptyResponse);
    }

    Ok(CompletionResult {
        content,
        finish_reason: response.stop_reason,
    })
}

/// 调用 Anthropic API
pub async fn complete_anthropic(
    client: &Client,
    api_key: &str,
    base_url: &str,
    messages: Vec<ChatMessage>,
    model: &str,
    options: &ChatOptions,
) -> Result<CompletionResult, LlmError> {
    let endpoint = build_endpoint(ApiFormat::Anthropic, base_url);
    let payload = build_request(messages, model, options);

    debug!("Anthropic API request: endpoint={}, model={}", endpoint, model);

    let response = client
        .post(&endpoint)
        .header("x-api-key", api_key)
        .header("anthropic-version", "2023-06-01")
        .json(&payload)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        error!(
            "Anthropic API error: status={}, body={}",
            status.as_u16(),
            body.chars().take(500).collect::<String>()
        );
        return Err(LlmError::ApiError {
            status: status.as_u16(),
            message: body,
        });
    }

    parse_response(&body)
}
