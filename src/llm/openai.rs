//! OpenAI Chat Completions API 实现

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use super::format::{build_endpoint, ApiFormat};
use super::types::{ChatMessage, ChatOptions, CompletionResult, LlmError};

/// OpenAI 请求载荷
#[derive(Serialize)]
struct OpenAiRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

/// OpenAI 响应体
#[derive(Deserialize, Debug)]
struct OpenAiResponse {
    #[serde(default)]
    choices: Vec<OpenAiChoice>,
}

#[derive(Deserialize, Debug)]
struct OpenAiChoice {
    message: OpenAiMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
struct OpenAiMessage {
    content: Option<String>,
}

/// 解析 OpenAI 响应，取第一个 choice
fn parse_response(body: &str) -> Result<CompletionResult, LlmError> {
    let response: OpenAiResponse = serde_json::from_str(body)?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or(LlmError::EmptyResponse)?;

    match choice.message.content {
        Some(content) if !content.is_empty() => Ok(CompletionResult {
            content,
            finish_reason: choice.finish_reason,
        }),
        _ => Err(LlmError::EmptyResponse),
    }
}

/// 调用 OpenAI 兼容 API
pub async fn complete_openai(
    client: &Client,
    api_key: &str,
    base_url: &str,
    messages: Vec<ChatMessage>,
    model: &str,
    options: &ChatOptions,
) -> Result<CompletionResult, LlmError> {
    let endpoint = build_endpoint(ApiFormat::OpenAi, base_url);
    let payload = OpenAiRequest {
        model,
        messages,
        stream: false,
        temperature: options.temperature,
        max_tokens: options.max_tokens,
    };

    debug!("OpenAI API request: endpoint={}, model={}", endpoint, model);

    let response = client
        .post(&endpoint)
        .bearer_auth(api_key)
        .json(&payload)
        .send()
        .await?;

    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        error!(
            "OpenAI API error: status={}, body={}",
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_response() {
        let body = r##"{
            "id": "chatcmpl-1",
            "choices": [
                {"index": 0, "message": {"role": "assistant", "content": "# Hook docs"}, "finish_reason": "stop"}
            ]
        }"##;

        let result = parse_response(body).unwrap();
        assert_eq!(result.content, "# Hook docs");
        assert_eq!(result.finish_reason.as_deref(), Some("stop"));
    }

    #[test]
    fn test_parse_response_no_choices() {
        assert!(matches!(
            parse_response(r#"{"choices": []}"#),
            Err(LlmError::EmptyResponse)
        ));
        assert!(matches!(
            parse_response(r#"{"choices": [{"message": {"content": null}, "finish_reason": "length"}]}"#),
            Err(LlmError::EmptyResponse)
        ));
    }

    #[test]
    fn test_parse_response_invalid_json() {
        assert!(matches!(parse_response("not json"), Err(LlmError::JsonError(_))));
    }
}
