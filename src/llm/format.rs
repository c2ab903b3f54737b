//! API 格式检测和 URL 构建工具

use serde::{Deserialize, Serialize};

/// API 格式枚举
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ApiFormat {
    /// OpenAI Chat Completions API
    OpenAi,
    /// Anthropic Messages API
    Anthropic,
}

impl ApiFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApiFormat::OpenAi => "openai",
            ApiFormat::Anthropic => "anthropic",
        }
    }
}

/// 根据模型名称检测 API 格式
///
/// 规则：模型名包含 "claude" 则使用 Anthropic 格式，否则使用 OpenAI 格式
pub fn detect_api_format(model: &str) -> ApiFormat {
    if model.to_lowercase().contains("claude") {
        ApiFormat::Anthropic
    } else {
        ApiFormat::OpenAi
    }
}

/// 修复 base_url
///
/// - 去除首尾空白和末尾斜杠
/// - 修复双斜杠（保留协议部分）
pub fn fix_base_url(base_url: &str) -> String {
    let url = base_url.trim().trim_end_matches('/');

    match url.find("://") {
        Some(pos) => {
            let (protocol, rest) = url.split_at(pos + 3);
            let mut fixed = rest.to_string();
            while fixed.contains("//") {
                fixed = fixed.replace("//", "/");
            }
            format!("{}{}", protocol, fixed)
        }
        None => url.to_string(),
    }
}

/// 根据 API 格式构建端点
pub fn build_endpoint(format: ApiFormat, base_url: &str) -> String {
    let (full_suffix, short_suffix) = match format {
        ApiFormat::OpenAi => ("/chat/completions", "/v1/chat/completions"),
        ApiFormat::Anthropic => ("/messages", "/v1/messages"),
    };

    let url = fix_base_url(base_url);
    if url.ends_with(full_suffix) {
        url
    } else if url.ends_with("/v1") {
        format!("{}{}", url, full_suffix)
    } else {
        format!("{}{}", url, short_suffix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_api_format() {
        assert_eq!(detect_api_format("gpt-4o"), ApiFormat::OpenAi);
        assert_eq!(detect_api_format("deepseek-chat"), ApiFormat::OpenAi);
        assert_eq!(detect_api_format("claude-sonnet-4-20250514"), ApiFormat::Anthropic);
        assert_eq!(detect_api_format("Claude-3-Opus"), ApiFormat::Anthropic);
    }

    #[test]
    fn test_fix_base_url() {
        assert_eq!(fix_base_url("https://api.openai.com/"), "https://api.openai.com");
        assert_eq!(fix_base_url("https://api.openai.com//v1"), "https://api.openai.com/v1");
        assert_eq!(fix_base_url(" http://localhost:8080/// "), "http://localhost:8080");
    }

    #[test]
    fn test_build_openai_endpoint() {
        assert_eq!(
            build_endpoint(ApiFormat::OpenAi, "https://api.openai.com"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            build_endpoint(ApiFormat::OpenAi, "https://api.openai.com/v1"),
            "https://api.openai.com/v1/chat/completions"
        );
        assert_eq!(
            build_endpoint(ApiFormat::OpenAi, "https://api.openai.com/v1/chat/completions"),
            "https://api.openai.com/v1/chat/completions"
        );
    }

    #[test]
    fn test_build_anthropic_endpoint() {
        assert_eq!(
            build_endpoint(ApiFormat::Anthropic, "https://api.anthropic.com"),
            "https://api.anthropic.com/v1/messages"
        );
        assert_eq!(
            build_endpoint(ApiFormat::Anthropic, "https://api.anthropic.com/v1/"),
            "https://api.anthropic.com/v1/messages"
        );
    }
}
