//! LLM 模块
//!
//! 提供统一的 LLM 客户端，支持 OpenAI 和 Anthropic API 格式。
//! 文档生成只需要一次请求对应一次完整响应，因此这里不做流式处理。

mod anthropic;
mod client;
mod format;
mod openai;
mod types;

pub use client::LlmClient;
pub use format::detect_api_format;
pub use types::*;
