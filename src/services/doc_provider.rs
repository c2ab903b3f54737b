//! 文档提供者
//!
//! 给定源文件路径和内容，返回文档正文。两种实现：
//! - `ApiProvider`：直接调用 LLM API
//! - `ManualProvider`：打印 Prompt，由用户把 LLM 的回答粘贴回来

use async_trait::async_trait;
use std::time::Instant;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::config::AppConfig;
use crate::llm::{detect_api_format, ChatMessage, ChatOptions, LlmClient, LlmError};
use crate::services::doc_generator::prompts;
use crate::utils::request_logger::{RequestInfo, RequestLogger};

/// 手动模式下结束输入的标记行
pub const END_MARKER: &str = "END";

/// 文档提供者错误
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("LLM调用错误: {0}")]
    Llm(#[from] LlmError),

    #[error("读写终端失败: {0}")]
    Io(#[from] std::io::Error),

    #[error("未收到任何文档内容")]
    EmptyResponse,
}

/// 文档提供者：给定路径和源码，生成文档文本
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocProvider: Send + Sync {
    async fn generate(&self, file_path: &str, content: &str) -> Result<String, ProviderError>;
}

/// 直接调用 LLM API 的提供者
pub struct ApiProvider {
    client: LlmClient,
    model: String,
    options: ChatOptions,
    logger: Option<RequestLogger>,
}

impl ApiProvider {
    pub fn new(client: LlmClient, model: impl Into<String>, options: ChatOptions) -> Self {
        Self {
            client,
            model: model.into(),
            options,
            logger: None,
        }
    }

    /// 根据配置创建
    pub fn from_config(config: &AppConfig) -> Result<Self, LlmError> {
        let client = LlmClient::new(&config.api_key, &config.base_url, config.timeout_secs)?;
        let options = ChatOptions {
            temperature: Some(config.temperature),
            max_tokens: Some(config.max_tokens),
        };

        let mut provider = Self::new(client, &config.model, options);
        if let Some(path) = &config.request_log {
            provider = provider.with_request_logger(RequestLogger::new(path));
        }
        Ok(provider)
    }

    /// 记录每次请求到 JSONL 日志
    pub fn with_request_logger(mut self, logger: RequestLogger) -> Self {
        self.logger = Some(logger);
        self
    }

    #[cfg(test)]
    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl DocProvider for ApiProvider {
    async fn generate(&self, file_path: &str, content: &str) -> Result<String, ProviderError> {
        let prompt = prompts::format_component_doc_prompt(file_path, content);

        let log_entry = self.logger.as_ref().map(|logger| {
            let endpoint = self.client.endpoint_for(&self.model);
            logger.begin(RequestInfo {
                api_format: detect_api_format(&self.model).as_str(),
                endpoint: &endpoint,
                api_key: self.client.api_key(),
                model: &self.model,
                file_path,
                prompt_length: prompt.chars().count(),
            })
        });

        let messages = vec![ChatMessage::system(prompts::SYSTEM_PROMPT), ChatMessage::user(prompt)];
        let start = Instant::now();
        let result = self
            .client
            .complete(messages, &self.model, self.options.clone())
            .await;

        if let (Some(logger), Some(entry)) = (&self.logger, log_entry) {
            match &result {
                Ok(r) => logger.log_success(entry, start, r.content.len()),
                Err(e) => logger.log_error(entry, start, e),
            }
        }

        let result = result?;
        info!(
            "Documentation received for {} ({} chars, finish_reason={:?})",
            file_path,
            result.content.chars().count(),
            result.finish_reason
        );
        Ok(result.content)
    }
}

/// 手动模式提供者：把 Prompt 写到输出流，从输入流读取回答，直到 `END` 行或 EOF
pub struct ManualProvider<R, W> {
    io: Mutex<(R, W)>,
}

impl ManualProvider<BufReader<Stdin>, Stdout> {
    /// 使用标准输入输出
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> ManualProvider<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            io: Mutex::new((reader, writer)),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> (R, W) {
        self.io.into_inner()
    }
}

/// 手动模式下展示给用户的文本
fn format_manual_request(file_path: &str, prompt: &str) -> String {
    let rule = "=".repeat(72);
    format!(
        "\n{rule}\n📝 {path}\n{rule}\n{prompt}\n{rule}\n请把以上 Prompt 发送给 LLM，然后将回答粘贴到下方，单独一行输入 {end} 结束：\n",
        rule = rule,
        path = file_path,
        prompt = prompt,
        end = END_MARKER,
    )
}

#[async_trait]
impl<R, W> DocProvider for ManualProvider<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn generate(&self, file_path: &str, content: &str) -> Result<String, ProviderError> {
        let prompt = prompts::format_component_doc_prompt(file_path, content);

        let mut guard = self.io.lock().await;
        let (reader, writer) = &mut *guard;

        writer
            .write_all(format_manual_request(file_path, &prompt).as_bytes())
            .await?;
        writer.flush().await?;

        let mut lines = Vec::new();
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line).await? == 0 {
                debug!("Input closed while collecting documentation for {}", file_path);
                break;
            }

            let text = line.trim_end_matches(&['\r', '\n'][..]);
            if text.trim() == END_MARKER {
                break;
            }
            lines.push(text.to_string());
        }

        let documentation = lines.join("\n");
        if documentation.trim().is_empty() {
            return Err(ProviderError::EmptyResponse);
        }

        Ok(documentation)
    }
}
