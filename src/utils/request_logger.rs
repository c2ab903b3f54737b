//! LLM 请求日志记录器
//!
//! 把每次文档生成的 LLM 调用追加到 JSONL 文件，便于排查失败的文件和统计耗时。

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing::warn;
use uuid::Uuid;

use crate::llm::LlmError;

/// 请求日志条目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    /// 请求 ID
    pub request_id: String,
    /// 时间戳
    pub timestamp: DateTime<Utc>,
    /// API 格式
    pub api_format: String,
    /// 端点 URL
    pub endpoint: String,
    /// API 密钥（脱敏）
    pub api_key_masked: String,
    /// 模型名称
    pub model: String,
    /// 被文档化的源文件
    pub file_path: String,
    /// Prompt 长度（字符）
    pub prompt_length: usize,
    /// 状态: pending / success / error
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_length: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
}

/// 创建日志条目所需的请求信息
pub struct RequestInfo<'a> {
    pub api_format: &'a str,
    pub endpoint: &'a str,
    pub api_key: &'a str,
    pub model: &'a str,
    pub file_path: &'a str,
    pub prompt_length: usize,
}

/// 请求日志记录器
pub struct RequestLogger {
    log_path: PathBuf,
    max_entries: usize,
    file: Mutex<Option<File>>,
}

impl RequestLogger {
    /// 创建新的日志记录器
    pub fn new(log_path: impl Into<PathBuf>) -> Self {
        let log_path = log_path.into();

        if let Some(parent) = log_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!("Failed to create request log directory {}: {}", parent.display(), e);
            }
        }

        Self {
            log_path,
            max_entries: 1000,
            file: Mutex::new(None),
        }
    }

    /// 设置最多保留的条目数
    #[cfg(test)]
    pub fn with_max_entries(mut self, max_entries: usize) -> Self {
        self.max_entries = max_entries.max(1);
        self
    }

    #[cfg(test)]
    pub fn log_path(&self) -> &std::path::Path {
        &self.log_path
    }

    /// 生成请求 ID
    pub fn generate_request_id() -> String {
        Uuid::new_v4().simple().to_string()[..8].to_string()
    }

    /// API 密钥脱敏
    pub fn mask_api_key(api_key: &str) -> String {
        let chars: Vec<char> = api_key.chars().collect();
        if chars.len() <= 8 {
            "*".repeat(chars.len())
        } else {
            let head: String = chars[..4].iter().collect();
            let tail: String = chars[chars.len() - 4..].iter().collect();
            format!("{}...{}", head, tail)
        }
    }

    /// 按字符截断
    fn truncate(s: &str, max_chars: usize) -> String {
        match s.char_indices().nth(max_chars) {
            Some((idx, _)) => format!("{}...", &s[..idx]),
            None => s.to_string(),
        }
    }

    /// 创建处于 pending 状态的日志条目
    pub fn begin(&self, info: RequestInfo<'_>) -> LogEntry {
        LogEntry {
            request_id: Self::generate_request_id(),
            timestamp: Utc::now(),
            api_format: info.api_format.to_string(),
            endpoint: info.endpoint.to_string(),
            api_key_masked: Self::mask_api_key(info.api_key),
            model: info.model.to_string(),
            file_path: info.file_path.to_string(),
            prompt_length: info.prompt_length,
            status: "pending".to_string(),
            duration_ms: None,
            response_length: None,
            error_type: None,
            error_message: None,
            status_code: None,
        }
    }

    /// 记录成功
    pub fn log_success(&self, mut entry: LogEntry, start_time: Instant, response_length: usize) {
        entry.status = "success".to_string();
        entry.duration_ms = Some(start_time.elapsed().as_millis() as u64);
        entry.response_length = Some(response_length);
        self.write_entry(&entry);
    }

    /// 记录错误
    pub fn log_error(&self, mut entry: LogEntry, start_time: Instant, error: &LlmError) {
        entry.status = "error".to_string();
        entry.duration_ms = Some(start_time.elapsed().as_millis() as u64);
        entry.error_type = Some(error.kind().to_string());
        entry.error_message = Some(Self::truncate(&error.to_string(), 500));
        entry.status_code = error.status_code();
        self.write_entry(&entry);
    }

    /// 写入日志条目（写失败只告警，不影响文档生成）
    fn write_entry(&self, entry: &LogEntry) {
        let mut file_guard = self.file.lock();

        if file_guard.is_none() {
            match OpenOptions::new().create(true).append(true).open(&self.log_path) {
                Ok(f) => *file_guard = Some(f),
                Err(e) => {
                    warn!("Failed to open request log {}: {}", self.log_path.display(), e);
                    return;
                }
            }
        }

        if let Some(file) = file_guard.as_mut() {
            if let Ok(json) = serde_json::to_string(entry) {
                let _ = writeln!(file, "{}", json);
                let _ = file.flush();
            }
        }

        // 截断会重建文件，需要先丢弃已打开的句柄
        if self.cleanup_if_needed() {
            *file_guard = None;
        }
    }

    /// 超过上限时只保留最新的条目，返回是否重写了文件
    fn cleanup_if_needed(&self) -> bool {
        let Ok(file) = File::open(&self.log_path) else {
            return false;
        };

        let lines: Vec<String> = BufReader::new(file).lines().map_while(Result::ok).collect();
        if lines.len() <= self.max_entries {
            return false;
        }

        let keep_lines = &lines[lines.len() - self.max_entries..];
        match File::create(&self.log_path) {
            Ok(mut file) => {
                for line in keep_lines {
                    let _ = writeln!(file, "{}", line);
                }
                true
            }
            Err(e) => {
                warn!("Failed to trim request log: {}", e);
                false
            }
        }
    }
}
