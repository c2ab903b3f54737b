//! 应用配置管理
//!
//! 配置在进程启动时构建一次：配置文件 → 环境变量 → 命令行覆盖，
//! 之后以不可变引用的形式传给文档生成器和 LLM 调用方。

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::error::{AppError, AppResult};
use crate::services::doc_generator::types::DocGenConfig;

/// 默认配置文件名（位于当前工作目录）
pub const DEFAULT_CONFIG_FILE: &str = "docs-gen.json";

/// 文档内容的获取方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderMode {
    /// 打印 Prompt，由用户手动粘贴 LLM 的回答
    #[default]
    Manual,
    /// 直接调用 LLM API
    Api,
}

/// 应用配置结构体
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// LLM API 密钥
    #[serde(default)]
    pub api_key: String,

    /// LLM API 基础 URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// 模型名称
    #[serde(default = "default_model")]
    pub model: String,

    /// 温度参数 (0.0 - 2.0)
    #[serde(default = "default_temperature")]
    pub temperature: f64,

    /// 最大 token 数
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// 请求超时（秒）
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// 文档内容获取方式
    #[serde(default)]
    pub provider: ProviderMode,

    /// LLM 请求日志路径（JSONL），为空则不记录
    #[serde(default)]
    pub request_log: Option<PathBuf>,

    /// 文档生成配置
    #[serde(default)]
    pub docs: DocGenConfig,
}

fn default_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_model() -> String {
    "claude-sonnet-4-20250514".to_string()
}

fn default_temperature() -> f64 {
    0.3
}

fn default_max_tokens() -> u32 {
    4096
}

fn default_timeout_secs() -> u64 {
    120
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_timeout_secs(),
            provider: ProviderMode::default(),
            request_log: None,
            docs: DocGenConfig::default(),
        }
    }
}

impl AppConfig {
    /// 加载配置
    ///
    /// 显式指定的配置文件必须存在；未指定时尝试读取工作目录下的 `docs-gen.json`，
    /// 不存在则使用默认值。最后应用环境变量覆盖。
    pub fn load(path: Option<&Path>) -> AppResult<Self> {
        let mut config = match path {
            Some(p) => Self::from_file(p)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    debug!("No config file found, using defaults");
                    Self::default()
                }
            }
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// 从 JSON 文件读取配置
    pub fn from_file(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Err(AppError::NotFound(path.to_path_buf()));
        }

        let content = fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("读取配置文件失败 ({}): {}", path.display(), e))
        })?;

        let config: Self = serde_json::from_str(&content)
            .map_err(|e| AppError::Config(format!("解析配置文件失败: {}", e)))?;

        info!("Config loaded from {}", path.display());
        Ok(config)
    }

    /// 应用环境变量覆盖
    ///
    /// API 密钥依次查找 `DOCS_GEN_API_KEY`、`ANTHROPIC_API_KEY`、`OPENAI_API_KEY`。
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("DOCS_GEN_API_KEY")
            .or_else(|| non_empty("ANTHROPIC_API_KEY"))
            .or_else(|| non_empty("OPENAI_API_KEY"))
        {
            self.api_key = key;
        }

        if let Some(model) = non_empty("DOCS_GEN_MODEL") {
            self.model = model;
        }

        if let Some(base_url) = non_empty("DOCS_GEN_BASE_URL") {
            self.base_url = base_url;
        }
    }

    /// 校验 API 模式所需的配置
    pub fn validate_for_api(&self) -> AppResult<()> {
        if self.api_key.trim().is_empty() {
            return Err(AppError::Config(
                "API Key 未配置，请设置 DOCS_GEN_API_KEY 或在配置文件中填写 api_key".to_string(),
            ));
        }
        if self.model.trim().is_empty() {
            return Err(AppError::Config("模型名称不能为空".to_string()));
        }
        Ok(())
    }
}
