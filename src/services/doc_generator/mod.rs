//! 文档生成器模块
//!
//! 基于 LLM 为前端源码文件生成分类文档
//!
//! # 功能
//!
//! - 按路径规则把源文件归类（components / hooks / api ...）
//! - 已有文档默认跳过，`force` 时重新生成
//! - 单个文件失败不影响整批处理
//! - 每次运行后根据 `docs/` 实际内容重建索引
//!
//! # 使用示例
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! let config = AppConfig::load(None)?;
//! let provider = Arc::new(ApiProvider::from_config(&config)?);
//! let service = DocGenService::new(&config.docs, provider);
//!
//! let report = service.process_files(&["src/components/Card.tsx"], false).await;
//! println!("{}", report.render_summary());
//! ```

pub mod classifier;
mod generator;
pub mod index;
mod processor;
pub mod prompts;
mod scanner;
pub mod types;

pub use processor::DocGenService;
pub use scanner::{ScanError, SourceScanner};
pub use types::DocGenConfig;
