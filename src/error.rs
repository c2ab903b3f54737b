//! 统一错误处理模块
//!
//! 定义顶层应用错误。单个文件的处理错误在 `doc_generator` 内部被降级为失败记录，
//! 只有配置错误、源码目录不存在等才会经由这里终止进程。

use std::path::PathBuf;
use thiserror::Error;

/// 应用错误枚举
#[derive(Error, Debug)]
pub enum AppError {
    /// 配置相关错误
    #[error("配置错误: {0}")]
    Config(String),

    /// 资源未找到
    #[error("未找到: {}", .0.display())]
    NotFound(PathBuf),

    /// 源码扫描错误
    #[error("扫描错误: {0}")]
    Scan(#[from] crate::services::doc_generator::ScanError),
}

/// 便捷类型别名
pub type AppResult<T> = Result<T, AppError>;
