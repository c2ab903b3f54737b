//! 源码扫描器
//!
//! 递归扫描源码目录，收集需要生成文档的文件

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use super::types::DocGenConfig;

/// 源码扫描器
pub struct SourceScanner {
    config: DocGenConfig,
    /// 编译后的忽略模式（glob patterns）
    ignore_patterns: Vec<glob::Pattern>,
}

impl SourceScanner {
    /// 创建新的扫描器
    pub fn new(config: DocGenConfig) -> Self {
        let ignore_patterns = config
            .ignore_patterns
            .iter()
            .filter_map(|p| match glob::Pattern::new(p) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!("Invalid ignore pattern '{}': {}", p, e);
                    None
                }
            })
            .collect();

        Self {
            config,
            ignore_patterns,
        }
    }

    /// 扫描目录，返回按路径排序的源文件列表
    pub fn scan(&self, root_path: &Path) -> Result<Vec<PathBuf>, ScanError> {
        if !root_path.exists() {
            return Err(ScanError::PathNotFound(root_path.to_path_buf()));
        }

        if !root_path.is_dir() {
            return Err(ScanError::NotADirectory(root_path.to_path_buf()));
        }

        info!("Scanning source directory: {}", root_path.display());

        let mut files = Vec::new();
        let walker = WalkDir::new(root_path)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| entry.depth() == 0 || !self.should_ignore(entry));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Failed to read entry under {}: {}", root_path.display(), e);
                    continue;
                }
            };

            if entry.file_type().is_file() && self.is_supported_file(entry.path()) {
                files.push(entry.into_path());
            }
        }

        files.sort();
        info!("Scan completed: {} source files", files.len());
        Ok(files)
    }

    /// 检查是否应该忽略该条目
    fn should_ignore(&self, entry: &DirEntry) -> bool {
        let name = entry.file_name().to_string_lossy();

        // 忽略隐藏文件/目录（以 . 开头）
        if name.starts_with('.') {
            debug!("Ignoring hidden entry: {}", entry.path().display());
            return true;
        }

        if self.ignore_patterns.iter().any(|p| p.matches(&name)) {
            debug!("Ignoring: {}", entry.path().display());
            return true;
        }

        false
    }

    /// 检查是否是支持的文件类型
    fn is_supported_file(&self, path: &Path) -> bool {
        path.extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .is_some_and(|ext| self.config.supported_extensions.contains(&ext))
    }
}

/// 扫描错误类型
#[derive(Debug, thiserror::Error)]
pub enum ScanError {
    #[error("路径不存在: {}", .0.display())]
    PathNotFound(PathBuf),

    #[error("路径不是目录: {}", .0.display())]
    NotADirectory(PathBuf),
}
