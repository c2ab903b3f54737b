//! 文档生成器类型定义
//!
//! 定义生成配置、单文件任务以及运行报告

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// 文档生成配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocGenConfig {
    /// 文档输出根目录（默认 "docs"）
    #[serde(default = "default_docs_dir")]
    pub docs_dir: PathBuf,

    /// `--all` 时扫描的源码目录（默认 "src"）
    #[serde(default = "default_source_dir")]
    pub source_dir: PathBuf,

    /// 索引文件名（默认 "README.md"）
    #[serde(default = "default_index_name")]
    pub index_name: String,

    /// 扫描时忽略的名称模式（glob）
    #[serde(default = "default_ignore_patterns")]
    pub ignore_patterns: Vec<String>,

    /// 支持的文件扩展名
    #[serde(default = "default_supported_extensions")]
    pub supported_extensions: Vec<String>,
}

fn default_docs_dir() -> PathBuf {
    PathBuf::from("docs")
}

fn default_source_dir() -> PathBuf {
    PathBuf::from("src")
}

fn default_index_name() -> String {
    "README.md".to_string()
}

fn default_ignore_patterns() -> Vec<String> {
    vec!["node_modules".to_string()]
}

fn default_supported_extensions() -> Vec<String> {
    vec![
        "tsx".to_string(),
        "ts".to_string(),
        "jsx".to_string(),
        "js".to_string(),
    ]
}

impl Default for DocGenConfig {
    fn default() -> Self {
        Self {
            docs_dir: default_docs_dir(),
            source_dir: default_source_dir(),
            index_name: default_index_name(),
            ignore_patterns: default_ignore_patterns(),
            supported_extensions: default_supported_extensions(),
        }
    }
}

/// 单个文件的处理任务
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileJob {
    /// 源文件路径
    pub source_path: PathBuf,
    /// 文档分类
    pub category: String,
    /// 文档输出路径
    pub output_path: PathBuf,
    /// 分派时文档是否已存在
    pub exists: bool,
}

/// 单个文件的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// 已生成文档
    Generated { category: String, output_path: PathBuf },
    /// 文档已存在，跳过
    Skipped { category: String, output_path: PathBuf },
    /// 处理失败
    Failed { error: String },
}

/// 带源文件路径的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub source_path: PathBuf,
    pub outcome: RunOutcome,
}

impl RunResult {
    pub fn generated(job: FileJob) -> Self {
        Self {
            source_path: job.source_path,
            outcome: RunOutcome::Generated {
                category: job.category,
                output_path: job.output_path,
            },
        }
    }

    pub fn skipped(job: FileJob) -> Self {
        Self {
            source_path: job.source_path,
            outcome: RunOutcome::Skipped {
                category: job.category,
                output_path: job.output_path,
            },
        }
    }

    pub fn failed(source_path: impl Into<PathBuf>, error: impl Into<String>) -> Self {
        Self {
            source_path: source_path.into(),
            outcome: RunOutcome::Failed {
                error: error.into(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        !matches!(self.outcome, RunOutcome::Failed { .. })
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, RunOutcome::Skipped { .. })
    }

    /// 分类（失败的结果没有分类）
    pub fn category(&self) -> Option<&str> {
        match &self.outcome {
            RunOutcome::Generated { category, .. } | RunOutcome::Skipped { category, .. } => {
                Some(category)
            }
            RunOutcome::Failed { .. } => None,
        }
    }

    pub fn output_path(&self) -> Option<&Path> {
        match &self.outcome {
            RunOutcome::Generated { output_path, .. }
            | RunOutcome::Skipped { output_path, .. } => Some(output_path),
            RunOutcome::Failed { .. } => None,
        }
    }

    /// 源文件名（不含扩展名）
    pub fn basename(&self) -> String {
        self.source_path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.source_path.to_string_lossy().to_string())
    }
}

/// 一次运行的报告，结果顺序与输入顺序一致
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    results: Vec<RunResult>,
    /// 重建后的索引路径（未重建则为 None）
    pub index_path: Option<PathBuf>,
}

impl RunReport {
    pub fn new(results: Vec<RunResult>) -> Self {
        Self {
            results,
            index_path: None,
        }
    }

    #[cfg(test)]
    pub fn results(&self) -> &[RunResult] {
        &self.results
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// 成功且未跳过
    pub fn generated(&self) -> Vec<&RunResult> {
        self.results
            .iter()
            .filter(|r| r.is_success() && !r.is_skipped())
            .collect()
    }

    pub fn skipped(&self) -> Vec<&RunResult> {
        self.results.iter().filter(|r| r.is_skipped()).collect()
    }

    pub fn failed(&self) -> Vec<&RunResult> {
        self.results.iter().filter(|r| !r.is_success()).collect()
    }

    /// 按分类分组的已生成文件名
    pub fn generated_by_category(&self) -> BTreeMap<String, Vec<String>> {
        let mut groups: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for result in self.generated() {
            if let Some(category) = result.category() {
                groups
                    .entry(category.to_string())
                    .or_default()
                    .push(result.basename());
            }
        }
        groups
    }

    /// 只有全部失败或没有输入时才不重建索引
    pub fn should_rebuild_index(&self) -> bool {
        !self.generated().is_empty() || !self.skipped().is_empty()
    }

    /// 终端输出用的汇总文本
    pub fn render_summary(&self) -> String {
        let generated = self.generated();
        let skipped = self.skipped();
        let failed = self.failed();

        let mut out = String::new();
        let _ = writeln!(out, "📊 文档生成结果");
        let _ = writeln!(out, "   ✅ 已生成: {}", generated.len());
        let _ = writeln!(out, "   ⏭️  已跳过: {}", skipped.len());
        let _ = writeln!(out, "   ❌ 失败: {}", failed.len());

        let groups = self.generated_by_category();
        if !groups.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "📁 按分类:");
            for (category, names) in &groups {
                let _ = writeln!(out, "   {} ({}): {}", category, names.len(), names.join(", "));
            }
        }

        if !skipped.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "⏭️  已存在的文档（使用 --force 重新生成）:");
            for result in &skipped {
                if let Some(path) = result.output_path() {
                    let _ = writeln!(out, "   {}", path.display());
                }
            }
        }

        if !failed.is_empty() {
            let _ = writeln!(out);
            let _ = writeln!(out, "❌ 失败的文件:");
            for result in &failed {
                if let RunOutcome::Failed { error } = &result.outcome {
                    let _ = writeln!(out, "   {}: {}", result.source_path.display(), error);
                }
            }
        }

        if let Some(index_path) = &self.index_path {
            let _ = writeln!(out);
            let _ = writeln!(out, "📚 索引已更新: {}", index_path.display());
        }

        out
    }
}
