//! 文档索引
//!
//! 每次运行后根据 `docs/` 目录的实际内容整体重建索引文件，不做增量修改。

use chrono::Local;
use std::fmt::Write as _;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

use super::generator::GeneratorError;

/// 未知分类使用的图标
const DEFAULT_EMOJI: &str = "📁";

/// 分类图标表
const CATEGORY_EMOJIS: &[(&str, &str)] = &[
    ("components", "🧩"),
    ("api", "🔌"),
    ("hooks", "🪝"),
    ("utils", "🔧"),
    ("types", "📐"),
    ("lib", "📚"),
    ("services", "⚙️"),
    ("middleware", "🔀"),
    ("pages", "📄"),
    ("layouts", "🖼️"),
    ("loading", "⏳"),
    ("error", "🚨"),
    ("general", "📝"),
];

/// 索引中的一个分类
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSection {
    pub category: String,
    /// 排序后的 markdown 文件名
    pub files: Vec<String>,
}

/// 查询分类图标
pub fn category_emoji(category: &str) -> &'static str {
    CATEGORY_EMOJIS
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, emoji)| *emoji)
        .unwrap_or(DEFAULT_EMOJI)
}

/// 首字母大写
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// 收集非空分类；文档目录不存在时返回 None
pub async fn collect_sections(docs_root: &Path) -> io::Result<Option<Vec<IndexSection>>> {
    if !fs::try_exists(docs_root).await? {
        return Ok(None);
    }

    let mut categories = Vec::new();
    let mut entries = fs::read_dir(docs_root).await?;
    while let Some(entry) = entries.next_entry().await? {
        if entry.file_type().await?.is_dir() {
            categories.push((entry.file_name().to_string_lossy().to_string(), entry.path()));
        }
    }
    categories.sort();

    let mut sections = Vec::new();
    for (category, dir) in categories {
        let files = list_markdown_files(&dir).await?;
        if files.is_empty() {
            debug!("Skipping empty category: {}", category);
            continue;
        }
        sections.push(IndexSection { category, files });
    }

    Ok(Some(sections))
}

async fn list_markdown_files(dir: &Path) -> io::Result<Vec<String>> {
    let mut files = Vec::new();
    let mut entries = fs::read_dir(dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().to_string();
        if name.ends_with(".md") && entry.file_type().await?.is_file() {
            files.push(name);
        }
    }
    files.sort();
    Ok(files)
}

/// 渲染索引内容；除时间戳外只取决于磁盘上的文档
pub fn render_sections(sections: &[IndexSection], generated_at: &str) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "# 📚 组件文档索引");
    let _ = writeln!(out);
    let _ = writeln!(out, "> 本文档由 docs-gen 自动生成，请勿手动修改。");
    let _ = writeln!(out);

    for section in sections {
        let _ = writeln!(
            out,
            "## {} {}",
            category_emoji(&section.category),
            capitalize(&section.category)
        );
        let _ = writeln!(out);
        for file in &section.files {
            let display = file.strip_suffix(".md").unwrap_or(file);
            let _ = writeln!(out, "- [{}]({}/{})", display, section.category, file);
        }
        let _ = writeln!(out);
    }

    let total_files: usize = sections.iter().map(|s| s.files.len()).sum();
    let _ = writeln!(out, "---");
    let _ = writeln!(out);
    let _ = writeln!(out, "## 📊 统计信息");
    let _ = writeln!(out);
    let _ = writeln!(out, "- 文档总数: {}", total_files);
    let _ = writeln!(out, "- 分类数: {}", sections.len());
    let _ = writeln!(out, "- 生成时间: {}", generated_at);

    out
}

/// 渲染索引；文档目录不存在时返回 None
pub async fn render_index(docs_root: &Path, generated_at: &str) -> io::Result<Option<String>> {
    Ok(collect_sections(docs_root)
        .await?
        .map(|sections| render_sections(&sections, generated_at)))
}

/// 重建索引文件，返回写入的路径；文档目录不存在时什么也不做
pub async fn rebuild_index(
    docs_root: &Path,
    index_name: &str,
) -> Result<Option<PathBuf>, GeneratorError> {
    let now = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

    let content = render_index(docs_root, &now)
        .await
        .map_err(|e| GeneratorError::IoError(docs_root.to_path_buf(), e))?;

    let Some(content) = content else {
        debug!("Docs directory does not exist, index not rebuilt: {}", docs_root.display());
        return Ok(None);
    };

    let index_path = docs_root.join(index_name);
    fs::write(&index_path, content)
        .await
        .map_err(|e| GeneratorError::IoError(index_path.clone(), e))?;

    info!("Index rebuilt: {}", index_path.display());
    Ok(Some(index_path))
}
