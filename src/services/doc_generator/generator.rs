//! 文档生成器
//!
//! 负责计算文档路径、调用文档提供者并把结果保存到文件

use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::classifier::classify_path;
use super::types::FileJob;
use crate::services::doc_provider::{DocProvider, ProviderError};

/// 文档生成器
pub struct DocumentGenerator {
    /// 文档根目录
    docs_root: PathBuf,
    /// 分类前从源路径中去掉的前缀（进程工作目录）
    base_dir: Option<PathBuf>,
}

impl DocumentGenerator {
    /// 创建新的文档生成器
    pub fn new(docs_root: impl Into<PathBuf>) -> Self {
        Self {
            docs_root: docs_root.into(),
            base_dir: std::env::current_dir().ok(),
        }
    }

    /// 指定分类时相对的项目目录
    #[cfg(test)]
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    /// 获取文档根目录
    pub fn docs_root(&self) -> &Path {
        &self.docs_root
    }

    /// 分类对应的输出目录
    ///
    /// 例如: components -> docs_root/components
    pub fn get_category_dir(&self, category: &str) -> PathBuf {
        self.docs_root.join(category)
    }

    /// 获取文件的文档路径，只取决于源路径和分类规则
    ///
    /// 例如: src/components/Card.tsx -> docs_root/components/Card.md
    pub fn get_doc_path(&self, source: &Path, category: &str) -> PathBuf {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "index".to_string());

        self.get_category_dir(category).join(format!("{}.md", stem))
    }

    /// 参与分类的路径：位于项目目录下时取相对路径，否则原样返回
    ///
    /// 例如: /work/api/shop/src/weird/Thing.js -> src/weird/Thing.js
    pub fn classification_path<'a>(&self, source: &'a Path) -> &'a Path {
        self.base_dir
            .as_deref()
            .and_then(|base| source.strip_prefix(base).ok())
            .unwrap_or(source)
    }

    /// 为源文件构建任务（分类 + 输出路径 + 是否已存在）
    pub async fn prepare_job(&self, source: &Path) -> FileJob {
        let category = classify_path(self.classification_path(source));
        let output_path = self.get_doc_path(source, &category);
        let exists = fs::try_exists(&output_path).await.unwrap_or(false);

        FileJob {
            source_path: source.to_path_buf(),
            category,
            output_path,
            exists,
        }
    }

    /// 确保任务的输出目录存在
    pub async fn ensure_output_dir(&self, job: &FileJob) -> Result<(), GeneratorError> {
        let dir = self.get_category_dir(&job.category);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| GeneratorError::IoError(dir, e))
    }

    /// 读取源码，调用文档提供者，并把返回内容原样写入输出路径
    pub async fn generate(
        &self,
        job: &FileJob,
        provider: &dyn DocProvider,
    ) -> Result<PathBuf, GeneratorError> {
        let content = fs::read_to_string(&job.source_path)
            .await
            .map_err(|e| GeneratorError::IoError(job.source_path.clone(), e))?;

        let display_path = job.source_path.to_string_lossy().replace('\\', "/");
        let documentation = provider.generate(&display_path, &content).await?;

        self.save_document(&job.output_path, &documentation).await?;
        debug!("Document saved: {}", job.output_path.display());
        Ok(job.output_path.clone())
    }

    /// 保存文档到文件（覆盖已有内容）
    async fn save_document(&self, path: &Path, content: &str) -> Result<(), GeneratorError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| GeneratorError::IoError(parent.to_path_buf(), e))?;
        }

        let mut file = fs::File::create(path)
            .await
            .map_err(|e| GeneratorError::IoError(path.to_path_buf(), e))?;

        file.write_all(content.as_bytes())
            .await
            .map_err(|e| GeneratorError::IoError(path.to_path_buf(), e))?;

        file.flush()
            .await
            .map_err(|e| GeneratorError::IoError(path.to_path_buf(), e))?;

        Ok(())
    }
}

/// 生成器错误类型
#[derive(Debug, thiserror::Error)]
pub enum GeneratorError {
    #[error("文件不存在: {}", .0.display())]
    NotFound(PathBuf),

    #[error("IO错误 ({}): {}", .0.display(), .1)]
    IoError(PathBuf, #[source] std::io::Error),

    #[error("文档生成失败: {0}")]
    Provider(#[from] ProviderError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::doc_provider::MockDocProvider;
    use tempfile::TempDir;

    #[test]
    fn test_get_doc_path() {
        let generator = DocumentGenerator::new("/docs");

        assert_eq!(
            generator.get_doc_path(Path::new("src/components/Card.tsx"), "components"),
            PathBuf::from("/docs/components/Card.md")
        );
        assert_eq!(
            generator.get_doc_path(Path::new("src/utils/date.test.ts"), "utils"),
            PathBuf::from("/docs/utils/date.test.md")
        );
    }

    #[tokio::test]
    async fn test_prepare_job_is_deterministic() {
        let dir = TempDir::new().unwrap();
        let generator = DocumentGenerator::new(dir.path().join("docs"));

        let first = generator.prepare_job(Path::new("src/weird/Thing.js")).await;
        let second = generator.prepare_job(Path::new("src/weird/Thing.js")).await;

        assert_eq!(first, second);
        assert_eq!(first.category, "weird");
        assert_eq!(first.output_path, dir.path().join("docs/weird/Thing.md"));
        assert!(!first.exists);
    }

    #[test]
    fn test_classification_path_strips_base_dir() {
        let generator = DocumentGenerator::new("/docs").with_base_dir("/home/me/api/shop");

        assert_eq!(
            generator.classification_path(Path::new("/home/me/api/shop/src/weird/Thing.js")),
            Path::new("src/weird/Thing.js")
        );
        assert_eq!(
            generator.classification_path(Path::new("src/weird/Thing.js")),
            Path::new("src/weird/Thing.js")
        );
        // 项目目录之外的路径保持不变
        assert_eq!(
            generator.classification_path(Path::new("/opt/lib/index.ts")),
            Path::new("/opt/lib/index.ts")
        );
    }

    #[tokio::test]
    async fn test_prepare_job_ignores_directories_above_project() {
        let dir = TempDir::new().unwrap();
        let generator = DocumentGenerator::new(dir.path().join("docs")).with_base_dir("/app");

        let error_ts = generator.prepare_job(Path::new("/app/src/error.ts")).await;
        assert_eq!(error_ts.category, "general");
        assert_eq!(error_ts.output_path, dir.path().join("docs/general/error.md"));

        let generator = DocumentGenerator::new(dir.path().join("docs"))
            .with_base_dir("/home/me/lib/proj");
        let index = generator
            .prepare_job(Path::new("/home/me/lib/proj/src/index.ts"))
            .await;
        assert_eq!(index.category, "general");
    }

    #[tokio::test]
    async fn test_absolute_and_relative_sources_share_output() {
        let dir = TempDir::new().unwrap();
        let generator = DocumentGenerator::new(dir.path().join("docs"));
        let cwd = std::env::current_dir().unwrap();

        let relative = generator.prepare_job(Path::new("src/weird/Thing.js")).await;
        let absolute = generator.prepare_job(&cwd.join("src/weird/Thing.js")).await;

        assert_eq!(relative.category, "weird");
        assert_eq!(absolute.category, "weird");
        assert_eq!(relative.output_path, dir.path().join("docs/weird/Thing.md"));
        assert_eq!(absolute.output_path, relative.output_path);
    }

    #[tokio::test]
    async fn test_prepare_job_detects_existing_output() {
        let dir = TempDir::new().unwrap();
        let generator = DocumentGenerator::new(dir.path().join("docs"));
        std::fs::create_dir_all(dir.path().join("docs/hooks")).unwrap();
        std::fs::write(dir.path().join("docs/hooks/useCart.md"), "old").unwrap();

        let job = generator.prepare_job(Path::new("src/hooks/useCart.ts")).await;
        assert!(job.exists);
    }

    #[tokio::test]
    async fn test_generate_writes_provider_output_verbatim() {
        let dir = TempDir::new().unwrap();
        let source = dir.path().join("src/components/Card.tsx");
        std::fs::create_dir_all(source.parent().unwrap()).unwrap();
        std::fs::write(&source, "export const Card = 1;").unwrap();

        let generator = DocumentGenerator::new(dir.path().join("docs"));
        let job = generator.prepare_job(&source).await;
        generator.ensure_output_dir(&job).await.unwrap();

        let mut provider = MockDocProvider::new();
        provider
            .expect_generate()
            .withf(|path, content| path.ends_with("components/Card.tsx") && content.contains("Card = 1"))
            .times(1)
            .returning(|_, _| Ok("# Card\n\n正文".to_string()));

        let written = generator.generate(&job, &provider).await.unwrap();
        assert_eq!(written, dir.path().join("docs/components/Card.md"));
        assert_eq!(std::fs::read_to_string(written).unwrap(), "# Card\n\n正文");
    }
}
