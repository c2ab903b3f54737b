//! 文档生成调度器
//!
//! 按输入顺序逐个处理文件：存在性检查 → 分类 → 跳过或生成 → 汇总报告 → 重建索引。
//! 单个文件的任何错误都只记录为失败，不会中断后续文件。

use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::{error, info, warn};

use super::generator::{DocumentGenerator, GeneratorError};
use super::index::rebuild_index;
use super::types::{DocGenConfig, FileJob, RunReport, RunResult};
use crate::services::doc_provider::DocProvider;

/// 文档生成服务
pub struct DocGenService {
    generator: DocumentGenerator,
    provider: Arc<dyn DocProvider>,
    index_name: String,
}

impl DocGenService {
    /// 创建新的文档生成服务
    pub fn new(config: &DocGenConfig, provider: Arc<dyn DocProvider>) -> Self {
        Self {
            generator: DocumentGenerator::new(&config.docs_dir),
            provider,
            index_name: config.index_name.clone(),
        }
    }

    pub fn docs_root(&self) -> &Path {
        self.generator.docs_root()
    }

    /// 处理一批文件并在需要时重建索引
    pub async fn process_files<P: AsRef<Path>>(&self, files: &[P], force: bool) -> RunReport {
        info!("Processing {} file(s), force={}", files.len(), force);

        let mut results = Vec::with_capacity(files.len());
        for (i, file) in files.iter().enumerate() {
            let path = file.as_ref();
            info!("[{}/{}] {}", i + 1, files.len(), path.display());
            results.push(self.process_file(path, force).await);
        }

        let mut report = RunReport::new(results);
        info!(
            "Run finished: {} generated, {} skipped, {} failed",
            report.generated().len(),
            report.skipped().len(),
            report.failed().len()
        );

        if report.should_rebuild_index() {
            match rebuild_index(self.generator.docs_root(), &self.index_name).await {
                Ok(index_path) => report.index_path = index_path,
                Err(e) => error!("Failed to rebuild index: {}", e),
            }
        } else {
            warn!("No documentation produced or confirmed, index not rebuilt");
        }

        report
    }

    /// 处理单个文件，错误被转换为失败结果
    pub async fn process_file(&self, path: &Path, force: bool) -> RunResult {
        match self.try_process_file(path, force).await {
            Ok(result) => result,
            Err(e) => {
                error!("Failed to document {}: {}", path.display(), e);
                RunResult::failed(path, e.to_string())
            }
        }
    }

    async fn try_process_file(&self, path: &Path, force: bool) -> Result<RunResult, GeneratorError> {
        if !fs::try_exists(path).await.unwrap_or(false) {
            return Err(GeneratorError::NotFound(path.to_path_buf()));
        }

        let job: FileJob = self.generator.prepare_job(path).await;
        info!(
            "Category: {} -> {}",
            job.category,
            job.output_path.display()
        );

        self.generator.ensure_output_dir(&job).await?;

        if job.exists && !force {
            info!("Skipping existing document: {}", job.output_path.display());
            return Ok(RunResult::skipped(job));
        }

        let output_path = self.generator.generate(&job, self.provider.as_ref()).await?;
        info!("Document generated: {}", output_path.display());
        Ok(RunResult::generated(job))
    }
}
