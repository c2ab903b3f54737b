//! 命令行入口
//!
//! 解析参数、构建一次性的不可变配置、选择文档提供者并执行生成。

use anyhow::Context;
use clap::{CommandFactory, Parser};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::{AppConfig, ProviderMode};
use crate::error::{AppError, AppResult};
use crate::services::doc_generator::{DocGenConfig, DocGenService, SourceScanner};
use crate::services::{ApiProvider, DocProvider, ManualProvider};

/// 基于 LLM 的组件文档生成器
#[derive(Parser, Debug)]
#[command(
    name = "docs-gen",
    version,
    about = "为源码文件生成分类 Markdown 文档，并重建 docs/README.md 索引"
)]
pub struct Cli {
    /// 只为该文件生成文档
    #[arg(value_name = "FILE", conflicts_with_all = ["all", "dir"])]
    pub file: Option<PathBuf>,

    /// 扫描默认源码目录（配置项 docs.source_dir，默认 src）下的所有文件
    #[arg(long, conflicts_with = "dir")]
    pub all: bool,

    /// 扫描指定目录下的所有文件
    #[arg(long, value_name = "PATH")]
    pub dir: Option<PathBuf>,

    /// 即使文档已存在也重新生成
    #[arg(long)]
    pub force: bool,

    /// 直接调用 LLM API（默认是手动粘贴模式）
    #[arg(long)]
    pub api: bool,

    /// 配置文件路径（默认读取当前目录下的 docs-gen.json）
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// 文档输出目录
    #[arg(long, value_name = "PATH")]
    pub docs_dir: Option<PathBuf>,

    /// 模型名称
    #[arg(long, value_name = "NAME")]
    pub model: Option<String>,

    /// 输出调试日志
    #[arg(short, long)]
    pub verbose: bool,
}

/// 本次运行要处理的文件来源
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    File(PathBuf),
    Dir(PathBuf),
    All,
}

impl Cli {
    /// 没有指定任何目标时返回 None（打印帮助）
    pub fn target(&self) -> Option<Target> {
        if let Some(file) = &self.file {
            Some(Target::File(file.clone()))
        } else if let Some(dir) = &self.dir {
            Some(Target::Dir(dir.clone()))
        } else if self.all {
            Some(Target::All)
        } else {
            None
        }
    }
}

/// 加载配置并应用命令行覆盖，返回后不再修改
pub fn build_config(cli: &Cli) -> AppResult<AppConfig> {
    let mut config = AppConfig::load(cli.config.as_deref())?;

    if let Some(docs_dir) = &cli.docs_dir {
        config.docs.docs_dir = docs_dir.clone();
    }
    if let Some(model) = &cli.model {
        config.model = model.clone();
    }
    if cli.api {
        config.provider = ProviderMode::Api;
    }

    if config.provider == ProviderMode::Api {
        config.validate_for_api()?;
    }

    Ok(config)
}

/// 根据目标收集待处理文件
pub fn collect_files(target: &Target, docs: &DocGenConfig) -> AppResult<Vec<PathBuf>> {
    let root = match target {
        Target::File(file) => return Ok(vec![file.clone()]),
        Target::Dir(dir) => dir,
        Target::All => &docs.source_dir,
    };

    if !root.exists() {
        return Err(AppError::NotFound(root.clone()));
    }

    Ok(SourceScanner::new(docs.clone()).scan(root)?)
}

/// 根据配置选择文档提供者
fn create_provider(config: &AppConfig) -> anyhow::Result<Arc<dyn DocProvider>> {
    let provider: Arc<dyn DocProvider> = match config.provider {
        ProviderMode::Api => {
            info!("Using API provider: model={}", config.model);
            Arc::new(ApiProvider::from_config(config).context("创建 LLM 客户端失败")?)
        }
        ProviderMode::Manual => {
            info!("Using manual provider");
            Arc::new(ManualProvider::stdio())
        }
    };
    Ok(provider)
}

/// 执行命令
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let Some(target) = cli.target() else {
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let config = build_config(&cli)?;
    let files = collect_files(&target, &config.docs)?;

    if files.is_empty() {
        warn!("No source files found for {:?}", target);
        println!("未找到需要生成文档的源文件");
        return Ok(());
    }

    let provider = create_provider(&config)?;
    let service = DocGenService::new(&config.docs, provider);

    println!(
        "🚀 开始生成文档: {} 个文件 → {}",
        files.len(),
        service.docs_root().display()
    );
    let report = service.process_files(&files, cli.force).await;
    println!("\n{}", report.render_summary());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("docs-gen").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_targets() {
        assert_eq!(parse(&[]).target(), None);
        assert_eq!(
            parse(&["src/components/Card.tsx"]).target(),
            Some(Target::File(PathBuf::from("src/components/Card.tsx")))
        );
        assert_eq!(parse(&["--all", "--force"]).target(), Some(Target::All));
        assert_eq!(
            parse(&["--dir", "src/hooks", "--api"]).target(),
            Some(Target::Dir(PathBuf::from("src/hooks")))
        );
    }

    #[test]
    fn test_flags() {
        let cli = parse(&["--all", "--force", "--api", "--model", "gpt-4o"]);
        assert!(cli.force);
        assert!(cli.api);
        assert_eq!(cli.model.as_deref(), Some("gpt-4o"));
    }

    #[test]
    fn test_conflicting_targets_rejected() {
        assert!(Cli::try_parse_from(["docs-gen", "a.ts", "--all"]).is_err());
        assert!(Cli::try_parse_from(["docs-gen", "--all", "--dir", "src"]).is_err());
    }

    #[test]
    fn test_build_config_applies_overrides() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("docs-gen.json");
        fs::write(
            &config_path,
            r#"{ "api_key": "sk-file", "model": "claude-3-5-haiku-latest" }"#,
        )
        .unwrap();

        let cli = parse(&[
            "--all",
            "--config",
            config_path.to_str().unwrap(),
            "--docs-dir",
            "out/docs",
            "--model",
            "gpt-4o",
            "--api",
        ]);
        let config = build_config(&cli).unwrap();

        assert_eq!(config.docs.docs_dir, PathBuf::from("out/docs"));
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.provider, ProviderMode::Api);
    }

    #[test]
    fn test_build_config_missing_file() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");
        let cli = parse(&["--all", "--config", missing.to_str().unwrap()]);
        assert!(matches!(build_config(&cli), Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_collect_files() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("src");
        fs::create_dir_all(src.join("components")).unwrap();
        fs::write(src.join("components/Card.tsx"), "").unwrap();
        fs::write(src.join("index.ts"), "").unwrap();

        let docs = DocGenConfig {
            source_dir: src.clone(),
            ..Default::default()
        };

        let all = collect_files(&Target::All, &docs).unwrap();
        assert_eq!(all, vec![src.join("components/Card.tsx"), src.join("index.ts")]);

        let single = collect_files(&Target::File(PathBuf::from("nope.ts")), &docs).unwrap();
        assert_eq!(single, vec![PathBuf::from("nope.ts")]);

        assert!(matches!(
            collect_files(&Target::Dir(dir.path().join("missing")), &docs),
            Err(AppError::NotFound(_))
        ));
    }
}
