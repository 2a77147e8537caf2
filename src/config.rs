//! # 运行配置
//!
//! 由命令行参数构造一次运行的不可变配置。
//!
//! ## 依赖关系
//! - 被 `commands/transform.rs` 使用
//! - 使用 `cli/transform.rs` 的参数与 `transform/options.rs` 的选项

use crate::batch::job::normalize_extension;
use crate::cli::transform::TransformArgs;
use crate::error::{MdnzrError, Result};
use crate::transform::TransformOptions;

use std::path::PathBuf;

/// 一次运行的配置
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// glob 模式
    pub patterns: Vec<String>,
    /// 忽略模式（逗号分隔的原始字符串）
    pub ignore: String,
    /// 窗口大小
    pub concurrency: usize,
    /// 输出扩展名（不含前导点）
    pub extension: Option<String>,
    /// 是否写入文件
    pub write: bool,
    /// `-o/--output`，目前不参与任何处理
    pub output: Option<PathBuf>,
    /// 外部转换命令
    pub command: Option<String>,
    /// 是否静默
    pub quiet: bool,
    /// 转换选项
    pub transform: TransformOptions,
}

impl RunConfig {
    pub fn from_args(args: TransformArgs) -> Result<Self> {
        if args.concurrency == 0 {
            return Err(MdnzrError::InvalidArgument(
                "--concurrency must be a positive integer".to_string(),
            ));
        }

        let transform = TransformOptions {
            target: args.target,
            preserve_comments: !args.strip_comments,
            plugins: args.plugins,
        };
        // 外部命令自行负责转换，插件组合只对内置流水线有意义
        if args.command.is_none() {
            transform.validate()?;
        }

        Ok(Self {
            patterns: args.patterns,
            ignore: args.ignore.unwrap_or_default(),
            concurrency: args.concurrency,
            extension: normalize_extension(args.extension.as_deref()),
            write: args.write,
            output: args.output,
            command: args.command,
            quiet: args.quiet,
            transform,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::Cli;
    use crate::transform::{EsVersion, Plugin};
    use clap::Parser;

    fn parse(argv: &[&str]) -> Result<RunConfig> {
        let cli = Cli::try_parse_from(argv).unwrap();
        RunConfig::from_args(cli.args)
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["mdnzr", "src/**/*.js"]).unwrap();
        assert_eq!(config.patterns, vec!["src/**/*.js"]);
        assert_eq!(config.concurrency, 15);
        assert!(!config.write);
        assert_eq!(config.extension, None);
        assert_eq!(config.ignore, "");
        assert_eq!(config.transform, TransformOptions::default());
    }

    #[test]
    fn test_all_options() {
        let config = parse(&[
            "mdnzr",
            "a/*.cjs",
            "b/*.cjs",
            "-i",
            "**/vendor/**",
            "-c",
            "4",
            "-e",
            "mjs",
            "-w",
            "-t",
            "esnext",
            "-p",
            "strip-use-strict",
            "-p",
            "cjs-to-esm",
            "--strip-comments",
            "-o",
            "out",
        ])
        .unwrap();
        assert_eq!(config.patterns.len(), 2);
        assert_eq!(config.ignore, "**/vendor/**");
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.extension.as_deref(), Some("mjs"));
        assert!(config.write);
        assert_eq!(config.output, Some(PathBuf::from("out")));
        assert_eq!(config.transform.target, EsVersion::EsNext);
        assert!(!config.transform.preserve_comments);
        assert_eq!(
            config.transform.plugins,
            vec![Plugin::StripUseStrict, Plugin::CjsToEsm]
        );
    }

    #[test]
    fn test_zero_concurrency_rejected_by_parser() {
        assert!(Cli::try_parse_from(["mdnzr", "-c", "0", "*.js"]).is_err());
    }

    #[test]
    fn test_patterns_required() {
        assert!(Cli::try_parse_from(["mdnzr", "-w"]).is_err());
    }

    #[test]
    fn test_es5_rejected_unless_external_command() {
        assert!(matches!(
            parse(&["mdnzr", "*.js", "-t", "es5"]),
            Err(MdnzrError::InvalidArgument(_))
        ));
        assert!(parse(&["mdnzr", "*.js", "-t", "es5", "--command", "cat"]).is_ok());
    }
}
