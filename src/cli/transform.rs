//! # 转换参数 CLI 定义
//!
//! glob 模式、忽略规则、并发窗口、输出扩展名以及转换选项。
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/transform.rs`

use crate::transform::{EsVersion, Plugin};
use clap::Args;
use std::path::PathBuf;

/// 默认并发窗口大小
pub const DEFAULT_CONCURRENCY: usize = 15;

/// 转换参数
#[derive(Args, Debug)]
pub struct TransformArgs {
    /// Glob patterns of files to transform. Wrap in quotes to avoid shell expansion.
    #[arg(required = true, value_name = "PATTERNS")]
    pub patterns: Vec<String>,

    /// Output path (accepted for compatibility, currently has no effect)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Patterns to ignore, separated by comma
    #[arg(short, long)]
    pub ignore: Option<String>,

    /// Number of files that can be processed at once
    #[arg(
        short,
        long,
        env = "MDNZR_CONCURRENCY",
        default_value_t = DEFAULT_CONCURRENCY,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    pub concurrency: usize,

    /// Output file extension (e.g. .mjs)
    #[arg(short, long)]
    pub extension: Option<String>,

    /// Write output to files instead of stdout
    #[arg(short, long, default_value_t = false)]
    pub write: bool,

    /// Target language version
    #[arg(short, long, value_enum, env = "MDNZR_TARGET", default_value_t = EsVersion::Es2019)]
    pub target: EsVersion,

    /// Transformation plugins to run, in order (repeatable)
    #[arg(short, long = "plugin", value_enum, default_values_t = vec![Plugin::CjsToEsm])]
    pub plugins: Vec<Plugin>,

    /// Drop comment-only lines instead of preserving them
    #[arg(long, default_value_t = false)]
    pub strip_comments: bool,

    /// Delegate transformation to an external program; the file path is appended
    /// as the last argument and stdout is taken as the result
    #[arg(long, value_name = "PROGRAM")]
    pub command: Option<String>,

    /// Suppress status messages and the progress bar
    #[arg(short, long, default_value_t = false)]
    pub quiet: bool,
}
