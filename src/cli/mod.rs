//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数。
//!
//! mdnzr 只有一个动作（批量转换），所以顶层 `Cli` 直接展开
//! `transform::TransformArgs`，不使用子命令。
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
//! - 子模块: transform

pub mod transform;

use clap::Parser;

/// mdnzr - CommonJS 到 ES module 的批量转换工具
#[derive(Parser, Debug)]
#[command(name = "mdnzr")]
#[command(author = "Changjiang Wu")]
#[command(version)]
#[command(
    about = "Batch-convert source files matching glob patterns with a code transformer",
    long_about = None
)]
pub struct Cli {
    #[command(flatten)]
    pub args: transform::TransformArgs,
}
