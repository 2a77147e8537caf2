//! # 命令执行模块
//!
//! 实现批量转换的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `config.rs`, `batch/`, `transform/`, `utils/`
//! - 子模块: transform

pub mod transform;

use crate::cli::Cli;
use crate::error::Result;

/// 执行命令
pub fn run(cli: Cli) -> Result<()> {
    transform::execute(cli.args)
}
