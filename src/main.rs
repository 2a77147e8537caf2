//! # mdnzr - CommonJS 到 ES module 的批量转换工具
//!
//! 按 glob 模式收集源文件，以固定大小的窗口并发调用转换器，
//! 结果写到标准输出或与输入同目录的文件（可替换扩展名）。
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/        (命令行参数定义)
//!   ├── config.rs   (运行配置)
//!   ├── commands/   (命令执行逻辑)
//!   │     ├── batch/     (文件收集、任务规划、窗口执行器)
//!   │     └── transform/ (转换器: 内置插件 / 外部命令)
//!   ├── utils/      (工具函数)
//!   └── error.rs    (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod config;
mod error;
mod transform;
mod utils;

use clap::Parser;
use cli::Cli;
use std::error::Error;

fn main() {
    // Initialize colored output for Windows compatibility
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli) {
        let mut message = e.to_string();
        let mut source = e.source();
        while let Some(cause) = source {
            message.push_str(&format!("\nCaused by: {}", cause));
            source = cause.source();
        }
        utils::output::print_error(&message);
        std::process::exit(1);
    }
}
