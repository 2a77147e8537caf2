//! # 美化输出工具
//!
//! 提供统一的终端输出样式。
//!
//! 不带 `--write` 运行时标准输出承载转换结果，
//! 因此所有状态信息都写到标准错误。
//!
//! ## 依赖关系
//! - 被 `main.rs` 与 `commands/` 模块使用
//! - 使用 `colored` crate

use colored::Colorize;

/// 打印错误消息
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

/// 打印警告消息
pub fn print_warning(msg: &str) {
    eprintln!("{} {}", "[WARN]".yellow().bold(), msg);
}

/// 打印信息消息
pub fn print_info(msg: &str) {
    eprintln!("{} {}", "[*]".blue().bold(), msg);
}

/// 打印完成消息
pub fn print_done(msg: &str) {
    eprintln!("{} {}", "[DONE]".green().bold(), msg);
}

/// 打印标题栏
pub fn print_header(title: &str) {
    let line = "─".repeat(60);
    eprintln!("\n{}", line.dimmed());
    eprintln!("  {}", title.bold());
    eprintln!("{}\n", line.dimmed());
}
