//! # 统一错误处理模块
//!
//! 定义 mdnzr 的所有错误类型，使用 `thiserror` 派生。
//!
//! ## 依赖关系
//! - 被所有其他模块使用
//! - 无外部模块依赖

use thiserror::Error;

/// mdnzr 统一错误类型
#[derive(Error, Debug)]
pub enum MdnzrError {
    // ─────────────────────────────────────────────────────────────
    // I/O 错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to read file: {path}")]
    FileReadError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write file: {path}")]
    FileWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write transformed output of {path} to the output stream")]
    StreamWriteError {
        path: String,
        #[source]
        source: std::io::Error,
    },

    // ─────────────────────────────────────────────────────────────
    // 转换错误
    // ─────────────────────────────────────────────────────────────
    #[error("Failed to transform {path}\nReason: {reason}")]
    TransformError { path: String, reason: String },

    // ─────────────────────────────────────────────────────────────
    // 外部命令错误
    // ─────────────────────────────────────────────────────────────
    #[error("External command '{command}' not found in PATH")]
    CommandNotFound { command: String },

    #[error("External command failed on {path}: {command}\n{stderr}")]
    CommandFailed {
        command: String,
        path: String,
        stderr: String,
    },

    // ─────────────────────────────────────────────────────────────
    // 参数错误
    // ─────────────────────────────────────────────────────────────
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result 类型别名
pub type Result<T> = std::result::Result<T, MdnzrError>;
