//! # 转换器模块
//!
//! 批量执行器只通过 `Transformer` trait 调用转换逻辑，
//! 具体实现可以是内置插件流水线，也可以是外部命令。
//!
//! ## 依赖关系
//! - 被 `batch/runner.rs` 与 `commands/transform.rs` 使用
//! - 子模块: options, source, cjs_to_esm, command

pub mod cjs_to_esm;
pub mod command;
pub mod options;
pub mod source;

pub use command::CommandTransformer;
pub use options::{EsVersion, Plugin, TransformOptions};
pub use source::SourceTransformer;

use crate::error::Result;
use std::path::Path;

/// 单个文件的转换结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    /// 转换后的代码
    pub code: String,
    /// 非致命警告
    pub warnings: Vec<String>,
}

impl TransformOutput {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            warnings: Vec::new(),
        }
    }
}

/// 代码转换器
///
/// 同一个实例会被窗口内的多个线程同时调用，因此要求 `Sync`。
pub trait Transformer: Sync {
    fn transform(&self, path: &Path, options: &TransformOptions) -> Result<TransformOutput>;
}
