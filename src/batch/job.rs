//! # 任务规划
//!
//! 为每个输入文件计算输出路径。输出总是与输入位于同一目录，
//! 只有扩展名可能被替换。
//!
//! ## 依赖关系
//! - 被 `commands/transform.rs` 调用
//! - 产出的 `Job` 由 `batch/runner.rs` 消费

use std::path::{Path, PathBuf};

/// 单个待处理文件
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    /// 输入文件
    pub input: PathBuf,
    /// 输出文件
    pub output: PathBuf,
}

impl Job {
    pub fn new(input: PathBuf, extension: Option<&str>) -> Self {
        let output = output_path(&input, extension);
        Self { input, output }
    }
}

/// 规范化扩展名：去掉首尾空白和前导点，空串视为未指定
pub fn normalize_extension(extension: Option<&str>) -> Option<String> {
    let ext = extension?.trim().trim_start_matches('.');
    if ext.is_empty() {
        None
    } else {
        Some(ext.to_string())
    }
}

/// 计算输出路径
///
/// 有扩展名时替换最后一个扩展名（没有扩展名则追加），否则与输入相同。
pub fn output_path(input: &Path, extension: Option<&str>) -> PathBuf {
    match normalize_extension(extension) {
        Some(ext) => input.with_extension(ext),
        None => input.to_path_buf(),
    }
}

/// 为文件列表生成任务
pub fn plan_jobs(files: &[PathBuf], extension: Option<&str>) -> Vec<Job> {
    files
        .iter()
        .map(|file| Job::new(file.clone(), extension))
        .collect()
}
