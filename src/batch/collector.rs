//! # 文件收集器
//!
//! 展开 glob 模式得到待处理文件列表。
//!
//! ## 功能
//! - 多个 glob 模式（支持 `*`, `?`, `[..]`, `**`）
//! - 逗号分隔的忽略模式
//! - 只收集文件，结果去重并排序
//! - 非法模式不会中断运行，而是记录为警告
//!
//! ## 依赖关系
//! - 被 `commands/transform.rs` 调用
//! - 使用 `glob` crate

use glob::{MatchOptions, Pattern};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// 与 shell 习惯一致：`*` 不跨目录，不匹配隐藏文件
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// 收集结果
#[derive(Debug, Default)]
pub struct Collected {
    /// 匹配的文件（已排序）
    pub files: Vec<PathBuf>,
    /// 被忽略的非法模式及原因
    pub warnings: Vec<String>,
}

/// 文件收集器
pub struct FileCollector {
    /// glob 模式列表
    patterns: Vec<String>,
    /// 忽略模式列表
    ignore: Vec<String>,
}

impl FileCollector {
    /// 创建新的文件收集器
    pub fn new(patterns: Vec<String>) -> Self {
        Self {
            patterns,
            ignore: Vec::new(),
        }
    }

    /// 设置忽略模式（逗号分隔的多模式）
    pub fn with_ignore(mut self, ignore: &str) -> Self {
        self.ignore = ignore
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        self
    }

    /// 收集所有匹配的文件
    pub fn collect(&self) -> Collected {
        let mut collected = Collected::default();

        let mut ignore = Vec::new();
        for raw in &self.ignore {
            match Pattern::new(raw) {
                Ok(pattern) => ignore.push(pattern),
                Err(e) => collected
                    .warnings
                    .push(format!("Invalid ignore pattern '{}': {}", raw, e)),
            }
        }

        let mut files = BTreeSet::new();
        for raw in &self.patterns {
            let paths = match glob::glob_with(raw, MATCH_OPTIONS) {
                Ok(paths) => paths,
                Err(e) => {
                    collected
                        .warnings
                        .push(format!("Invalid pattern '{}': {}", raw, e));
                    continue;
                }
            };

            for path in paths.filter_map(|p| p.ok()) {
                if path.is_file() && !Self::is_ignored(&ignore, &path) {
                    files.insert(path);
                }
            }
        }

        collected.files = files.into_iter().collect();
        collected
    }

    /// 检查文件是否命中任一忽略模式
    fn is_ignored(ignore: &[Pattern], path: &Path) -> bool {
        let relative = path.strip_prefix("./").unwrap_or(path);
        ignore.iter().any(|pattern| {
            pattern.matches_path_with(path, MATCH_OPTIONS)
                || pattern.matches_path_with(relative, MATCH_OPTIONS)
        })
    }
}
