//! # 内置插件流水线
//!
//! 读取源文件，按注释策略预处理后依次执行插件。
//!
//! ## 依赖关系
//! - 被 `commands/transform.rs` 选用
//! - 使用 `transform/cjs_to_esm.rs`

use super::cjs_to_esm::CjsToEsm;
use super::{Plugin, TransformOptions, TransformOutput, Transformer};
use crate::error::{MdnzrError, Result};

use std::fs;
use std::path::Path;

/// 内置转换器
#[derive(Default)]
pub struct SourceTransformer {
    cjs_to_esm: CjsToEsm,
}

impl SourceTransformer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 对内存中的源码执行转换，`path` 仅用于错误信息
    pub fn transform_source(
        &self,
        path: &Path,
        source: &str,
        options: &TransformOptions,
    ) -> Result<TransformOutput> {
        let mut output = if options.preserve_comments {
            TransformOutput::new(source)
        } else {
            TransformOutput::new(strip_comment_lines(source))
        };

        for plugin in &options.plugins {
            match plugin {
                Plugin::CjsToEsm => {
                    let rewrite = self.cjs_to_esm.rewrite(&output.code).map_err(|reason| {
                        MdnzrError::TransformError {
                            path: path.display().to_string(),
                            reason,
                        }
                    })?;
                    output.code = rewrite.code;
                    output.warnings.extend(rewrite.warnings);
                }
                Plugin::StripUseStrict => {
                    output.code = strip_use_strict(&output.code);
                }
            }
        }

        Ok(output)
    }
}

impl Transformer for SourceTransformer {
    fn transform(&self, path: &Path, options: &TransformOptions) -> Result<TransformOutput> {
        let bytes = fs::read(path).map_err(|e| MdnzrError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
        let source = String::from_utf8(bytes).map_err(|_| MdnzrError::TransformError {
            path: path.display().to_string(),
            reason: "file is not valid UTF-8".to_string(),
        })?;

        self.transform_source(path, &source, options)
    }
}

/// 去掉 `'use strict'` 指令行
fn strip_use_strict(source: &str) -> String {
    let kept: Vec<&str> = source
        .lines()
        .filter(|line| {
            let directive = line.trim().trim_end_matches(';').trim_end();
            directive != "'use strict'" && directive != "\"use strict\""
        })
        .collect();
    rejoin(source, kept)
}

/// 去掉只包含注释的行
///
/// 只识别整行的 `//` 注释和以 `/*` 开头的块注释；块注释结束后同一行若还有代码则保留代码部分。
fn strip_comment_lines(source: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut in_block = false;

    for line in source.lines() {
        let mut rest = line.trim_start();

        if !in_block {
            if rest.starts_with("//") {
                continue;
            }
            if !rest.starts_with("/*") {
                kept.push(line);
                continue;
            }
            rest = &rest[2..];
        }

        match rest.find("*/") {
            Some(end) => {
                in_block = false;
                let code = rest[end + 2..].trim_start();
                if !code.is_empty() {
                    kept.push(code);
                }
            }
            None => in_block = true,
        }
    }

    rejoin(source, kept)
}

/// 按原文的换行符（`\n` 或 `\r\n`）重新拼接
fn rejoin(original: &str, lines: Vec<&str>) -> String {
    let newline = if original.contains("\r\n") { "\r\n" } else { "\n" };
    let mut out = lines.join(newline);
    if original.ends_with('\n') && !out.is_empty() {
        out.push_str(newline);
    }
    out
}
