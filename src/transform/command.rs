//! # 外部命令转换器
//!
//! 把转换交给外部程序（例如 swc 或 babel 的命令行）。
//! 文件路径作为最后一个参数传入，标准输出即转换结果。
//!
//! 转换选项通过环境变量传递：
//! - `MDNZR_TARGET`: 目标语言版本
//! - `MDNZR_PRESERVE_COMMENTS`: `true` / `false`
//!
//! ## 依赖关系
//! - 被 `commands/transform.rs` 在 `--command` 时选用

use super::{TransformOptions, TransformOutput, Transformer};
use crate::error::{MdnzrError, Result};

use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Stdio};

/// 外部命令转换器
#[derive(Debug, Clone)]
pub struct CommandTransformer {
    program: String,
    args: Vec<String>,
}

impl CommandTransformer {
    /// 从命令行字符串构造（按空白切分，第一个词为程序名）
    pub fn parse(command_line: &str) -> Result<Self> {
        let mut words = command_line.split_whitespace().map(str::to_string);
        let program = words.next().ok_or_else(|| {
            MdnzrError::InvalidArgument("--command must name a program".to_string())
        })?;
        Ok(Self {
            program,
            args: words.collect(),
        })
    }

    fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Transformer for CommandTransformer {
    fn transform(&self, path: &Path, options: &TransformOptions) -> Result<TransformOutput> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(path)
            .env("MDNZR_TARGET", options.target.to_string())
            .env(
                "MDNZR_PRESERVE_COMMENTS",
                options.preserve_comments.to_string(),
            )
            .stdin(Stdio::null())
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound => MdnzrError::CommandNotFound {
                    command: self.program.clone(),
                },
                _ => MdnzrError::CommandFailed {
                    command: self.display(),
                    path: path.display().to_string(),
                    stderr: e.to_string(),
                },
            })?;

        if !output.status.success() {
            return Err(MdnzrError::CommandFailed {
                command: self.display(),
                path: path.display().to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        let code = String::from_utf8(output.stdout).map_err(|_| MdnzrError::TransformError {
            path: path.display().to_string(),
            reason: format!("output of '{}' is not valid UTF-8", self.display()),
        })?;

        Ok(TransformOutput::new(code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_command_line() {
        let cmd = CommandTransformer::parse("  npx swc  --no-swcrc ").unwrap();
        assert_eq!(cmd.program, "npx");
        assert_eq!(cmd.args, vec!["swc", "--no-swcrc"]);
        assert_eq!(cmd.display(), "npx swc --no-swcrc");
    }

    #[test]
    fn test_parse_empty_command() {
        assert!(matches!(
            CommandTransformer::parse("   "),
            Err(MdnzrError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_missing_program() {
        let cmd = CommandTransformer::parse("mdnzr-definitely-not-installed").unwrap();
        let err = cmd
            .transform(Path::new("a.js"), &TransformOptions::default())
            .unwrap_err();
        assert!(matches!(err, MdnzrError::CommandNotFound { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_stdout_is_result() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.js");
        std::fs::write(&file, "const a = 1;\n").unwrap();

        let out = CommandTransformer::parse("cat")
            .unwrap()
            .transform(&file, &TransformOptions::default())
            .unwrap();
        assert_eq!(out.code, "const a = 1;\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_is_failure() {
        let err = CommandTransformer::parse("false")
            .unwrap()
            .transform(Path::new("a.js"), &TransformOptions::default())
            .unwrap_err();
        assert!(matches!(err, MdnzrError::CommandFailed { .. }));
    }
}
