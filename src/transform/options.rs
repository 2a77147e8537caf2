//! # 转换选项
//!
//! 目标语言版本、注释保留策略与插件列表。
//!
//! ## 依赖关系
//! - 被 `cli/transform.rs` 用作参数类型
//! - 被 `transform/` 下的各转换器读取

use crate::error::{MdnzrError, Result};
use clap::ValueEnum;

/// 目标语言版本
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq, PartialOrd, Ord)]
pub enum EsVersion {
    Es5,
    Es2015,
    Es2016,
    Es2017,
    Es2018,
    Es2019,
    Es2020,
    Es2021,
    Es2022,
    #[value(name = "esnext")]
    EsNext,
}

impl std::fmt::Display for EsVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            EsVersion::Es5 => "es5",
            EsVersion::Es2015 => "es2015",
            EsVersion::Es2016 => "es2016",
            EsVersion::Es2017 => "es2017",
            EsVersion::Es2018 => "es2018",
            EsVersion::Es2019 => "es2019",
            EsVersion::Es2020 => "es2020",
            EsVersion::Es2021 => "es2021",
            EsVersion::Es2022 => "es2022",
            EsVersion::EsNext => "esnext",
        };
        write!(f, "{}", name)
    }
}

/// 可用的转换插件
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum Plugin {
    /// Rewrite require/module.exports to import/export
    CjsToEsm,
    /// Remove 'use strict' directives (modules are strict already)
    StripUseStrict,
}

impl std::fmt::Display for Plugin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Plugin::CjsToEsm => write!(f, "cjs-to-esm"),
            Plugin::StripUseStrict => write!(f, "strip-use-strict"),
        }
    }
}

/// 一次运行中所有文件共享的转换选项
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOptions {
    pub target: EsVersion,
    pub preserve_comments: bool,
    pub plugins: Vec<Plugin>,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            target: EsVersion::Es2019,
            preserve_comments: true,
            plugins: vec![Plugin::CjsToEsm],
        }
    }
}

impl TransformOptions {
    /// 检查插件与目标版本的组合是否可行
    pub fn validate(&self) -> Result<()> {
        if self.plugins.contains(&Plugin::CjsToEsm) && self.target < EsVersion::Es2015 {
            return Err(MdnzrError::InvalidArgument(format!(
                "plugin '{}' emits module syntax, which requires target es2015 or later (got {})",
                Plugin::CjsToEsm,
                self.target
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options() {
        let options = TransformOptions::default();
        assert_eq!(options.target, EsVersion::Es2019);
        assert!(options.preserve_comments);
        assert_eq!(options.plugins, vec![Plugin::CjsToEsm]);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn test_es5_rejected_for_module_output() {
        let options = TransformOptions {
            target: EsVersion::Es5,
            ..TransformOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(MdnzrError::InvalidArgument(_))
        ));

        let no_modules = TransformOptions {
            target: EsVersion::Es5,
            plugins: vec![Plugin::StripUseStrict],
            ..TransformOptions::default()
        };
        assert!(no_modules.validate().is_ok());
    }

    #[test]
    fn test_version_ordering() {
        assert!(EsVersion::Es5 < EsVersion::Es2015);
        assert!(EsVersion::Es2022 < EsVersion::EsNext);
        assert_eq!(EsVersion::EsNext.to_string(), "esnext");
    }
}
