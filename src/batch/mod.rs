//! # 批量处理模块
//!
//! 提供统一的文件批量处理能力。
//!
//! ## 功能
//! - glob 展开与忽略规则
//! - 输出路径规划
//! - 固定窗口的并发执行
//!
//! ## 依赖关系
//! - 被 `commands/transform.rs` 使用
//! - 使用 `rayon` 进行并行处理
//! - 使用 `indicatif` 显示进度

pub mod collector;
pub mod job;
pub mod runner;

pub use collector::FileCollector;
pub use job::plan_jobs;
pub use runner::{BatchRunner, RunSummary, Sink};
