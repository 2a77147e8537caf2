//! # 批量执行器
//!
//! 以固定大小的窗口并发执行转换任务。
//!
//! ## 功能
//! - 任务列表按 `concurrency` 切成连续窗口，窗口内并发、窗口间严格串行
//! - 窗口在 rayon 线程池中执行，线程数为 `concurrency` 与任务数中较小者，并发上限由线程数保证
//! - 任一任务失败即终止当前窗口，后续窗口不再启动
//! - 结果写入文件，或整体写入共享输出流
//!
//! ## 依赖关系
//! - 被 `commands/transform.rs` 调用
//! - 使用 `transform::Transformer` 执行转换
//! - 使用 `utils/progress.rs` 创建进度条
//! - 使用 `rayon` 进行并行计算

use crate::batch::job::Job;
use crate::error::{MdnzrError, Result};
use crate::transform::{TransformOptions, Transformer};
use crate::utils::progress;

use rayon::prelude::*;
use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

/// 转换结果的去向
#[derive(Clone, Copy)]
pub enum Sink<'a> {
    /// 写入每个任务的输出路径
    Write,
    /// 写入共享输出流，每个文件的结果作为一个整体写出
    Emit(&'a Mutex<dyn Write + Send + 'a>),
}

/// 单个文件的处理结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delivered {
    Written,
    Emitted,
}

/// 批量处理结果统计
#[derive(Debug, Default)]
pub struct RunSummary {
    /// 写入磁盘的文件数
    pub written: usize,
    /// 写入输出流的文件数
    pub emitted: usize,
    /// 执行的窗口数
    pub windows: usize,
    /// 转换警告 (文件路径, 警告)
    pub warnings: Vec<(PathBuf, String)>,
}

impl RunSummary {
    /// 总处理数量
    pub fn total(&self) -> usize {
        self.written + self.emitted
    }
}

/// 批量执行器
pub struct BatchRunner {
    /// 窗口大小（同时处理的文件数）
    concurrency: usize,
    /// 是否显示进度条
    show_progress: bool,
}

impl BatchRunner {
    /// 创建新的批量执行器
    pub fn new(concurrency: usize) -> Result<Self> {
        if concurrency == 0 {
            return Err(MdnzrError::InvalidArgument(
                "concurrency must be a positive integer".to_string(),
            ));
        }

        Ok(Self {
            concurrency,
            show_progress: false,
        })
    }

    /// 设置是否显示进度条
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// 逐窗口处理任务列表
    pub fn run<T>(
        &self,
        jobs: &[Job],
        transformer: &T,
        options: &TransformOptions,
        sink: Sink<'_>,
    ) -> Result<RunSummary>
    where
        T: Transformer + ?Sized,
    {
        let mut summary = RunSummary::default();
        if jobs.is_empty() {
            return Ok(summary);
        }

        // 任务少于窗口时不需要多余的线程
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.concurrency.min(jobs.len()))
            .thread_name(|i| format!("mdnzr-worker-{}", i))
            .build()?;

        let pb = if self.show_progress {
            progress::create_progress_bar(jobs.len() as u64, "Transforming")
        } else {
            indicatif::ProgressBar::hidden()
        };

        for window in jobs.chunks(self.concurrency) {
            let results: Result<Vec<(Delivered, Vec<String>)>> = pool.install(|| {
                window
                    .par_iter()
                    .map(|job| {
                        let result = process(job, transformer, options, sink);
                        pb.inc(1);
                        result
                    })
                    .collect()
            });

            let results = match results {
                Ok(results) => results,
                Err(e) => {
                    pb.abandon();
                    return Err(e);
                }
            };

            summary.windows += 1;
            for (job, (delivered, warnings)) in window.iter().zip(results) {
                match delivered {
                    Delivered::Written => summary.written += 1,
                    Delivered::Emitted => summary.emitted += 1,
                }
                summary
                    .warnings
                    .extend(warnings.into_iter().map(|w| (job.input.clone(), w)));
            }
        }

        pb.finish_and_clear();
        Ok(summary)
    }
}

/// 处理单个任务：转换后写入文件或输出流
fn process<T>(
    job: &Job,
    transformer: &T,
    options: &TransformOptions,
    sink: Sink<'_>,
) -> Result<(Delivered, Vec<String>)>
where
    T: Transformer + ?Sized,
{
    let output = transformer.transform(&job.input, options)?;

    let delivered = match sink {
        Sink::Write => {
            fs::write(&job.output, output.code.as_bytes()).map_err(|e| {
                MdnzrError::FileWriteError {
                    path: job.output.display().to_string(),
                    source: e,
                }
            })?;
            Delivered::Written
        }
        Sink::Emit(stream) => {
            let mut stream = stream.lock().unwrap_or_else(PoisonError::into_inner);
            emit(&mut *stream, &output.code).map_err(|e| MdnzrError::StreamWriteError {
                path: job.input.display().to_string(),
                source: e,
            })?;
            Delivered::Emitted
        }
    };

    Ok((delivered, output.warnings))
}

fn emit(stream: &mut (dyn Write + Send + '_), code: &str) -> std::io::Result<()> {
    stream.write_all(code.as_bytes())?;
    if !code.ends_with('\n') {
        stream.write_all(b"\n")?;
    }
    stream.flush()
}
