//! # 转换命令实现
//!
//! 展开 glob 模式，按窗口并发转换文件，结果写入文件或标准输出。
//!
//! ## 依赖关系
//! - 使用 `cli/transform.rs` 定义的参数
//! - 使用 `config.rs`, `batch/`, `transform/`
//! - 使用 `utils/output.rs`

use crate::batch::{plan_jobs, BatchRunner, FileCollector, RunSummary, Sink};
use crate::cli::transform::TransformArgs;
use crate::config::RunConfig;
use crate::error::Result;
use crate::transform::{CommandTransformer, SourceTransformer, Transformer};
use crate::utils::output;

use std::io;
use std::sync::Mutex;

/// 执行转换命令
pub fn execute(args: TransformArgs) -> Result<()> {
    let config = RunConfig::from_args(args)?;
    if !config.quiet {
        output::print_header(&format!("Transforming {}", config.patterns.join(" ")));
    }

    let summary = run(&config)?;

    if !config.quiet {
        for (path, warning) in &summary.warnings {
            output::print_warning(&format!("{}: {}", path.display(), warning));
        }
        if config.write {
            output::print_done(&format!("Wrote {} file(s)", summary.written));
        } else if summary.emitted > 0 {
            output::print_done(&format!("Transformed {} file(s)", summary.total()));
        }
    }

    Ok(())
}

/// 按配置完成一次运行
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    if let Some(path) = &config.output {
        if !config.quiet {
            output::print_warning(&format!(
                "--output {} has no effect; use --write to write next to the input files",
                path.display()
            ));
        }
    }

    let collected = FileCollector::new(config.patterns.clone())
        .with_ignore(&config.ignore)
        .collect();
    if !config.quiet {
        for warning in &collected.warnings {
            output::print_warning(warning);
        }
    }

    if collected.files.is_empty() {
        if !config.quiet {
            output::print_warning(&format!(
                "No files matched {}",
                config.patterns.join(", ")
            ));
        }
        return Ok(RunSummary::default());
    }

    let jobs = plan_jobs(&collected.files, config.extension.as_deref());
    let runner = BatchRunner::new(config.concurrency)?.with_progress(config.write && !config.quiet);

    if !config.quiet {
        output::print_info(&format!(
            "Found {} file(s), processing {} at a time",
            jobs.len(),
            runner.concurrency()
        ));
    }

    let transformer: Box<dyn Transformer> = match &config.command {
        Some(command) => Box::new(CommandTransformer::parse(command)?),
        None => Box::new(SourceTransformer::new()),
    };

    if config.write {
        runner.run(&jobs, transformer.as_ref(), &config.transform, Sink::Write)
    } else {
        let stdout = Mutex::new(io::stdout());
        runner.run(&jobs, transformer.as_ref(), &config.transform, Sink::Emit(&stdout))
    }
}
