//! Batch command implementation
//!
//! Runs every job file under a directory. Jobs are independent and run in
//! parallel; one failing job does not stop the others.

use anyhow::{bail, Result};
use colored::Colorize;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;
use walkdir::WalkDir;

use super::json_output::{error_codes, BatchItem, BatchOutput, JsonError, ReconcileResult};
use crate::job::load_job;
use crate::pipeline::{exit_code_for, run_job, EXIT_INPUT_ERROR};

/// Run the batch command
///
/// # Arguments
/// * `dir` - Directory scanned recursively for `*.json` job files
/// * `threads` - Worker count (default: one per core)
/// * `json_output` - Whether to output machine-readable JSON
///
/// # Returns
/// Exit code: 0 if every job succeeded, otherwise the highest job exit code
pub fn run(dir: &str, threads: Option<usize>, json_output: bool) -> Result<ExitCode> {
    let root = Path::new(dir);
    if !root.is_dir() {
        bail!("'{}' is not a directory", dir);
    }

    let jobs = find_jobs(root);
    info!(count = jobs.len(), dir, "found jobs");
    if !json_output {
        println!(
            "{} {} job(s) in {}",
            "Batch:".cyan().bold(),
            jobs.len(),
            dir
        );
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads.unwrap_or(0))
        .build()?;
    let items: Vec<BatchItem> = pool.install(|| jobs.par_iter().map(|path| run_one(path)).collect());

    let output = summarize(items);
    let worst = output.jobs.iter().map(|j| j.exit_code).max().unwrap_or(0);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        for item in &output.jobs {
            if item.success {
                println!("  {} {}", "ok".green(), item.job);
            } else {
                let message = item
                    .errors
                    .first()
                    .map(|e| e.message.as_str())
                    .unwrap_or("unknown error");
                println!("  {} {}: {}", "!!".red(), item.job, message);
            }
        }
        let status = if output.failed == 0 {
            "SUCCESS".green().bold()
        } else {
            "FAILED".red().bold()
        };
        println!(
            "{} {} succeeded, {} failed",
            status, output.succeeded, output.failed
        );
    }

    Ok(if worst == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(worst)
    })
}

/// Every `*.json` file under `root`, sorted by path.
pub fn find_jobs(root: &Path) -> Vec<PathBuf> {
    let mut jobs: Vec<PathBuf> = WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("json"))
                .unwrap_or(false)
        })
        .collect();
    jobs.sort();
    jobs
}

fn run_one(path: &Path) -> BatchItem {
    let job_name = path.display().to_string();

    let loaded = match load_job(path) {
        Ok(loaded) => loaded,
        Err(e) => {
            return BatchItem {
                job: job_name.clone(),
                success: false,
                exit_code: EXIT_INPUT_ERROR,
                result: None,
                errors: vec![JsonError::new(error_codes::INVALID_JOB, e.to_string())
                    .with_file(job_name)],
            }
        }
    };

    match run_job(&loaded.job) {
        Ok(outcome) => BatchItem {
            job: job_name,
            success: true,
            exit_code: 0,
            result: Some(ReconcileResult::from_outcome(&outcome)),
            errors: Vec::new(),
        },
        Err(e) => BatchItem {
            job: job_name.clone(),
            success: false,
            exit_code: exit_code_for(&e),
            result: None,
            errors: vec![JsonError::from_anyhow(&e).with_file(job_name)],
        },
    }
}

fn summarize(items: Vec<BatchItem>) -> BatchOutput {
    let succeeded = items.iter().filter(|i| i.success).count();
    BatchOutput {
        total: items.len(),
        succeeded,
        failed: items.len() - succeeded,
        jobs: items,
    }
}
