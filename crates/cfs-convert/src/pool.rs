//! Batch worker pool.
//!
//! Files are processed in batches of the configured degree of
//! parallelism; within a batch each job runs on its own OS thread and
//! the dispatcher blocks until the whole batch has joined. Jobs share
//! nothing mutable, so completion order inside a batch is unobservable;
//! outcomes are reported and counted strictly in input order after each
//! join. No retries, no cancellation.

use crate::error::ConvertError;
use crate::pipeline::{convert_file, Conversion, ConvertOptions};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::thread;

/// Aggregate counters of one run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Files converted successfully.
    pub converted: usize,
    /// Files that returned a typed failure.
    pub failed: usize,
}

/// Degree of parallelism: detected hardware parallelism, floor 2.
pub fn degree_of_parallelism() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(2)
        .max(2)
}

/// Run one conversion job per input file, `workers` at a time.
///
/// `on_outcome` is invoked in input order after each batch joins, so it
/// may write to shared streams without further synchronisation. Worker
/// panics propagate to the caller; a panic is a bug, not a job outcome.
pub fn run_jobs(
    files: &[PathBuf],
    options: &ConvertOptions,
    workers: usize,
    mut on_outcome: impl FnMut(&Path, &Result<Conversion, ConvertError>),
) -> RunSummary {
    let workers = workers.max(1);
    let mut summary = RunSummary::default();

    for batch in files.chunks(workers) {
        let results: Vec<Result<Conversion, ConvertError>> = thread::scope(|scope| {
            let handles: Vec<_> = batch
                .iter()
                .map(|path| scope.spawn(move || convert_file(path, options)))
                .collect();

            handles
                .into_iter()
                .map(|handle| match handle.join() {
                    Ok(result) => result,
                    Err(payload) => std::panic::resume_unwind(payload),
                })
                .collect()
        });

        for (path, result) in batch.iter().zip(&results) {
            match result {
                Ok(_) => summary.converted += 1,
                Err(_) => summary.failed += 1,
            }
            on_outcome(path, result);
        }
    }

    summary
}
