use camino::Utf8PathBuf;
use std::time::Duration;
use thiserror::Error;

use super::invoker::{FormatterInvoker, DEFAULT_FORMAT_TIMEOUT};
use crate::models::StyleConfig;

/// Every how many files the runner pauses to yield to the host.
const PACING_INTERVAL: usize = 10;

/// Length of the pacing pause.
const PACING_PAUSE: Duration = Duration::from_millis(50);

/// Setup-phase errors that abort a batch run before any file is processed.
///
/// Per-file failures never surface here; they are counted in the
/// [`BatchOutcome`] and reported through progress events.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum BatchError {
    #[error("clang-format not found")]
    ToolUnavailable,
}

/// Outcome of formatting a single file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    Success,
    Fail,
}

/// Progress notification emitted during a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Emitted once before the first file, after the availability check.
    Started { total: usize },
    /// Emitted exactly once per input file, in input order.
    FileProcessed {
        /// 1-based position in the input list.
        index: usize,
        total: usize,
        path: Utf8PathBuf,
        outcome: FileOutcome,
    },
}

/// Aggregated result of a batch run.
///
/// `success_count + fail_count` always equals the number of input files.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub success_count: usize,
    pub fail_count: usize,
}

impl BatchOutcome {
    pub fn total(&self) -> usize {
        self.success_count + self.fail_count
    }

    pub fn summary(&self) -> String {
        format!(
            "{} formatted, {} failed ({} total)",
            self.success_count,
            self.fail_count,
            self.total()
        )
    }
}

/// Drives the [`FormatterInvoker`] over an ordered file list.
///
/// Files are processed strictly sequentially: each invocation spawns a
/// subprocess, and one at a time bounds resource usage and keeps progress
/// monotonic. Every 10th file the runner sleeps briefly so the host
/// scheduler and the external tool get room to breathe.
pub struct BatchRunner {
    invoker: FormatterInvoker,
    file_timeout: Duration,
}

impl BatchRunner {
    pub fn new(invoker: FormatterInvoker) -> Self {
        Self {
            invoker,
            file_timeout: DEFAULT_FORMAT_TIMEOUT,
        }
    }

    /// Override the per-file timeout (default 30 s).
    pub fn with_file_timeout(mut self, file_timeout: Duration) -> Self {
        self.file_timeout = file_timeout;
        self
    }

    /// Format all `files` in order, reporting progress through `progress`.
    ///
    /// Fails fast with [`BatchError::ToolUnavailable`] (before any progress
    /// event) if the formatter is missing or fails its version probe. After
    /// that, per-file problems are contained: a missing file counts as a
    /// failure without invoking the tool, a failed or timed-out invocation
    /// counts as a failure, and the batch always runs to completion.
    ///
    /// `progress` receives one `Started` event and then exactly one
    /// `FileProcessed` event per file, indices strictly increasing.
    pub async fn run<F>(
        &self,
        files: &[Utf8PathBuf],
        mut progress: F,
        config: Option<&StyleConfig>,
    ) -> Result<BatchOutcome, BatchError>
    where
        F: FnMut(ProgressEvent),
    {
        if !self.invoker.is_available().await {
            return Err(BatchError::ToolUnavailable);
        }

        let total = files.len();
        progress(ProgressEvent::Started { total });

        let mut outcome = BatchOutcome::default();

        for (i, path) in files.iter().enumerate() {
            let index = i + 1;

            let success = match tokio::fs::try_exists(path).await {
                Ok(true) => self.invoker.invoke(path, self.file_timeout, config).await,
                Ok(false) => {
                    tracing::error!("File missing at format time: {}", path);
                    false
                }
                Err(error) => {
                    tracing::error!("Cannot access {}: {}", path, error);
                    false
                }
            };

            if success {
                outcome.success_count += 1;
            } else {
                outcome.fail_count += 1;
            }

            // One notification per file, on every path through the loop.
            progress(ProgressEvent::FileProcessed {
                index,
                total,
                path: path.clone(),
                outcome: if success {
                    FileOutcome::Success
                } else {
                    FileOutcome::Fail
                },
            });

            if index % PACING_INTERVAL == 0 {
                tokio::time::sleep(PACING_PAUSE).await;
            }
        }

        tracing::info!("Batch complete: {}", outcome.summary());
        Ok(outcome)
    }
}
