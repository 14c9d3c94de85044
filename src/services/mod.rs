//! Services module - the batch file-processing pipeline.
//!
//! Everything here is framework-agnostic: no CLI or UI dependencies, all
//! inputs explicit, all operations async via tokio.
//!
//! # Components
//!
//! - [`scanner`]: recursive source-file discovery bounded by extension
//!   filters, hidden directories skipped, per-directory errors tolerated.
//! - [`FormatterInvoker`]: locates and validates the external clang-format
//!   executable, builds its invocation from a [`StyleConfig`](crate::models::StyleConfig),
//!   and runs it against one file under a timeout.
//! - [`BatchRunner`]: drives the invoker over an ordered file list,
//!   sequentially, emitting one [`ProgressEvent`] per file and aggregating
//!   a [`BatchOutcome`].
//!
//! Per-file failures are contained at this layer: they are counted and
//! logged, never raised. The only error a batch run surfaces is
//! [`BatchError::ToolUnavailable`], detected before any file is touched.

pub mod batch;
pub mod invoker;
pub mod scanner;

pub use batch::{BatchError, BatchOutcome, BatchRunner, FileOutcome, ProgressEvent};
pub use invoker::{FormatterInvoker, ToolLocation, DEFAULT_FORMAT_TIMEOUT};
pub use scanner::scan_source_files;
