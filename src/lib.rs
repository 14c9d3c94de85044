// fmtbatch - batch clang-format runner for C/C++ source trees
//
// This is the library crate containing the core pipeline: file discovery,
// external formatter invocation, batch orchestration, and the persisted
// style configuration. The binary crate (main.rs) provides the CLI host.

pub mod config;
pub mod logging;
pub mod models;
pub mod services;

// Re-export commonly used types for convenience
pub use config::ConfigStore;
pub use models::{BaseStyle, StyleConfig};
pub use services::{
    scan_source_files, BatchError, BatchOutcome, BatchRunner, FileOutcome, FormatterInvoker,
    ProgressEvent, ToolLocation,
};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
