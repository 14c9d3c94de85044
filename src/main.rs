//! fmtbatch - batch clang-format runner
//!
//! CLI host for the library: translates arguments into the core operations
//! (scan, batch format, config store) and renders progress events and the
//! final outcome. All formatting work happens in the external clang-format
//! binary; this host never touches file contents itself.

use anyhow::Result;
use camino::Utf8PathBuf;
use clap::{Parser, Subcommand};
use std::collections::HashSet;
use std::process::ExitCode;
use std::time::Duration;

use fmtbatch::{
    scan_source_files, BatchError, BatchRunner, ConfigStore, FileOutcome, FormatterInvoker,
    ProgressEvent, ToolLocation, APP_NAME, VERSION,
};

/// Extensions scanned when none are given on the command line.
const DEFAULT_EXTENSIONS: &[&str] = &[".h", ".hpp", ".hh", ".c", ".cc", ".cpp", ".cxx"];

#[derive(Parser)]
#[command(name = "fmtbatch", version, about = "Batch clang-format runner for C/C++ source trees")]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Discover source files under a directory
    Scan {
        root: Utf8PathBuf,

        /// File extension to include (repeatable); defaults to C/C++ extensions
        #[arg(long = "ext")]
        extensions: Vec<String>,
    },

    /// Discover and format source files in place
    Format {
        root: Utf8PathBuf,

        /// File extension to include (repeatable); defaults to C/C++ extensions
        #[arg(long = "ext")]
        extensions: Vec<String>,

        /// Apply (and persist) a named preset instead of the saved configuration
        #[arg(long)]
        preset: Option<String>,

        /// Per-file timeout in seconds
        #[arg(long, default_value_t = 30)]
        timeout_secs: u64,

        /// Explicit path to the clang-format executable
        #[arg(long)]
        formatter: Option<Utf8PathBuf>,
    },

    /// Replace the saved configuration with a named preset
    Preset {
        /// Preset name (Google, LLVM, Mozilla, WebKit, Stroustrup, Allman, GNU)
        name: String,
    },

    /// Print the current saved configuration
    Config,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let _guard = fmtbatch::logging::setup_logging("logs", APP_NAME, cli.debug, false)?;
    tracing::info!("Starting {} v{}", APP_NAME, VERSION);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("fmtbatch-worker")
        .build()?;

    let result = runtime.block_on(run(cli.command));
    runtime.shutdown_timeout(Duration::from_secs(5));
    result
}

async fn run(command: Command) -> Result<ExitCode> {
    match command {
        Command::Scan { root, extensions } => {
            let files = scan_source_files(&root, &extension_set(&extensions)).await;
            for file in &files {
                println!("{file}");
            }
            eprintln!("{} file(s) found", files.len());
            Ok(ExitCode::SUCCESS)
        }

        Command::Format {
            root,
            extensions,
            preset,
            timeout_secs,
            formatter,
        } => {
            let mut store = ConfigStore::open_default()?;
            let config = match preset {
                Some(name) => store.apply_preset(&name)?,
                None => store.current().clone(),
            };

            let files = scan_source_files(&root, &extension_set(&extensions)).await;
            if files.is_empty() {
                eprintln!("No matching files under {root}");
                return Ok(ExitCode::SUCCESS);
            }

            let invoker = match formatter {
                Some(path) => FormatterInvoker::with_location(ToolLocation::Explicit(path)),
                None => default_invoker(),
            };
            let runner =
                BatchRunner::new(invoker).with_file_timeout(Duration::from_secs(timeout_secs));

            let result = runner
                .run(
                    &files,
                    |event| match event {
                        ProgressEvent::Started { total } => {
                            println!("Formatting {total} file(s)...");
                        }
                        ProgressEvent::FileProcessed {
                            index,
                            total,
                            path,
                            outcome,
                        } => {
                            let status = match outcome {
                                FileOutcome::Success => "ok",
                                FileOutcome::Fail => "FAILED",
                            };
                            println!("[{index}/{total}] {status} {path}");
                        }
                    },
                    Some(&config),
                )
                .await;

            match result {
                Ok(outcome) => {
                    println!("{}", outcome.summary());
                    if outcome.fail_count > 0 {
                        eprintln!("Some files failed; see logs/ for details");
                        Ok(ExitCode::FAILURE)
                    } else {
                        Ok(ExitCode::SUCCESS)
                    }
                }
                Err(BatchError::ToolUnavailable) => {
                    eprintln!(
                        "clang-format was not found. Install it and make sure it is on PATH, \
                         or point at it with --formatter <path>."
                    );
                    Ok(ExitCode::from(2))
                }
            }
        }

        Command::Preset { name } => {
            let mut store = ConfigStore::open_default()?;
            let config = store.apply_preset(&name)?;
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(ExitCode::SUCCESS)
        }

        Command::Config => {
            let store = ConfigStore::open_default()?;
            println!("{}", serde_json::to_string_pretty(store.current())?);
            eprintln!("(stored at {})", store.config_path());
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Prefer a bundled clang-format next to the binary; fall back to PATH.
fn default_invoker() -> FormatterInvoker {
    if let Ok(invoker) = FormatterInvoker::bundled() {
        if let ToolLocation::Explicit(path) = invoker.location() {
            if path.exists() {
                return invoker;
            }
        }
    }
    FormatterInvoker::in_path()
}

/// Normalize CLI extensions (leading dot optional) into the scan set.
fn extension_set(extensions: &[String]) -> HashSet<String> {
    if extensions.is_empty() {
        return DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect();
    }
    extensions
        .iter()
        .map(|ext| {
            if ext.starts_with('.') {
                ext.clone()
            } else {
                format!(".{ext}")
            }
        })
        .collect()
}
