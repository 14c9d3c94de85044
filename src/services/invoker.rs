use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use regex::Regex;
use std::process::Stdio;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::time::timeout;

use crate::models::{BaseStyle, StyleConfig};

/// Default per-file formatting timeout.
pub const DEFAULT_FORMAT_TIMEOUT: Duration = Duration::from_secs(30);

/// How long the `--version` availability probe may take.
const VERSION_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

/// Bare command name used when resolving the tool via PATH.
const TOOL_COMMAND: &str = "clang-format";

/// Where the external formatter executable lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolLocation {
    /// A concrete executable path (bundled deployment or user override).
    Explicit(Utf8PathBuf),
    /// A bare command resolved through the environment's PATH.
    PathLookup(String),
}

/// Runs clang-format against single files.
///
/// The invoker never reads or parses file contents; clang-format rewrites
/// the target in place (`-i`). Every failure mode (spawn error, nonzero
/// exit, signal death, timeout) is swallowed into a boolean result and
/// logged with the file path, so callers needing detail consult the log.
pub struct FormatterInvoker {
    location: ToolLocation,

    /// Extracts the version number from `clang-format --version` output,
    /// e.g. "clang-format version 17.0.6".
    version_pattern: Regex,
}

impl FormatterInvoker {
    pub fn with_location(location: ToolLocation) -> Self {
        Self {
            location,
            version_pattern: Regex::new(r"version\s+([\w.\-]+)").expect("Invalid version regex"),
        }
    }

    /// Use the executable bundled next to this binary (`<exe_dir>/bin/`).
    pub fn bundled() -> Result<Self> {
        Ok(Self::with_location(ToolLocation::Explicit(
            bundled_tool_path()?,
        )))
    }

    /// Resolve `clang-format` through PATH.
    pub fn in_path() -> Self {
        Self::with_location(ToolLocation::PathLookup(TOOL_COMMAND.to_string()))
    }

    pub fn location(&self) -> &ToolLocation {
        &self.location
    }

    fn program(&self) -> &str {
        match &self.location {
            ToolLocation::Explicit(path) => path.as_str(),
            ToolLocation::PathLookup(command) => command.as_str(),
        }
    }

    /// Whether the formatter can be used.
    ///
    /// For an explicit location the file must exist, and in both modes a
    /// `--version` invocation must complete with exit code 0. Either check
    /// failing makes the tool unavailable.
    pub async fn is_available(&self) -> bool {
        if let ToolLocation::Explicit(path) = &self.location {
            if !path.exists() {
                tracing::warn!("clang-format not found at {}", path);
                return false;
            }
        }

        match self.probe_version().await {
            Some(version) => {
                tracing::info!("clang-format available: {}", version);
                true
            }
            None => false,
        }
    }

    /// Run the `--version` probe, returning the reported version on success.
    pub async fn probe_version(&self) -> Option<String> {
        let mut probe = Command::new(self.program());
        probe.arg("--version").stdin(Stdio::null());

        let output = match timeout(VERSION_PROBE_TIMEOUT, probe.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(error)) => {
                tracing::warn!("Failed to spawn {} --version: {}", self.program(), error);
                return None;
            }
            Err(_) => {
                tracing::warn!("{} --version timed out", self.program());
                return None;
            }
        };

        if !output.status.success() {
            tracing::warn!("{} --version exited with {}", self.program(), output.status);
            return None;
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let version = self
            .version_pattern
            .captures(&stdout)
            .and_then(|captures| captures.get(1))
            .map(|m| m.as_str().to_string())
            .unwrap_or_else(|| stdout.trim().to_string());
        Some(version)
    }

    /// Build the `--style=...` argument for an invocation.
    ///
    /// With a config, each field is serialized into a style-override JSON
    /// object in the external naming convention; without one, the default
    /// Google preset name is used.
    pub fn style_arg(config: Option<&StyleConfig>) -> String {
        match config {
            Some(config) => format!("--style={}", config.style_override_json()),
            None => format!("--style={}", BaseStyle::Google),
        }
    }

    /// Format one file in place, bounded by `timeout_duration`.
    ///
    /// If the child has not exited when the timer fires it is forcibly
    /// terminated and the file reported failed; otherwise the result
    /// reflects the child's exit status. Arguments are passed directly to
    /// the child process, so the style JSON needs no shell escaping.
    pub async fn invoke(
        &self,
        file: &Utf8Path,
        timeout_duration: Duration,
        config: Option<&StyleConfig>,
    ) -> bool {
        let style = Self::style_arg(config);
        tracing::debug!("Formatting {} ({})", file, style);

        let start = Instant::now();
        let mut child = match Command::new(self.program())
            .arg(&style)
            .arg("-i")
            .arg(file)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
        {
            Ok(child) => child,
            Err(error) => {
                tracing::error!("Failed to spawn clang-format for {}: {}", file, error);
                return false;
            }
        };

        match timeout(timeout_duration, child.wait()).await {
            Ok(Ok(status)) if status.success() => {
                tracing::debug!(
                    "Formatted {} in {:.2}s",
                    file,
                    start.elapsed().as_secs_f32()
                );
                true
            }
            Ok(Ok(status)) => {
                tracing::error!("clang-format exited with {} for {}", status, file);
                false
            }
            Ok(Err(error)) => {
                tracing::error!("Failed to wait for clang-format on {}: {}", file, error);
                false
            }
            Err(_) => {
                tracing::error!(
                    "clang-format timed out after {:?} on {}, killing process",
                    timeout_duration,
                    file
                );
                // kill() also reaps the child, so no timer or zombie leaks.
                if let Err(error) = child.kill().await {
                    tracing::warn!("Failed to kill timed-out clang-format: {}", error);
                }
                false
            }
        }
    }
}

fn bundled_tool_path() -> Result<Utf8PathBuf> {
    let exe = std::env::current_exe().context("Failed to resolve current executable path")?;
    let exe = Utf8PathBuf::try_from(exe).context("Executable path is not valid UTF-8")?;
    let exe_dir = exe.parent().context("Executable path has no parent")?;

    let tool_file = if cfg!(windows) {
        "clang-format.exe"
    } else {
        "clang-format"
    };
    Ok(exe_dir.join("bin").join(tool_file))
}
