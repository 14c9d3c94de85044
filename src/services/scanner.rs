use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashSet;

/// Recursively discover files under `root` whose extension is in `extensions`.
///
/// Extensions are matched case-sensitively and include the leading dot
/// (e.g. `.cpp`). Directories whose name starts with `.` are skipped
/// entirely, so hidden subtrees are neither searched nor descended into.
///
/// Traversal is depth-first with entries sorted lexically within each
/// directory, so the result order is deterministic for a given filesystem
/// snapshot. A directory that cannot be read is logged and skipped; it
/// never aborts the scan. An unreadable or missing root yields an empty
/// result.
pub async fn scan_source_files(
    root: &Utf8Path,
    extensions: &HashSet<String>,
) -> Vec<Utf8PathBuf> {
    let mut found = Vec::new();
    let mut pending = vec![root.to_path_buf()];

    while let Some(dir) = pending.pop() {
        let entries = match read_sorted_entries(&dir).await {
            Ok(entries) => entries,
            Err(error) => {
                tracing::warn!("Failed to read directory {}: {}", dir, error);
                continue;
            }
        };

        let mut subdirs = Vec::new();
        for (path, is_dir) in entries {
            if is_dir {
                // Hidden directories are excluded from traversal, not just
                // from results.
                if path.file_name().is_some_and(|name| name.starts_with('.')) {
                    continue;
                }
                subdirs.push(path);
            } else if has_matching_extension(&path, extensions) {
                found.push(path);
            }
        }

        // Reverse so the lexically first subdirectory is visited next.
        for subdir in subdirs.into_iter().rev() {
            pending.push(subdir);
        }
    }

    tracing::debug!("Scan of {} found {} matching files", root, found.len());
    found
}

/// Read a directory's entries as (path, is_dir) pairs, sorted by path.
///
/// Entries whose metadata cannot be read or whose name is not valid UTF-8
/// are dropped with a warning.
async fn read_sorted_entries(dir: &Utf8Path) -> std::io::Result<Vec<(Utf8PathBuf, bool)>> {
    let mut read_dir = tokio::fs::read_dir(dir).await?;
    let mut entries = Vec::new();

    loop {
        match read_dir.next_entry().await {
            Ok(Some(entry)) => {
                let path = match Utf8PathBuf::try_from(entry.path()) {
                    Ok(path) => path,
                    Err(error) => {
                        tracing::warn!("Skipping non-UTF-8 path in {}: {}", dir, error);
                        continue;
                    }
                };
                match entry.file_type().await {
                    Ok(file_type) => entries.push((path, file_type.is_dir())),
                    Err(error) => {
                        tracing::warn!("Failed to stat {}: {}", path, error);
                    }
                }
            }
            Ok(None) => break,
            Err(error) => {
                // Keep whatever was enumerated before the failure.
                tracing::warn!("Error while listing {}: {}", dir, error);
                break;
            }
        }
    }

    entries.sort_by(|(a, _), (b, _)| a.cmp(b));
    Ok(entries)
}

fn has_matching_extension(path: &Utf8Path, extensions: &HashSet<String>) -> bool {
    path.extension()
        .is_some_and(|ext| extensions.contains(&format!(".{ext}")))
}
