use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use walkdir::WalkDir;

/// Maximum number of log files per run (prevent resource exhaustion)
pub const MAX_LOG_FILES: usize = 10_000;

/// Extensions collected when walking a directory
const LOG_EXTENSIONS: &[&str] = &["log", "txt", "out", "jsonl", "json"];

/// Expand command-line paths into the list of log files to load
///
/// Paths naming files are kept as given, whatever their extension. Directories are walked
/// recursively for files with a log extension, in file-name order. Symlinks found while
/// walking are skipped.
///
/// # Errors
///
/// Returns an error if more than [`MAX_LOG_FILES`] files are collected.
///
/// # Examples
///
/// ```no_run
/// use std::path::PathBuf;
/// use agent_log_timeline::loader::discover_log_files;
///
/// let files = discover_log_files(&[PathBuf::from("./captures")])?;
/// println!("found {} logs", files.len());
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn discover_log_files(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            collect_directory(path, &mut files)?;
        } else {
            push_checked(&mut files, path.clone())?;
        }
    }

    Ok(files)
}

fn collect_directory(root: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    let walker = WalkDir::new(root).follow_links(false).sort_by_file_name();

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                continue;
            }
        };

        if entry.path_is_symlink() {
            log::debug!("skipping symlink {}", entry.path().display());
            continue;
        }
        if entry.file_type().is_file() && has_log_extension(entry.path()) {
            push_checked(files, entry.into_path())?;
        }
    }

    Ok(())
}

fn push_checked(files: &mut Vec<PathBuf>, path: PathBuf) -> Result<()> {
    if files.len() >= MAX_LOG_FILES {
        bail!(
            "Resource limit exceeded: Found more than {} log files. Narrow the input paths.",
            MAX_LOG_FILES
        );
    }
    files.push(path);
    Ok(())
}

fn has_log_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| LOG_EXTENSIONS.iter().any(|known| known.eq_ignore_ascii_case(ext)))
}
