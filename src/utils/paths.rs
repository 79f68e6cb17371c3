use std::borrow::Cow;
use std::env;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};

// Maximum size of a single captured log: 32MB
pub const MAX_LOG_FILE_BYTES: u64 = 32 * 1024 * 1024;

/// Validates that a file's size is within acceptable limits (32MB)
///
/// Takes an open file handle to avoid TOCTOU (time-of-check-time-of-use)
/// race conditions where the file could be modified between the size check
/// and the read.
///
/// # Errors
///
/// Returns an error if:
/// - The file metadata cannot be read
/// - The file is larger than 32MB
pub fn validate_file_size(file: &File, path: &Path) -> Result<()> {
    let metadata = file
        .metadata()
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;

    let file_size = metadata.len();
    if file_size > MAX_LOG_FILE_BYTES {
        bail!(
            "File too large: {} ({} bytes, max {} bytes)",
            path.display(),
            file_size,
            MAX_LOG_FILE_BYTES
        );
    }

    Ok(())
}

/// Read a captured log into memory
///
/// Invalid UTF-8 is replaced rather than rejected; a log cut mid-character by the
/// capturing process should still parse.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read, or exceeds the size limit.
pub fn read_log_file(path: &Path) -> Result<String> {
    let mut file =
        File::open(path).with_context(|| format!("Failed to open log file: {}", path.display()))?;
    validate_file_size(&file, path)?;

    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .with_context(|| format!("Failed to read log file: {}", path.display()))?;

    Ok(decode_lossy(bytes))
}

/// Convert raw bytes to text, replacing invalid sequences with U+FFFD
pub fn decode_lossy(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            log::debug!("log is not valid UTF-8 at byte {}", err.utf8_error().valid_up_to());
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    }
}

/// Formats a path with ~ substitution for the home directory
///
/// # Examples
///
/// ```no_run
/// use std::path::PathBuf;
/// use agent_log_timeline::utils::paths::format_path_with_tilde;
///
/// let path = PathBuf::from("/Users/alice/logs/run.log");
/// // Returns "~/logs/run.log" if HOME=/Users/alice
/// let formatted = format_path_with_tilde(&path);
/// ```
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, None)
}

/// Internal helper for path formatting with optional home override (for testing)
pub(crate) fn format_path_with_tilde_internal(path: &Path, home_override: Option<&str>) -> String {
    let home_from_env = env::var("HOME").ok();
    let home = home_override.or(home_from_env.as_deref()).filter(|home| !home.is_empty());

    let path_str = path.to_string_lossy();
    if let Some(home) = home
        && path.starts_with(home)
    {
        return path_str.replacen(home, "~", 1);
    }

    match path_str {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}
