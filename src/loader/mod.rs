//! Batch loading of captured logs from files and directories
//!
//! # Error Handling Strategy
//!
//! The loader combines graceful degradation with error rate tracking:
//!
//! - **File-level failures**: A file that cannot be read (missing, too large, permission
//!   denied) is recorded in [`LoadReport::failed`] and logged as a warning. The rest of the
//!   batch still loads.
//!
//! - **Error rate tracking**: Returns an error if >50% of files fail, so a wrong path or
//!   a directory of unreadable files is not reported as an empty success.
//!
//! - **Traversal errors**: Unreadable directory entries are logged and skipped. Symlinks
//!   inside walked directories are never followed.
//!
//! - **Parser integration**: Content problems are not failures. A readable file that no
//!   parser accepts loads with `format: None` and no sessions.

pub mod discover;
pub mod load;

pub use discover::{MAX_LOG_FILES, discover_log_files};
pub use load::{FailedLog, LoadReport, ParsedLog, load_log, load_logs};
