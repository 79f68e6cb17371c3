use std::path::{Path, PathBuf};

use anyhow::{Result, bail};
use rayon::prelude::*;
use serde::Serialize;

use crate::models::ConversationSession;
use crate::parsers::{LogFormat, ParseOptions, parse_with};
use crate::utils::read_log_file;

/// One file's parse result
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedLog {
    pub path: PathBuf,
    pub format: Option<LogFormat>,
    pub sessions: Vec<ConversationSession>,
}

/// A file that could not be read
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FailedLog {
    pub path: PathBuf,
    pub error: String,
}

/// Outcome of a batch load, in input order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    pub logs: Vec<ParsedLog>,
    pub failed: Vec<FailedLog>,
}

impl LoadReport {
    pub fn session_count(&self) -> usize {
        self.logs.iter().map(|log| log.sessions.len()).sum()
    }
}

/// Read and parse a single log file
///
/// # Errors
///
/// Returns an error if the file cannot be read or exceeds the size limit.
pub fn load_log(path: &Path, options: &ParseOptions) -> Result<ParsedLog> {
    let text = read_log_file(path)?;
    let outcome = parse_with(&text, options);

    Ok(ParsedLog { path: path.to_path_buf(), format: outcome.format, sessions: outcome.sessions })
}

/// Read and parse many log files in parallel
///
/// Files are processed on the rayon pool; the report keeps the order of `files`.
///
/// # Errors
///
/// Returns an error if more than 50% of the files fail to load.
pub fn load_logs(files: &[PathBuf], options: &ParseOptions) -> Result<LoadReport> {
    let results: Vec<(PathBuf, Result<ParsedLog>)> =
        files.par_iter().map(|path| (path.clone(), load_log(path, options))).collect();

    let mut report = LoadReport::default();
    for (path, result) in results {
        match result {
            Ok(log) => report.logs.push(log),
            Err(e) => {
                log::warn!("Failed to load {}: {:#}", path.display(), e);
                report.failed.push(FailedLog { path, error: format!("{:#}", e) });
            }
        }
    }

    // Check error rate and fail if >50% of files failed
    let total = report.logs.len() + report.failed.len();
    if total > 0 {
        let failure_rate = report.failed.len() as f64 / total as f64;
        if failure_rate > 0.5 {
            bail!(
                "Loading failed: {}/{} log files could not be read ({}% failure rate)",
                report.failed.len(),
                total,
                (failure_rate * 100.0) as u32
            );
        }
    }

    log::debug!(
        "loaded {} log(s) with {} session(s), {} failed",
        report.logs.len(),
        report.session_count(),
        report.failed.len()
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;

    const TEXT_LOG: &str = "OpenAI Codex v0.46.0\n--------\nmodel: gpt-5\n--------\nuser\nhello\n";
    const JSON_LOG: &str = "{\"type\":\"system\",\"subtype\":\"init\",\"session_id\":\"s1\"}\n";

    #[test]
    fn test_load_log_detects_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.log");
        fs::write(&path, TEXT_LOG).unwrap();

        let log = load_log(&path, &ParseOptions::default()).unwrap();
        assert_eq!(log.format, Some(LogFormat::MarkerText));
        assert_eq!(log.sessions.len(), 1);
    }

    #[test]
    fn test_load_logs_preserves_input_order() {
        let dir = TempDir::new().unwrap();
        let mut files = Vec::new();
        for i in 0..20 {
            let path = dir.path().join(format!("{:02}.log", i));
            fs::write(&path, if i % 2 == 0 { TEXT_LOG } else { JSON_LOG }).unwrap();
            files.push(path);
        }

        let report = load_logs(&files, &ParseOptions::default()).unwrap();
        let loaded: Vec<_> = report.logs.iter().map(|log| log.path.clone()).collect();

        assert_eq!(loaded, files);
        assert_eq!(report.logs[1].format, Some(LogFormat::JsonStream));
        assert_eq!(report.session_count(), 20);
    }

    #[test]
    fn test_unrecognized_content_is_not_a_failure() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "just some notes").unwrap();

        let report = load_logs(&[path], &ParseOptions::default()).unwrap();
        assert!(report.failed.is_empty());
        assert_eq!(report.logs[0].format, None);
        assert!(report.logs[0].sessions.is_empty());
    }

    #[test]
    fn test_minority_failures_are_reported() {
        let dir = TempDir::new().unwrap();
        let good1 = dir.path().join("a.log");
        let good2 = dir.path().join("b.log");
        fs::write(&good1, TEXT_LOG).unwrap();
        fs::write(&good2, TEXT_LOG).unwrap();
        let missing = dir.path().join("missing.log");

        let report = load_logs(&[good1, missing.clone(), good2], &ParseOptions::default()).unwrap();
        assert_eq!(report.logs.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].path, missing);
        assert!(report.failed[0].error.contains("Failed to open log file"));
    }

    #[test]
    fn test_majority_failures_fail_the_batch() {
        let dir = TempDir::new().unwrap();
        let good = dir.path().join("a.log");
        fs::write(&good, TEXT_LOG).unwrap();
        let files = vec![good, dir.path().join("x.log"), dir.path().join("y.log")];

        let err = load_logs(&files, &ParseOptions::default()).unwrap_err();
        assert!(err.to_string().contains("2/3 log files could not be read"));
    }

    #[test]
    fn test_empty_batch() {
        let report = load_logs(&[], &ParseOptions::default()).unwrap();
        assert_eq!(report, LoadReport::default());
    }
}
