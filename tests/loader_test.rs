/// Batch loading tests: discovery over directories plus parallel parsing
mod common;

use std::path::PathBuf;

use agent_log_timeline::loader::{MAX_LOG_FILES, discover_log_files, load_logs};
use agent_log_timeline::{LogFormat, ParseOptions};
use common::{LogDirBuilder, realistic_json_log, realistic_marker_log, write_file};

#[test]
fn test_load_mixed_directory() {
    let dir = LogDirBuilder::new()
        .with_file("a/codex.log", &realistic_marker_log())
        .with_file("b/claude.jsonl", &realistic_json_log())
        .with_file("c/plain.txt", "nothing recognizable")
        .build();

    let files = discover_log_files(&[dir.path().to_path_buf()]).unwrap();
    assert_eq!(files.len(), 3);

    let report = load_logs(&files, &ParseOptions::default()).unwrap();
    let formats: Vec<_> = report.logs.iter().map(|log| log.format).collect();

    assert_eq!(formats, vec![Some(LogFormat::MarkerText), Some(LogFormat::JsonStream), None]);
    assert_eq!(report.session_count(), 2);
    assert!(report.failed.is_empty());
}

#[test]
fn test_load_applies_options_to_every_file() {
    let dir = LogDirBuilder::new()
        .with_file("codex.log", &realistic_marker_log())
        .with_file("claude.jsonl", &realistic_json_log())
        .build();
    let files = discover_log_files(&[dir.path().to_path_buf()]).unwrap();

    let options = ParseOptions { format: Some(LogFormat::JsonStream), ..Default::default() };
    let report = load_logs(&files, &options).unwrap();

    assert_eq!(report.session_count(), 1);
    assert_eq!(report.logs[0].path.file_name().unwrap(), "claude.jsonl");
}

#[test]
fn test_load_invalid_utf8_file() {
    let dir = LogDirBuilder::new().build();
    let path = dir.path().join("broken.log");
    let mut bytes = b"OpenAI Codex v0.46.0\nuser\nbad ".to_vec();
    bytes.extend_from_slice(&[0xff, 0xfe]);
    bytes.extend_from_slice(b" bytes\n");
    std::fs::write(&path, bytes).unwrap();

    let report = load_logs(&[path], &ParseOptions::default()).unwrap();
    assert_eq!(report.logs[0].sessions.len(), 1);
}

#[test]
fn test_discover_mixes_files_and_directories() {
    let dir = LogDirBuilder::new().with_file("logs/one.log", "x").build();
    let explicit = write_file(dir.path(), "capture.data", "x");

    let files =
        discover_log_files(&[explicit.clone(), dir.path().join("logs")]).unwrap();

    assert_eq!(files, vec![explicit, dir.path().join("logs/one.log")]);
}

#[test]
fn test_discover_enforces_file_limit() {
    let paths: Vec<PathBuf> =
        (0..=MAX_LOG_FILES).map(|i| PathBuf::from(format!("/tmp/{}.log", i))).collect();

    let err = discover_log_files(&paths).unwrap_err();
    assert!(err.to_string().contains("Resource limit exceeded"));
}
