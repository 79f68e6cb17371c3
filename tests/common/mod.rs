//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Value, json};
use tempfile::TempDir;

/// Builder for JSON-Lines stream logs
pub struct JsonStreamBuilder {
    lines: Vec<String>,
}

impl JsonStreamBuilder {
    /// Create an empty stream
    pub fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Add a `system/init` line
    pub fn init(self, session_id: &str) -> Self {
        self.message(json!({ "type": "system", "subtype": "init", "session_id": session_id }))
    }

    /// Add a `system/init` line with working directory and model
    pub fn init_with(self, session_id: &str, cwd: &str, model: &str) -> Self {
        self.message(json!({
            "type": "system",
            "subtype": "init",
            "session_id": session_id,
            "cwd": cwd,
            "model": model,
            "permissionMode": "default",
            "claude_code_version": "1.0.98",
        }))
    }

    /// Add a user message with one text block
    pub fn user_text(self, text: &str) -> Self {
        self.message(json!({
            "type": "user",
            "message": { "role": "user", "content": [{ "type": "text", "text": text }] },
        }))
    }

    /// Add a user message carrying one tool result
    pub fn tool_result(self, content: Value, is_error: bool) -> Self {
        self.message(json!({
            "type": "user",
            "message": {
                "role": "user",
                "content": [{
                    "type": "tool_result",
                    "tool_use_id": "toolu_01",
                    "content": content,
                    "is_error": is_error,
                }],
            },
        }))
    }

    /// Add an assistant message with one text block
    pub fn assistant_text(self, text: &str) -> Self {
        self.assistant_blocks(vec![Self::text_block(text)])
    }

    /// Add an assistant message with arbitrary content blocks
    pub fn assistant_blocks(self, blocks: Vec<Value>) -> Self {
        self.message(json!({
            "type": "assistant",
            "message": { "role": "assistant", "content": blocks },
        }))
    }

    /// Add a `result` line
    pub fn result(self, text: &str, is_error: bool) -> Self {
        self.message(json!({
            "type": "result",
            "subtype": if is_error { "error_during_execution" } else { "success" },
            "is_error": is_error,
            "result": text,
            "duration_ms": 1200,
            "total_cost_usd": 0.25,
        }))
    }

    /// Add any JSON value as one line
    pub fn message(mut self, value: Value) -> Self {
        self.lines.push(value.to_string());
        self
    }

    /// Add a raw line verbatim
    pub fn raw(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    pub fn text_block(text: &str) -> Value {
        json!({ "type": "text", "text": text })
    }

    pub fn thinking_block(text: &str) -> Value {
        json!({ "type": "thinking", "thinking": text })
    }

    pub fn tool_use_block(name: &str, input: Value) -> Value {
        json!({ "type": "tool_use", "id": "toolu_01", "name": name, "input": input })
    }

    /// Join lines into the log text
    pub fn build(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

impl Default for JsonStreamBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for marker-text logs
pub struct MarkerLogBuilder {
    lines: Vec<String>,
}

impl MarkerLogBuilder {
    /// Start with a session banner and the given header fields
    pub fn new(version: &str, header: &[(&str, &str)]) -> Self {
        let mut lines = vec![format!("OpenAI Codex v{} (research preview)", version)];
        lines.push("--------".to_string());
        for (key, value) in header {
            lines.push(format!("{}: {}", key, value));
        }
        lines.push("--------".to_string());
        Self { lines }
    }

    /// Banner with a typical header
    pub fn standard() -> Self {
        Self::new(
            "0.46.0",
            &[
                ("workdir", "/home/project"),
                ("model", "gpt-5-codex"),
                ("provider", "openai"),
                ("approval", "never"),
                ("sandbox", "workspace-write"),
                ("session id", "0199a1b2-c3d4"),
            ],
        )
    }

    /// Add a marker header followed by body lines
    pub fn block(mut self, marker: &str, body: &str) -> Self {
        self.lines.push(marker.to_string());
        self.lines.extend(body.lines().map(str::to_string));
        self
    }

    pub fn user(self, text: &str) -> Self {
        self.block("user", text)
    }

    pub fn codex(self, text: &str) -> Self {
        self.block("codex", text)
    }

    pub fn thinking(self, text: &str) -> Self {
        self.block("thinking", text)
    }

    /// `exec` header and a `command in dir` line
    pub fn exec(self, command: &str, workdir: &str) -> Self {
        self.block("exec", &format!("{} in {}", command, workdir))
    }

    pub fn succeeded(self, duration_ms: u64, output: &str) -> Self {
        self.block(&format!("succeeded in {}ms:", duration_ms), output)
    }

    pub fn exited(self, code: i32, duration_ms: u64, output: &str) -> Self {
        self.block(&format!("exited {} in {}ms:", code, duration_ms), output)
    }

    pub fn tool(self, name: &str, args: &str) -> Self {
        self.line(&format!("tool {}({})", name, args))
    }

    pub fn tokens_used(self, value: &str) -> Self {
        self.line(&format!("tokens used: {}", value))
    }

    /// Add a raw line verbatim
    pub fn line(mut self, line: &str) -> Self {
        self.lines.push(line.to_string());
        self
    }

    pub fn build(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

/// Builder for directories of log files
pub struct LogDirBuilder {
    temp_dir: TempDir,
}

impl LogDirBuilder {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Write a file (creating parent directories) with the given content
    pub fn with_file(self, relative: &str, content: &str) -> Self {
        write_file(self.temp_dir.path(), relative, content);
        self
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for LogDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn write_file(dir: &Path, relative: &str, content: &str) -> PathBuf {
    let path = dir.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create parent dir");
    }
    fs::write(&path, content).expect("Failed to write log file");
    path
}

/// A Codex run with a command, a failing check and a patch
pub fn realistic_marker_log() -> String {
    MarkerLogBuilder::standard()
        .user("Fix the failing test in parser.rs")
        .thinking("**Inspecting the test**")
        .exec("bash -lc 'cargo test'", "/home/project")
        .exited(101, 5400, "test parser::tests::it_works ... FAILED")
        .codex("The assertion compares the wrong field. Patching it now.")
        .line("file update:")
        .line("diff --git a/src/parser.rs b/src/parser.rs")
        .line("--- a/src/parser.rs")
        .line("+++ b/src/parser.rs")
        .line("@@ -1,3 +1,3 @@")
        .line("-    assert_eq!(a, b);")
        .line("+    assert_eq!(a, c);")
        .exec("bash -lc 'cargo test'", "/home/project")
        .succeeded(4800, "test result: ok. 12 passed")
        .codex("Fixed: the test now passes.")
        .line("tokens used")
        .line("12,345")
        .build()
}

/// A stream-json run with a file read and a final result
pub fn realistic_json_log() -> String {
    JsonStreamBuilder::new()
        .init_with("sess-1", "/home/project", "claude-sonnet-4-5")
        .user_text("Summarize README.md")
        .assistant_blocks(vec![
            JsonStreamBuilder::thinking_block("Need to read the file first"),
            JsonStreamBuilder::text_block("Reading the README."),
            JsonStreamBuilder::tool_use_block("Read", json!({ "file_path": "/home/project/README.md" })),
        ])
        .tool_result(json!("# Project\nA small tool."), false)
        .assistant_text("It is a small tool.")
        .result("It is a small tool.", false)
        .build()
}
