//! Parser for the marker-text log format.
//!
//! The text format is free-form output with marker lines (`user`, `codex`, `exec`,
//! `succeeded in 12ms:`, `file update:`, ...) that open a new event. A single cursor walks
//! the lines; each block-opening marker collects every following line up to, but not
//! including, the next marker line. Lines before the first session banner are ignored.
//!
//! Exit-coded outcomes are always reported as [`LogEvent::ToolResult`]: no call stack is
//! kept, so the parser cannot tell whether the outcome belongs to a shell exec.

use crate::models::{ConversationSession, LogEvent, NoteChannel, SessionMeta, StatName};
use crate::parsers::markers::{
    Line, Marker, apply_meta, is_dash_rule, is_marker, is_token_value, parse_meta_line, recognize,
    split_exec_command,
};

/// How far a collected block extends
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Block {
    /// Up to the next marker line
    Text,
    /// Like `Text`, but diff body lines and further diff starts stay in the block
    Patch,
}

struct MarkerTextParser<'a> {
    lines: Vec<Line<'a>>,
    cursor: usize,
    sessions: Vec<ConversationSession>,
}

/// Parse marker-text output into sessions
///
/// Returns `None` when no session banner was found, meaning the input is not in this
/// format.
pub fn try_parse(text: &str) -> Option<Vec<ConversationSession>> {
    let lines = text.split('\n').map(Line::new).collect();
    let mut parser = MarkerTextParser { lines, cursor: 0, sessions: Vec::new() };
    parser.run();

    if parser.sessions.is_empty() {
        log::debug!("marker-text parser found no session banner");
        return None;
    }
    Some(parser.sessions)
}

impl<'a> MarkerTextParser<'a> {
    fn run(&mut self) {
        while let Some(line) = self.next_line() {
            let marker = recognize(line.trimmed);

            if let Some(Marker::SessionBanner { version }) = marker {
                self.open_session(version);
                continue;
            }

            // Well-formed logs always begin with a banner
            if self.sessions.is_empty() {
                continue;
            }

            match marker {
                Some(marker) => self.handle_marker(marker, line),
                None if line.is_blank() || is_dash_rule(line.trimmed) => {}
                None => self.emit(LogEvent::Unknown { raw: line.raw.to_string() }),
            }
        }
    }

    fn next_line(&mut self) -> Option<Line<'a>> {
        let line = self.lines.get(self.cursor).copied()?;
        self.cursor += 1;
        Some(line)
    }

    fn peek(&self) -> Option<Line<'a>> {
        self.lines.get(self.cursor).copied()
    }

    fn emit(&mut self, event: LogEvent) {
        if let Some(session) = self.sessions.last_mut() {
            session.push(event);
        }
    }

    /// Read the dash-ruled `key: value` block after a banner and open the session
    fn open_session(&mut self, version: Option<&str>) {
        let mut meta = SessionMeta { version: version.map(str::to_string), ..Default::default() };

        if self.peek().is_some_and(|line| is_dash_rule(line.trimmed)) {
            self.cursor += 1;
            while let Some(line) = self.peek() {
                if is_dash_rule(line.trimmed) {
                    self.cursor += 1;
                    break;
                }
                // Unterminated header: leave the marker for the main loop
                if is_marker(line.trimmed) {
                    break;
                }
                self.cursor += 1;
                match parse_meta_line(line.trimmed) {
                    Some((key, value)) => {
                        if !apply_meta(&mut meta, key, value) {
                            log::debug!("ignoring session header key '{}'", key);
                        }
                    }
                    None if line.is_blank() => {}
                    None => log::debug!("ignoring session header line '{}'", line.trimmed),
                }
            }
        }

        self.sessions.push(ConversationSession::open(meta));
    }

    fn handle_marker(&mut self, marker: Marker<'a>, line: Line<'a>) {
        match marker {
            // Banners are handled by the main loop before dispatch
            Marker::SessionBanner { .. } => {}
            Marker::User => {
                let text = self.collect_block(Block::Text);
                self.emit_text(text, |text| LogEvent::User { text });
            }
            Marker::Assistant => {
                let text = self.collect_block(Block::Text);
                self.emit_text(text, |text| LogEvent::Assistant { text });
            }
            Marker::Thinking => {
                let text = self.collect_block(Block::Text);
                self.emit_text(text, |text| LogEvent::Note { channel: NoteChannel::Thinking, text });
            }
            Marker::PlanUpdate => {
                let text = self.collect_block(Block::Text);
                self.emit_text(text, |text| LogEvent::PlanUpdate { text });
            }
            Marker::ExecCall => {
                let (command, workdir) = match self.peek() {
                    Some(next) if !next.is_blank() && !is_marker(next.trimmed) => {
                        self.cursor += 1;
                        split_exec_command(next.trimmed)
                    }
                    _ => (String::new(), None),
                };
                self.emit(LogEvent::ExecCall { command, workdir });
            }
            Marker::Succeeded { duration_ms } => {
                let text = non_empty(self.collect_block(Block::Text));
                self.emit(LogEvent::ExecResult { ok: true, code: None, duration_ms, text });
            }
            Marker::Exited { code, duration_ms } => {
                let text = non_empty(self.collect_block(Block::Text));
                self.emit(LogEvent::ToolResult { ok: code == 0, code: Some(code), duration_ms, text });
            }
            Marker::ToolCall { name, args } => {
                self.emit(LogEvent::ToolCall {
                    name: name.to_string(),
                    args_text: args.to_string(),
                    data: None,
                });
            }
            Marker::FileUpdate => {
                let diff = self.collect_block(Block::Patch);
                self.emit(LogEvent::Patch { header: line.trimmed.to_string(), diff });
            }
            Marker::DiffStart => {
                let rest = self.collect_block(Block::Patch);
                let diff = if rest.is_empty() {
                    line.content.to_string()
                } else {
                    format!("{}\n{}", line.content, rest)
                };
                self.emit(LogEvent::Patch { header: line.trimmed.to_string(), diff });
            }
            Marker::TokensUsed { value } => {
                let value = match value {
                    Some(value) => value.to_string(),
                    None => self.take_token_value(),
                };
                self.emit(LogEvent::Stats { name: StatName::TokensUsed, value });
            }
            Marker::TotalOutputLines => {
                self.emit(LogEvent::Note {
                    channel: NoteChannel::System,
                    text: line.trimmed.to_string(),
                });
            }
            Marker::Truncated { reason } => {
                self.emit(LogEvent::Truncated { reason: reason.to_string() });
            }
        }
    }

    /// Newer CLI versions print the count on the line after `tokens used`
    fn take_token_value(&mut self) -> String {
        match self.peek() {
            Some(next) if is_token_value(next.trimmed) => {
                self.cursor += 1;
                next.trimmed.to_string()
            }
            _ => String::new(),
        }
    }

    fn emit_text(&mut self, text: String, build: impl FnOnce(String) -> LogEvent) {
        if !text.is_empty() {
            self.emit(build(text));
        }
    }

    /// Consume lines up to the next marker, trimming trailing blank lines
    fn collect_block(&mut self, block: Block) -> String {
        let start = self.cursor;
        while let Some(line) = self.peek() {
            if ends_block(block, &line) {
                break;
            }
            self.cursor += 1;
        }

        let mut collected: Vec<&str> =
            self.lines[start..self.cursor].iter().map(|line| line.content).collect();
        while collected.last().is_some_and(|content| content.trim().is_empty()) {
            collected.pop();
        }
        collected.join("\n")
    }
}

fn ends_block(block: Block, line: &Line<'_>) -> bool {
    match block {
        Block::Text => is_marker(line.trimmed),
        Block::Patch => {
            if line.is_diff_change() {
                return false;
            }
            match recognize(line.trimmed) {
                None | Some(Marker::DiffStart) => false,
                // Outcome lines are printed indented right after the patch
                Some(Marker::Succeeded { .. } | Marker::Exited { .. }) => true,
                Some(_) => !line.is_diff_context(),
            }
        }
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.is_empty() { None } else { Some(text) }
}
