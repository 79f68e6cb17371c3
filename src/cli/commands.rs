use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use crate::loader::{ParsedLog, discover_log_files, load_logs};
use crate::models::SessionSummary;
use crate::parsers::{DEFAULT_TOOL_RESULT_CHAR_LIMIT, LogFormat, ParseOptions, parse_with};
use crate::utils::paths::decode_lossy;
use crate::utils::terminal::sanitize_truncated;
use crate::utils::{format_path_with_tilde, read_log_file};

/// Longest log-supplied value printed by `stats`
const MAX_DISPLAY_CHARS: usize = 80;

#[derive(Parser)]
#[command(name = "agent-log-timeline")]
#[command(version = "0.1.0")]
#[command(about = "Turn captured AI coding-assistant output into a conversation timeline", long_about = None)]
pub struct Cli {
    /// Only try this log format (json or text) instead of auto-detecting
    #[arg(long, global = true)]
    pub format: Option<LogFormat>,

    /// Skip JSON tool results whose serialized form is this many characters or longer
    #[arg(long, global = true, default_value_t = DEFAULT_TOOL_RESULT_CHAR_LIMIT)]
    pub result_limit: usize,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Parse a log and print its sessions as JSON
    Parse {
        /// Log file, or `-` for stdin
        input: String,

        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Print which format a log parses as (json, text or none)
    Detect {
        /// Log file, or `-` for stdin
        input: String,
    },
    /// Show per-session statistics for log files and directories
    Stats {
        /// Log files or directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,
    },
}

impl Cli {
    fn parse_options(&self) -> ParseOptions {
        ParseOptions { tool_result_char_limit: self.result_limit, format: self.format }
    }
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let options = cli.parse_options();

    match &cli.command {
        Some(Commands::Parse { input, pretty }) => {
            parse_command(input, *pretty, &options)?;
        }
        Some(Commands::Detect { input }) => {
            detect_command(input, &options)?;
        }
        Some(Commands::Stats { paths }) => {
            show_stats(paths, &options)?;
        }
        None => {
            println!("Use --help for usage information");
        }
    }

    Ok(())
}

/// Read a log from a path, or from stdin when the path is `-`
fn read_input(input: &str) -> Result<String> {
    if input == "-" {
        let mut bytes = Vec::new();
        io::stdin().read_to_end(&mut bytes).context("Failed to read log from stdin")?;
        return Ok(decode_lossy(bytes));
    }
    read_log_file(Path::new(input))
}

fn parse_command(input: &str, pretty: bool, options: &ParseOptions) -> Result<()> {
    let text = read_input(input)?;
    let outcome = parse_with(&text, options);

    let json = if pretty {
        serde_json::to_string_pretty(&outcome)
    } else {
        serde_json::to_string(&outcome)
    }
    .context("Failed to serialize parsed sessions")?;

    println!("{}", json);
    Ok(())
}

fn detect_command(input: &str, options: &ParseOptions) -> Result<()> {
    let text = read_input(input)?;
    match parse_with(&text, options).format {
        Some(format) => println!("{}", format),
        None => println!("none"),
    }
    Ok(())
}

fn show_stats(paths: &[PathBuf], options: &ParseOptions) -> Result<()> {
    let files = discover_log_files(paths)?;
    let report = load_logs(&files, options)?;

    println!("Agent Log Statistics");
    println!("====================");

    for log in &report.logs {
        print_log(log);
    }

    for failed in &report.failed {
        eprintln!("Failed: {}: {}", format_path_with_tilde(&failed.path), failed.error);
    }

    println!();
    println!(
        "{} file(s), {} session(s), {} failed",
        report.logs.len(),
        report.session_count(),
        report.failed.len()
    );

    Ok(())
}

fn print_log(log: &ParsedLog) {
    println!();
    let format = log.format.map_or("none", LogFormat::name);
    println!("{} ({})", format_path_with_tilde(&log.path), format);

    if log.sessions.is_empty() {
        println!("  No sessions found");
        return;
    }

    for (index, session) in log.sessions.iter().enumerate() {
        let summary = SessionSummary::from_session(session);
        let meta = &summary.meta;

        let label = meta.context_id.as_deref().map(|id| sanitize_truncated(id, MAX_DISPLAY_CHARS));
        match label {
            Some(id) => println!("  Session {}: {}", index + 1, id),
            None => println!("  Session {}", index + 1),
        }

        if let Some(model) = &meta.model {
            println!("    Model: {}", sanitize_truncated(model, MAX_DISPLAY_CHARS));
        }
        if let Some(workdir) = &meta.workdir {
            let workdir = format_path_with_tilde(Path::new(workdir));
            println!("    Workdir: {}", sanitize_truncated(&workdir, MAX_DISPLAY_CHARS));
        }
        if let Some(version) = &meta.version {
            println!("    Version: {}", sanitize_truncated(version, MAX_DISPLAY_CHARS));
        }

        println!("    Events: {}", summary.total_events);
        for (kind, count) in &summary.event_counts {
            println!("      {}: {}", kind, count);
        }

        if !summary.tool_calls.is_empty() {
            println!("    Tools:");
            for (name, count) in &summary.tool_calls {
                println!("      {}: {}", sanitize_truncated(name, MAX_DISPLAY_CHARS), count);
            }
        }

        println!("    Failed results: {}", summary.failed_results);
        if let Some(tokens) = &summary.tokens_used {
            println!("    Tokens used: {}", sanitize_truncated(tokens, MAX_DISPLAY_CHARS));
        }
        if let Some(cost) = meta.cost_usd {
            println!("    Cost: ${:.4}", cost);
        }
        if let Some(duration_ms) = meta.duration_ms {
            println!("    Duration: {}ms", duration_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "agent-log-timeline",
            "parse",
            "run.log",
            "--format",
            "text",
            "--result-limit",
            "100",
            "--pretty",
        ])
        .unwrap();

        let options = cli.parse_options();
        assert_eq!(options.format, Some(LogFormat::MarkerText));
        assert_eq!(options.tool_result_char_limit, 100);
        assert!(matches!(cli.command, Some(Commands::Parse { pretty: true, .. })));
    }

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["agent-log-timeline", "detect", "-"]).unwrap();
        assert_eq!(cli.parse_options(), ParseOptions::default());
    }

    #[test]
    fn test_cli_rejects_unknown_format() {
        assert!(Cli::try_parse_from(["agent-log-timeline", "--format", "yaml", "detect", "x"]).is_err());
    }

    #[test]
    fn test_stats_requires_a_path() {
        assert!(Cli::try_parse_from(["agent-log-timeline", "stats"]).is_err());
    }

    #[test]
    fn test_no_subcommand_is_allowed() {
        let cli = Cli::try_parse_from(["agent-log-timeline"]).unwrap();
        assert!(cli.command.is_none());
    }
}
