//! Tool-argument interpreter.
//!
//! Maps a tool name and its raw JSON arguments to a [`ToolPayload`]. Recognition is an
//! exact match on the tool name against a fixed registry; each entry decodes only the
//! fields that tool defines and ignores the rest. Anything else falls back to
//! [`ToolPayload::Generic`] carrying the untouched arguments.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::models::{EditHunk, TodoItem, ToolPayload};

#[derive(Deserialize)]
struct ReadArgs {
    file_path: String,
    #[serde(default)]
    offset: Option<u64>,
    #[serde(default)]
    limit: Option<u64>,
}

#[derive(Deserialize)]
struct WriteArgs {
    file_path: String,
    content: String,
}

#[derive(Deserialize)]
struct EditArgs {
    file_path: String,
    old_string: String,
    new_string: String,
    #[serde(default)]
    replace_all: bool,
}

#[derive(Deserialize)]
struct MultiEditArgs {
    file_path: String,
    edits: Vec<EditItem>,
}

#[derive(Deserialize)]
struct EditItem {
    old_string: String,
    new_string: String,
    #[serde(default)]
    replace_all: bool,
}

#[derive(Deserialize)]
struct GlobArgs {
    pattern: String,
    #[serde(default)]
    path: Option<String>,
}

#[derive(Deserialize)]
struct GrepArgs {
    pattern: String,
    #[serde(default)]
    path: Option<String>,
    #[serde(default)]
    glob: Option<String>,
    #[serde(default)]
    output_mode: Option<String>,
}

#[derive(Deserialize)]
struct BashArgs {
    command: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    timeout: Option<u64>,
}

#[derive(Deserialize)]
struct TodoWriteArgs {
    todos: Vec<TodoItemArgs>,
}

#[derive(Deserialize)]
struct TodoItemArgs {
    content: String,
    status: crate::models::TodoStatus,
    #[serde(default, rename = "activeForm")]
    active_form: Option<String>,
}

#[derive(Deserialize)]
struct LsArgs {
    path: String,
}

#[derive(Deserialize)]
struct WebFetchArgs {
    url: String,
    #[serde(default)]
    prompt: Option<String>,
}

#[derive(Deserialize)]
struct WebSearchArgs {
    query: String,
}

#[derive(Deserialize)]
struct TaskArgs {
    prompt: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    subagent_type: Option<String>,
}

/// Interpret the raw arguments of a tool call
///
/// Returns `None` only when there are no arguments at all (`null`). Unrecognized
/// tools and recognized tools with missing or mistyped required fields yield
/// [`ToolPayload::Generic`].
///
/// # Examples
///
/// ```
/// use agent_log_timeline::interpret_tool_args;
/// use agent_log_timeline::models::ToolPayload;
/// use serde_json::json;
///
/// let payload = interpret_tool_args("Glob", &json!({"pattern": "**/*.rs"}));
/// assert_eq!(payload, Some(ToolPayload::GlobSearch { pattern: "**/*.rs".to_string(), path: None }));
/// ```
pub fn interpret_tool_args(name: &str, args: &Value) -> Option<ToolPayload> {
    if args.is_null() {
        return None;
    }

    let payload = match name {
        "Read" => decode::<ReadArgs>(args).map(|a| ToolPayload::FileRead {
            file_path: a.file_path,
            offset: a.offset,
            limit: a.limit,
        }),
        "Write" => decode::<WriteArgs>(args)
            .map(|a| ToolPayload::FileWrite { file_path: a.file_path, content: a.content }),
        "Edit" => decode::<EditArgs>(args).map(|a| ToolPayload::FileEdit {
            file_path: a.file_path,
            edits: vec![EditHunk {
                old_text: a.old_string,
                new_text: a.new_string,
                replace_all: a.replace_all,
            }],
        }),
        "MultiEdit" => decode::<MultiEditArgs>(args).map(|a| ToolPayload::FileEdit {
            file_path: a.file_path,
            edits: a
                .edits
                .into_iter()
                .map(|e| EditHunk {
                    old_text: e.old_string,
                    new_text: e.new_string,
                    replace_all: e.replace_all,
                })
                .collect(),
        }),
        "Glob" => {
            decode::<GlobArgs>(args).map(|a| ToolPayload::GlobSearch { pattern: a.pattern, path: a.path })
        }
        "Grep" => decode::<GrepArgs>(args).map(|a| ToolPayload::TextSearch {
            pattern: a.pattern,
            path: a.path,
            glob: a.glob,
            output_mode: a.output_mode,
        }),
        "Bash" => decode::<BashArgs>(args).map(|a| ToolPayload::ShellCommand {
            command: a.command,
            description: a.description,
            timeout_ms: a.timeout,
        }),
        "TodoWrite" => decode::<TodoWriteArgs>(args).map(|a| ToolPayload::TodoWrite {
            todos: a
                .todos
                .into_iter()
                .map(|t| TodoItem { content: t.content, status: t.status, active_form: t.active_form })
                .collect(),
        }),
        "LS" => decode::<LsArgs>(args).map(|a| ToolPayload::DirectoryList { path: a.path }),
        "WebFetch" => {
            decode::<WebFetchArgs>(args).map(|a| ToolPayload::WebFetch { url: a.url, prompt: a.prompt })
        }
        "WebSearch" => decode::<WebSearchArgs>(args).map(|a| ToolPayload::WebSearch { query: a.query }),
        "Task" => decode::<TaskArgs>(args).map(|a| ToolPayload::SubAgent {
            prompt: a.prompt,
            description: a.description,
            subagent_type: a.subagent_type,
        }),
        _ => None,
    };

    Some(payload.unwrap_or_else(|| ToolPayload::Generic { args: args.clone() }))
}

/// Decode a registry entry's argument struct; any shape mismatch reads as `None`
fn decode<T: DeserializeOwned>(args: &Value) -> Option<T> {
    match T::deserialize(args) {
        Ok(decoded) => Some(decoded),
        Err(e) => {
            log::debug!("tool arguments did not match the registry shape: {}", e);
            None
        }
    }
}
