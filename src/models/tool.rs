use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One old/new replacement of a file edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EditHunk {
    pub old_text: String,
    pub new_text: String,
    #[serde(default)]
    pub replace_all: bool,
}

/// Status of a todo-list entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoStatus {
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    pub content: String,
    pub status: TodoStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_form: Option<String>,
}

/// Interpreted arguments of a recognized tool call
///
/// Only the fields each tool defines are kept. Calls the registry does not
/// recognize, or whose required fields are missing or mistyped, carry their
/// raw argument object in [`ToolPayload::Generic`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case", rename_all_fields = "camelCase")]
pub enum ToolPayload {
    FileRead {
        file_path: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        offset: Option<u64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        limit: Option<u64>,
    },
    FileWrite {
        file_path: String,
        content: String,
    },
    FileEdit {
        file_path: String,
        edits: Vec<EditHunk>,
    },
    GlobSearch {
        pattern: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
    },
    TextSearch {
        pattern: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        path: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        glob: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        output_mode: Option<String>,
    },
    ShellCommand {
        command: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        timeout_ms: Option<u64>,
    },
    TodoWrite {
        todos: Vec<TodoItem>,
    },
    DirectoryList {
        path: String,
    },
    WebFetch {
        url: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        prompt: Option<String>,
    },
    WebSearch {
        query: String,
    },
    SubAgent {
        prompt: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        description: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        subagent_type: Option<String>,
    },
    Generic {
        args: Value,
    },
}

impl ToolPayload {
    /// File the call touches, for payloads that name one
    pub fn file_path(&self) -> Option<&str> {
        match self {
            ToolPayload::FileRead { file_path, .. }
            | ToolPayload::FileWrite { file_path, .. }
            | ToolPayload::FileEdit { file_path, .. } => Some(file_path),
            _ => None,
        }
    }

    pub fn is_generic(&self) -> bool {
        matches!(self, ToolPayload::Generic { .. })
    }
}
