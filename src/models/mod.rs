//! Data models for parsed agent CLI logs.
//!
//! This module defines the timeline handed to rendering and export consumers:
//!
//! - [`ConversationSession`] - One CLI run: its [`SessionMeta`] and ordered events
//! - [`LogEvent`] - Closed set of typed timeline events
//! - [`ToolPayload`] - Interpreted arguments of recognized tool calls
//! - [`SessionSummary`] - Per-session tallies for reporting
//!
//! All models derive serde traits. Events serialize internally tagged by `type`
//! with camelCase fields, so the JSON output matches what timeline viewers expect.

pub mod event;
pub mod session;
pub mod summary;
pub mod tool;

pub use event::{LogEvent, NoteChannel, StatName};
pub use session::{ConversationSession, SessionMeta};
pub use summary::SessionSummary;
pub use tool::{EditHunk, TodoItem, TodoStatus, ToolPayload};
