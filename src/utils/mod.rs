pub mod chunks;
pub mod environment;
pub mod paths;
pub mod terminal;

pub use chunks::join_chunks;
pub use environment::{debug_logging_enabled, default_log_filter};
pub use paths::{format_path_with_tilde, read_log_file, validate_file_size};
pub use terminal::sanitize;
