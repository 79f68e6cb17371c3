use std::env;

/// Environment variable that turns on debug diagnostics from the parsers
pub const DEBUG_ENV_VAR: &str = "AGENT_LOG_TIMELINE_DEBUG";

/// Whether debug logging was requested through [`DEBUG_ENV_VAR`]
///
/// Any non-empty value other than `0` counts as enabled.
pub fn debug_logging_enabled() -> bool {
    env::var(DEBUG_ENV_VAR)
        .map(|value| {
            let trimmed = value.trim();
            !trimmed.is_empty() && trimmed != "0"
        })
        .unwrap_or(false)
}

/// Default `env_logger` filter when `RUST_LOG` is not set
pub fn default_log_filter() -> &'static str {
    if debug_logging_enabled() { "debug" } else { "warn" }
}

#[cfg(test)]
mod tests {
    use std::env;

    use super::*;

    /// Run `check` with the debug variable set to `value` (or removed), then restore it
    fn with_debug_var(value: Option<&str>, check: impl FnOnce()) {
        let original = env::var(DEBUG_ENV_VAR).ok();

        // SAFETY: Setting environment variables in tests is safe as long as:
        // 1. Only this module's tests touch this variable (we restore it)
        // 2. No other threads read it concurrently
        unsafe {
            match value {
                Some(v) => env::set_var(DEBUG_ENV_VAR, v),
                None => env::remove_var(DEBUG_ENV_VAR),
            }
        }

        check();

        unsafe {
            match original {
                Some(v) => env::set_var(DEBUG_ENV_VAR, v),
                None => env::remove_var(DEBUG_ENV_VAR),
            }
        }
    }

    // One test so the cases never race each other on the shared variable
    #[test]
    fn test_debug_logging_env_values() {
        with_debug_var(None, || {
            assert!(!debug_logging_enabled());
            assert_eq!(default_log_filter(), "warn");
        });
        with_debug_var(Some("1"), || {
            assert!(debug_logging_enabled());
            assert_eq!(default_log_filter(), "debug");
        });
        with_debug_var(Some("0"), || assert!(!debug_logging_enabled()));
        with_debug_var(Some("   "), || assert!(!debug_logging_enabled()));
    }
}
