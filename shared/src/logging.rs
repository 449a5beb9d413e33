//! Shared logging utilities for consistent tracing across the engine and runner

use chrono::{DateTime, Utc};
use tracing::{error, info};

/// Build the default filter directive for a base level
pub fn filter_directive(base_level: &str) -> String {
    format!("runner={base_level},engine={base_level},shared={base_level},reqwest=warn,hyper=warn")
}

/// Initialize tracing subscriber with an optional log level
///
/// `RUST_LOG`, when set, overrides the computed filter.
pub fn init_tracing_with_level(log_level: Option<&str>) {
    use tracing_subscriber::{EnvFilter, fmt};

    let base_level = log_level.unwrap_or("info");
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter_directive(base_level)));

    // A second init (e.g. from tests) is harmless
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
}

pub fn init_tracing() {
    init_tracing_with_level(None);
}

/// Get formatted timestamp for consistent logging
pub fn format_timestamp() -> String {
    let now: DateTime<Utc> = Utc::now();
    now.format("%H:%M:%S%.3f").to_string()
}

/// Macro for case-aware info logging
#[macro_export]
macro_rules! case_info {
    ($case:expr, $($arg:tt)*) => {
        tracing::info!(
            case = %$case,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for case-aware warning logging
#[macro_export]
macro_rules! case_warn {
    ($case:expr, $($arg:tt)*) => {
        tracing::warn!(
            case = %$case,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for case-aware error logging
#[macro_export]
macro_rules! case_error {
    ($case:expr, $($arg:tt)*) => {
        tracing::error!(
            case = %$case,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Macro for case-aware debug logging
#[macro_export]
macro_rules! case_debug {
    ($case:expr, $($arg:tt)*) => {
        tracing::debug!(
            case = %$case,
            timestamp = $crate::logging::format_timestamp(),
            $($arg)*
        );
    };
}

/// Contextual logging helper for case start
pub fn log_case_start(case: &str, details: &str) {
    info!(
        case = %case,
        timestamp = format_timestamp(),
        "🧪 Starting {}",
        details
    );
}

/// Contextual logging helper for a passing case
pub fn log_case_pass(case: &str, elapsed_ms: u128) {
    info!(
        case = %case,
        timestamp = format_timestamp(),
        elapsed_ms = elapsed_ms as u64,
        "✅ PASSED"
    );
}

/// Contextual logging helper for a failing case
pub fn log_case_failure(case: &str, phase: &dyn std::fmt::Display, reason: &dyn std::fmt::Display) {
    error!(
        case = %case,
        timestamp = format_timestamp(),
        phase = %phase,
        "❌ FAILED in {}: {}",
        phase,
        reason
    );
}

/// Contextual logging helper for phase transitions
pub fn log_phase(case: &str, phase: &str, details: &str) {
    info!(
        case = %case,
        timestamp = format_timestamp(),
        "📋 {}: {}",
        phase,
        details
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_directive() {
        let directive = filter_directive("debug");
        assert!(directive.starts_with("runner=debug,engine=debug,shared=debug"));
        assert!(directive.ends_with("reqwest=warn,hyper=warn"));
    }

    #[test]
    fn test_timestamp_format() {
        let ts = format_timestamp();
        // HH:MM:SS.mmm
        assert_eq!(ts.len(), 12);
        assert_eq!(&ts[2..3], ":");
        assert_eq!(&ts[8..9], ".");
    }
}
