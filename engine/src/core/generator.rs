//! Dynamic value generation
//!
//! Identifiers combine the current epoch milliseconds with 64 random bits, so
//! two ids collide only when drawn in the same millisecond with the same
//! random suffix.

use chrono::{Local, SecondsFormat, Utc};
use shared::DynamicValues;

use crate::traits::ValueSource;

/// Value source backed by the system clock and thread-local randomness
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemValueSource;

impl SystemValueSource {
    pub fn new() -> Self {
        Self
    }
}

impl ValueSource for SystemValueSource {
    fn generate(&self) -> DynamicValues {
        DynamicValues {
            pu_id: unique_id("PU"),
            tx_id: unique_id("TX"),
            proc_date: proc_date(),
            utc_date_time: utc_timestamp(),
        }
    }
}

/// `<prefix><epoch millis>-<16 hex digits>`
pub fn unique_id(prefix: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix: u64 = rand::random();
    format!("{prefix}{millis}-{suffix:016X}")
}

/// Today in the local clock, `YYYY-MM-DD`
pub fn proc_date() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Now in UTC, e.g. `2024-03-01T10:15:30.123Z`
pub fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
