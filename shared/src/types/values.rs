//! Per-run generated values

use serde::{Deserialize, Serialize};

/// Values generated fresh for every test case execution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DynamicValues {
    /// Identifier of the unit of work under test
    pub pu_id: String,
    /// Identifier of the exchanged message
    pub tx_id: String,
    /// Local calendar date, `YYYY-MM-DD`
    pub proc_date: String,
    /// UTC timestamp, ISO-8601
    pub utc_date_time: String,
}

impl DynamicValues {
    pub const PU_ID_KEY: &'static str = "puId";
    pub const TX_ID_KEY: &'static str = "txId";
    pub const PROC_DATE_KEY: &'static str = "procDate";
    pub const UTC_DATE_TIME_KEY: &'static str = "utcDateTime";

    /// Payload entries in key order
    pub fn entries(&self) -> [(&'static str, &str); 4] {
        [
            (Self::PU_ID_KEY, self.pu_id.as_str()),
            (Self::TX_ID_KEY, self.tx_id.as_str()),
            (Self::PROC_DATE_KEY, self.proc_date.as_str()),
            (Self::UTC_DATE_TIME_KEY, self.utc_date_time.as_str()),
        ]
    }
}
