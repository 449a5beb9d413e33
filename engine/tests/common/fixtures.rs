//! Test fixtures and data for engine tests

use engine::Record;
use serde_json::json;
use shared::DynamicValues;

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const INPUT: &'static str = "/in";
    pub const OUTPUT: &'static str = "/out";
    pub const AMOUNT: &'static str = "750000.00";

    pub const PU_ID: &'static str = "PU1700000000000-00000000000000AA";
    pub const TX_ID: &'static str = "TX1700000000000-00000000000000BB";

    pub const REQUEST_TEMPLATE: &'static str =
        r#"{"puId":"${puId}","txId":"${txId}","amount":"${amount}","status":"${status}"}"#;
    pub const RESPONSE_TEMPLATE: &'static str = r#"{"status":"${status}"}"#;

    pub fn dynamic_values() -> DynamicValues {
        DynamicValues {
            pu_id: Self::PU_ID.to_string(),
            tx_id: Self::TX_ID.to_string(),
            proc_date: "2024-03-01".to_string(),
            utc_date_time: "2024-03-01T10:00:00.000Z".to_string(),
        }
    }

    pub fn ledger_row() -> Record {
        json!({
            "PU_ID": Self::PU_ID,
            "ACTION_CODE": "DebitClient_CreditClearing",
            "DEBIT_ACCOUNT_ID": "ACME-CORP-DDA",
            "DEBIT_AMOUNT": Self::AMOUNT,
            "CREDIT_ACCOUNT_ID": "PAYROLL-CLR-SUSP",
            "CREDIT_AMOUNT": Self::AMOUNT
        })
        .as_object()
        .cloned()
        .unwrap()
    }

    pub fn event_document() -> Record {
        json!({
            "reqId": Self::TX_ID,
            "source": "InboundAccountingService",
            "eventcode": "EVT.CoreSvc.Status.Accounting.102"
        })
        .as_object()
        .cloned()
        .unwrap()
    }
}
