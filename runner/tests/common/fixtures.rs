//! Test fixtures and data for runner tests

use serde_json::{Value, json};

/// Standard test data and fixtures
pub struct TestFixtures;

impl TestFixtures {
    pub const INPUT: &'static str = "/payments/in";
    pub const OUTPUT: &'static str = "/payments/out";

    pub const REQUEST_TEMPLATE: &'static str = r#"{"txId":"${txId}","status":"${status}"}"#;
    pub const RESPONSE_TEMPLATE: &'static str = r#"{"status":"${status}","ref":"@Ignore@"}"#;

    /// Descriptor expecting `status` in the reply
    pub fn descriptor(name: &str, status: &str) -> Value {
        json!({
            "metadata": { "name": name },
            "templateData": {
                "templatePath": "templates/request.json",
                "parameters": { "status": status }
            },
            "messaging": {
                "inputChannel": Self::INPUT,
                "reply": {
                    "destination": Self::OUTPUT,
                    "timeout": 1000,
                    "responseTemplatePath": "templates/response.json"
                }
            }
        })
    }

    pub fn ok_reply() -> Value {
        json!({ "status": "OK", "ref": "R-1" })
    }
}
