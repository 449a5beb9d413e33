//! Declarative test case descriptor
//!
//! A descriptor is the unit of test intent: which request template to render,
//! where to publish it, where the reply arrives, what it should look like and
//! which downstream stores must eventually reflect the transaction.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::time::Duration;

use crate::errors::{SharedError, SharedResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseDescriptor {
    pub metadata: CaseMetadata,
    pub template_data: TemplateData,
    pub messaging: Messaging,
    #[serde(default)]
    pub store_verifications: Vec<VerificationGroup>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseMetadata {
    /// Display name, also the identity of the test case
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateData {
    /// Request template, relative to the descriptor file
    pub template_path: String,
    /// Static substitution values
    #[serde(default)]
    pub parameters: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Messaging {
    pub input_channel: String,
    pub reply: ReplySpec,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplySpec {
    pub destination: String,
    /// Milliseconds to wait for the reply
    #[serde(default, rename = "timeout", skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Expected response template, relative to the descriptor file
    pub response_template_path: String,
}

impl ReplySpec {
    pub fn timeout_or(&self, default: Duration) -> Duration {
        self.timeout_ms.map(Duration::from_millis).unwrap_or(default)
    }
}

/// One named check against one downstream store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationGroup {
    pub name: String,
    #[serde(flatten)]
    pub target: StoreTarget,
    /// Exact number of rows/documents required before assertions are checked
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_count: Option<usize>,
    /// Milliseconds to wait for convergence
    #[serde(default, rename = "timeout", skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    #[serde(default, alias = "verification")]
    pub assertions: Vec<FieldAssertion>,
}

impl VerificationGroup {
    pub fn timeout_or(&self, default: Duration) -> Duration {
        self.timeout_ms.map(Duration::from_millis).unwrap_or(default)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "store", rename_all = "lowercase")]
pub enum StoreTarget {
    Relational {
        query: String,
    },
    Document {
        collection: String,
        filter: serde_json::Value,
    },
}

impl StoreTarget {
    pub fn kind(&self) -> StoreKind {
        match self {
            StoreTarget::Relational { .. } => StoreKind::Relational,
            StoreTarget::Document { .. } => StoreKind::Document,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreKind {
    Relational,
    Document,
}

impl fmt::Display for StoreKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreKind::Relational => write!(f, "relational"),
            StoreKind::Document => write!(f, "document"),
        }
    }
}

/// Expected value template for one field of the first returned row/document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldAssertion {
    pub field: String,
    pub value: String,
}

impl TestCaseDescriptor {
    /// Parse and validate a descriptor document
    pub fn from_json(text: &str) -> SharedResult<Self> {
        let descriptor: Self = serde_json::from_str(text)
            .map_err(|e| SharedError::DeserializationError { message: e.to_string() })?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn validate(&self) -> SharedResult<()> {
        require_non_empty("metadata.name", &self.metadata.name)?;
        require_non_empty("templateData.templatePath", &self.template_data.template_path)?;
        require_non_empty("messaging.inputChannel", &self.messaging.input_channel)?;
        require_non_empty("messaging.reply.destination", &self.messaging.reply.destination)?;
        require_non_empty(
            "messaging.reply.responseTemplatePath",
            &self.messaging.reply.response_template_path,
        )?;

        let mut seen = HashSet::new();
        for (index, group) in self.store_verifications.iter().enumerate() {
            let prefix = format!("storeVerifications[{index}]");
            require_non_empty(&format!("{prefix}.name"), &group.name)?;

            if !seen.insert(group.name.as_str()) {
                return Err(SharedError::InvalidDescriptor {
                    field: format!("{prefix}.name"),
                    reason: format!("duplicates group '{}'", group.name),
                });
            }

            match &group.target {
                StoreTarget::Relational { query } => {
                    require_non_empty(&format!("{prefix}.query"), query)?;
                }
                StoreTarget::Document { collection, .. } => {
                    require_non_empty(&format!("{prefix}.collection"), collection)?;
                }
            }

            for (slot, assertion) in group.assertions.iter().enumerate() {
                require_non_empty(&format!("{prefix}.assertions[{slot}].field"), &assertion.field)?;
            }
        }

        Ok(())
    }
}

fn require_non_empty(field: &str, value: &str) -> SharedResult<()> {
    if value.trim().is_empty() {
        return Err(SharedError::InvalidDescriptor {
            field: field.to_string(),
            reason: "must not be empty".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FULL: &str = r#"{
        "metadata": { "name": "payroll debit", "tags": ["payments"] },
        "templateData": {
            "templatePath": "request.json",
            "parameters": { "amount": "750000.00", "currency": "USD" }
        },
        "messaging": {
            "inputChannel": "/payments/in",
            "reply": { "destination": "/payments/out", "timeout": 5000, "responseTemplatePath": "response.json" }
        },
        "storeVerifications": [
            {
                "name": "ledger",
                "store": "relational",
                "query": "SELECT * FROM LEDGER WHERE PU_ID = '${puId}'",
                "assertions": [ { "field": "DEBIT_AMOUNT", "value": "${amount}" } ]
            },
            {
                "name": "events",
                "store": "document",
                "collection": "events",
                "filter": { "reqId": "${txId}" },
                "expectedCount": 1,
                "timeout": 2500,
                "verification": [ { "field": "eventcode", "value": "EVT.102" } ]
            }
        ]
    }"#;

    #[test]
    fn test_parse_full_descriptor() {
        let descriptor = TestCaseDescriptor::from_json(FULL).unwrap();

        assert_eq!(descriptor.name(), "payroll debit");
        assert_eq!(descriptor.template_data.parameters["amount"], json!("750000.00"));
        assert_eq!(descriptor.messaging.reply.timeout_ms, Some(5000));
        assert_eq!(descriptor.store_verifications.len(), 2);

        let ledger = &descriptor.store_verifications[0];
        assert_eq!(ledger.target.kind(), StoreKind::Relational);
        assert_eq!(ledger.expected_count, None);
        assert_eq!(ledger.timeout_or(Duration::from_secs(10)), Duration::from_secs(10));

        let events = &descriptor.store_verifications[1];
        assert_eq!(
            events.target,
            StoreTarget::Document {
                collection: "events".to_string(),
                filter: json!({ "reqId": "${txId}" }),
            }
        );
        assert_eq!(events.expected_count, Some(1));
        assert_eq!(events.timeout_or(Duration::from_secs(10)), Duration::from_millis(2500));
        assert_eq!(events.assertions[0].field, "eventcode");
    }

    #[test]
    fn test_reply_timeout_defaults() {
        let reply = ReplySpec {
            destination: "/out".to_string(),
            timeout_ms: None,
            response_template_path: "response.json".to_string(),
        };
        assert_eq!(reply.timeout_or(Duration::from_secs(30)), Duration::from_secs(30));
    }

    #[test]
    fn test_rejects_duplicate_group_names() {
        let mut value: serde_json::Value = serde_json::from_str(FULL).unwrap();
        value["storeVerifications"][1]["name"] = json!("ledger");

        let err = TestCaseDescriptor::from_json(&value.to_string()).unwrap_err();
        assert!(err.to_string().contains("duplicates group 'ledger'"));
    }

    #[test]
    fn test_rejects_empty_channel() {
        let mut value: serde_json::Value = serde_json::from_str(FULL).unwrap();
        value["messaging"]["inputChannel"] = json!(" ");

        let err = TestCaseDescriptor::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(err, SharedError::InvalidDescriptor { ref field, .. } if field == "messaging.inputChannel"));
    }

    #[test]
    fn test_rejects_unknown_store_kind() {
        let mut value: serde_json::Value = serde_json::from_str(FULL).unwrap();
        value["storeVerifications"][0]["store"] = json!("graph");

        let err = TestCaseDescriptor::from_json(&value.to_string()).unwrap_err();
        assert!(matches!(err, SharedError::DeserializationError { .. }));
    }
}
