//! Flat substitution payload

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::DynamicValues;

/// Flat key/value mapping used for `${key}` substitution
///
/// Built once per test case execution from the descriptor's static
/// parameters and a fresh set of [`DynamicValues`]; never mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(BTreeMap<String, String>);

impl Payload {
    /// Merge static parameters with generated values; generated keys win
    pub fn merge(static_values: &BTreeMap<String, serde_json::Value>, dynamic: &DynamicValues) -> Self {
        let mut entries: BTreeMap<String, String> = static_values
            .iter()
            .map(|(key, value)| (key.clone(), string_form(value)))
            .collect();

        for (key, value) in dynamic.entries() {
            entries.insert(key.to_string(), value.to_string());
        }

        Self(entries)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Payload {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// String form of a JSON scalar as used for substitution and field assertions
///
/// Strings are taken verbatim; everything else uses its JSON text, so `150.75`
/// becomes `"150.75"`, `true` becomes `"true"` and `null` becomes `"null"`.
pub fn string_form(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
