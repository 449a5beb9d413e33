//! `${key}` template rendering
//!
//! Substitution is a single left-to-right pass: a value that itself looks like
//! a placeholder is inserted literally and never expanded again. There is no
//! escape syntax for a literal `${name}`.

use regex::{Captures, Regex};
use serde_json::Value;
use shared::Payload;
use std::sync::LazyLock;

use crate::config::PlaceholderPolicy;
use crate::error::{EngineError, EngineResult};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{\s*([^}]*?)\s*\}").expect("placeholder pattern is valid"));

/// Replace every placeholder whose key is in the payload; leave the rest verbatim
pub fn render(template: &str, payload: &Payload) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| match payload.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Keys referenced by the template but absent from the payload, in first-seen order
pub fn unresolved_keys(template: &str, payload: &Payload) -> Vec<String> {
    let mut missing: Vec<String> = Vec::new();
    for caps in PLACEHOLDER.captures_iter(template) {
        let key = &caps[1];
        if !payload.contains_key(key) && !missing.iter().any(|k| k == key) {
            missing.push(key.to_string());
        }
    }
    missing
}

/// Render under a placeholder policy; `document` names the template in errors
pub fn render_with_policy(
    template: &str,
    payload: &Payload,
    policy: PlaceholderPolicy,
    document: &str,
) -> EngineResult<String> {
    if policy == PlaceholderPolicy::Strict {
        let missing = unresolved_keys(template, payload);
        if !missing.is_empty() {
            return Err(EngineError::malformed(
                document,
                format!("unresolved placeholders: {}", missing.join(", ")),
            ));
        }
    }
    Ok(render(template, payload))
}

/// Render a template and parse the result as JSON
pub fn render_document(
    template: &str,
    payload: &Payload,
    policy: PlaceholderPolicy,
    document: &str,
) -> EngineResult<Value> {
    let rendered = render_with_policy(template, payload, policy, document)?;
    serde_json::from_str(&rendered).map_err(|e| {
        EngineError::malformed(document, format!("{e} in rendered text: {}", excerpt(&rendered)))
    })
}

/// Render placeholders inside an already structured value (e.g. a document filter)
pub fn render_value(
    value: &Value,
    payload: &Payload,
    policy: PlaceholderPolicy,
    document: &str,
) -> EngineResult<Value> {
    let text = serde_json::to_string(value)?;
    render_document(&text, payload, policy, document)
}

fn excerpt(text: &str) -> String {
    const LIMIT: usize = 200;
    match text.char_indices().nth(LIMIT) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}
