//! Redaction of sensitive resource properties.

use serde_json::{Map, Value};

/// Value substituted for anything that looks like a secret.
pub const REDACTED: &str = "[REDACTED]";

/// Key fragments that mark a property as sensitive. Matching is
/// case-sensitive, so the capitalized forms used by CloudFormation property
/// names (`MasterUserPassword`, `SecretString`) are listed explicitly.
const SENSITIVE_KEYWORDS: &[&str] = &[
    "password",
    "Password",
    "secret",
    "Secret",
    "key",
    "Key",
    "token",
    "Token",
    "credential",
    "Credential",
];

fn is_sensitive(key: &str) -> bool {
    SENSITIVE_KEYWORDS.iter().any(|k| key.contains(k))
}

/// Return a copy of `properties` with sensitive values replaced by
/// [`REDACTED`]. Nested objects are walked; arrays are passed through as-is.
pub fn sanitize_properties(properties: &Map<String, Value>) -> Map<String, Value> {
    properties
        .iter()
        .map(|(key, value)| {
            let value = if is_sensitive(key) {
                Value::String(REDACTED.to_string())
            } else if let Value::Object(nested) = value {
                Value::Object(sanitize_properties(nested))
            } else {
                value.clone()
            };
            (key.clone(), value)
        })
        .collect()
}
