//! Response envelope
//!
//! Every endpoint answers with the same JSON wrapper, distinguishing
//! business success from transport success.

use serde::Deserialize;
use serde_json::Value;

/// JSON response wrapper consumed by every commit
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope {
    /// Business-level success flag
    pub success: bool,
    /// Single-object payload
    #[serde(default)]
    pub body: Option<Value>,
    /// List payload, consulted when `body` is absent
    #[serde(default)]
    pub body_list: Option<Vec<Value>>,
    /// Server-supplied messages
    #[serde(default)]
    pub messages: Option<Vec<String>>,
    /// Server-supplied error code
    #[serde(default)]
    pub error_code: Option<u16>,
}

impl Envelope {
    /// The `body` field, else `bodyList` as a JSON array
    pub fn payload(&self) -> Option<Value> {
        self.body
            .clone()
            .or_else(|| self.body_list.clone().map(Value::Array))
    }

    /// First server message, else the literal `"success"`
    pub fn first_message(&self) -> String {
        self.messages
            .as_ref()
            .and_then(|messages| messages.first())
            .cloned()
            .unwrap_or_else(|| "success".to_string())
    }

    /// Server messages for the error path; empty when absent
    pub fn error_messages(&self) -> Vec<String> {
        self.messages.clone().unwrap_or_default()
    }

    /// `bodyList` entries rendered as messages, the POST error fallback
    pub(crate) fn body_list_messages(&self) -> Option<Vec<String>> {
        self.body_list.as_ref().map(|list| {
            list.iter()
                .map(|value| match value {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_full_envelope() {
        let envelope: Envelope = serde_json::from_value(json!({
            "success": true,
            "body": {"x": 1},
            "messages": ["ok"],
            "errorCode": 0
        }))
        .expect("envelope should parse");
        assert!(envelope.success);
        assert_eq!(envelope.payload(), Some(json!({"x": 1})));
        assert_eq!(envelope.first_message(), "ok");
    }

    #[test]
    fn payload_falls_back_to_body_list() {
        let envelope: Envelope = serde_json::from_value(json!({
            "success": true,
            "bodyList": [1, 2]
        }))
        .expect("envelope should parse");
        assert_eq!(envelope.payload(), Some(json!([1, 2])));
    }

    #[test]
    fn first_message_defaults_to_success() {
        let envelope: Envelope =
            serde_json::from_value(json!({"success": true})).expect("envelope should parse");
        assert_eq!(envelope.first_message(), "success");

        let empty: Envelope = serde_json::from_value(json!({"success": true, "messages": []}))
            .expect("envelope should parse");
        assert_eq!(empty.first_message(), "success");
    }

    #[test]
    fn body_list_messages_stringify_non_string_entries() {
        let envelope: Envelope = serde_json::from_value(json!({
            "success": false,
            "bodyList": ["bad", 7]
        }))
        .expect("envelope should parse");
        assert_eq!(
            envelope.body_list_messages(),
            Some(vec!["bad".to_string(), "7".to_string()])
        );
    }

    #[test]
    fn error_messages_empty_when_absent() {
        let envelope: Envelope =
            serde_json::from_value(json!({"success": false})).expect("envelope should parse");
        assert!(envelope.error_messages().is_empty());
    }
}
