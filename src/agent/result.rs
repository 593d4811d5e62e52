//! Agent result shape and its precedence rules.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of an agent run.
///
/// Agents may fill either name of each field; the adapter resolves them with
/// [`AgentResult::response_text`] and [`AgentResult::payload`]. A present
/// `error` marks the run as failed regardless of the other fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentResult {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub youtube_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AgentResult {
    /// A successful result carrying `response`.
    pub fn answered(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            ..Self::default()
        }
    }

    /// A failed result.
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Self::default()
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_youtube_data(mut self, data: Value) -> Self {
        self.youtube_data = Some(data);
        self
    }

    /// `response` when it is non-empty, otherwise whatever `answer` holds.
    pub fn response_text(&self) -> Option<String> {
        match &self.response {
            Some(text) if !text.is_empty() => Some(text.clone()),
            _ => self.answer.clone(),
        }
    }

    /// `data` when it is truthy, otherwise whatever `youtube_data` holds.
    pub fn payload(&self) -> Option<Value> {
        match &self.data {
            Some(value) if is_truthy(value) => Some(value.clone()),
            _ => self.youtube_data.clone(),
        }
    }

    /// The failure message, if the run failed.
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// JSON truthiness: null, false, zero, and empty strings, arrays and objects are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> AgentResult {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_response_preferred_over_answer() {
        let result = parse(json!({"response": "4", "answer": "four"}));
        assert_eq!(result.response_text().as_deref(), Some("4"));
    }

    #[test]
    fn test_empty_response_falls_back_to_answer() {
        assert_eq!(parse(json!({"response": "", "answer": "four"})).response_text().as_deref(), Some("four"));
        assert_eq!(parse(json!({"answer": "four"})).response_text().as_deref(), Some("four"));
        assert_eq!(parse(json!({})).response_text(), None);
    }

    #[test]
    fn test_payload_precedence() {
        let result = parse(json!({"data": [1], "youtube_data": [2]}));
        assert_eq!(result.payload(), Some(json!([1])));

        let result = parse(json!({"data": [], "youtube_data": [{"video_id": "x"}]}));
        assert_eq!(result.payload(), Some(json!([{"video_id": "x"}])));

        let result = parse(json!({"data": null}));
        assert_eq!(result.payload(), None);

        let result = parse(json!({"data": {}, "youtube_data": []}));
        assert_eq!(result.payload(), Some(json!([])));
    }

    #[test]
    fn test_truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!("x")));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!({"k": null})));
    }

    #[test]
    fn test_error_detected() {
        let result = parse(json!({"error": "quota exceeded", "response": "ignored"}));
        assert_eq!(result.error_message(), Some("quota exceeded"));
        assert!(AgentResult::answered("ok").error_message().is_none());
    }

    #[test]
    fn test_serialization_skips_absent_fields() {
        let json = serde_json::to_value(AgentResult::answered("hi").with_youtube_data(json!([]))).unwrap();
        assert_eq!(json, json!({"response": "hi", "youtube_data": []}));
    }
}
