//! Wire types exchanged with the usage-recording service.

use serde::{Deserialize, Serialize};

/// Cumulative usage for one (model, user label) pair, as reported at fetch time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRow {
    /// Model name (e.g., "gpt-4o")
    pub model: String,
    /// Free-form label of the user who made the calls
    pub user_label: String,
    /// Sum of prompt tokens
    pub total_input_tokens: u64,
    /// Sum of completion tokens
    pub total_output_tokens: u64,
}

/// Per-model totals, ignoring the user label
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelTotal {
    pub model: String,
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Totals across every row regardless of model or user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct UsageTotals {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Body of `POST /api/llm/chat`
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    /// Provider key, forwarded by the backend to the upstream model
    pub api_key: String,
    pub model: String,
    pub user_label: String,
    pub prompt: String,
}

// The key must never end up in logs through a stray `{:?}`.
impl std::fmt::Debug for ChatRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatRequest")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("user_label", &self.user_label)
            .field("prompt", &self.prompt)
            .finish()
    }
}

/// Successful reply of `POST /api/llm/chat`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usage_row_from_service_json() {
        let json = r#"[
            {"model": "gpt-5-mini", "user_label": "alice", "total_input_tokens": 5, "total_output_tokens": 3}
        ]"#;
        let rows: Vec<UsageRow> = serde_json::from_str(json).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].model, "gpt-5-mini");
        assert_eq!(rows[0].user_label, "alice");
        assert_eq!(rows[0].total_input_tokens, 5);
        assert_eq!(rows[0].total_output_tokens, 3);
    }

    #[test]
    fn test_negative_tokens_rejected() {
        let json = r#"{"model": "m", "user_label": "u", "total_input_tokens": -1, "total_output_tokens": 0}"#;
        assert!(serde_json::from_str::<UsageRow>(json).is_err());
    }

    #[test]
    fn test_chat_request_field_names() {
        let req = ChatRequest {
            api_key: "sk-test".to_string(),
            model: "gpt-5-mini".to_string(),
            user_label: "alice".to_string(),
            prompt: "Say hello".to_string(),
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "api_key": "sk-test",
                "model": "gpt-5-mini",
                "user_label": "alice",
                "prompt": "Say hello",
            })
        );
    }

    #[test]
    fn test_chat_request_debug_hides_key() {
        let req = ChatRequest {
            api_key: "sk-secret".to_string(),
            model: "gpt-4o".to_string(),
            user_label: "bob".to_string(),
            prompt: String::new(),
        };
        let debug = format!("{:?}", req);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("gpt-4o"));
    }
}
