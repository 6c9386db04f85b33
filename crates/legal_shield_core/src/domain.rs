//! crates/legal_shield_core/src/domain.rs
//!
//! Defines the core data structures exchanged between the web layer, the
//! analyzer and the completion port. Nothing here outlives a single request.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

/// Lowest and highest acceptable values for an integer `overall_risk_score`.
pub const MIN_RISK_SCORE: i64 = 1;
pub const MAX_RISK_SCORE: i64 = 10;

/// The decoded analysis as the model returned it, plus any merged metadata.
///
/// Only JSON-object shape is guaranteed. Keys the model adds beyond the
/// requested schema are kept and passed through to the client.
pub type AnalysisReport = Map<String, Value>;

/// How dangerous a single clause is for the person signing the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    High,
    Medium,
    Low,
}

/// A clause the model flagged, quoted verbatim from the contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct RiskyClause {
    pub clause_text: String,
    pub risk_level: RiskLevel,
    pub explanation: String,
    pub suggestion: String,
}

/// Documents the shape the model is asked to produce, for the OpenAPI schema.
///
/// Replies are not decoded into this type; see `AnalysisReport`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisResult {
    pub overall_risk_score: u8,
    pub risky_clauses: Vec<RiskyClause>,
    pub summary: String,
    pub negotiation_points: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract_text: Option<String>,
}

/// Request metadata merged into an `AnalysisReport` after the model call.
#[derive(Debug, Clone, Default)]
pub struct AnalysisMetadata {
    pub filename: Option<String>,
    pub contract_type: Option<String>,
    pub user_id: Option<String>,
    pub user_name: Option<String>,
    pub contract_text: Option<String>,
}

impl AnalysisMetadata {
    /// Writes every supplied field into `report`, replacing any key the model
    /// produced under the same name. Unset fields leave the report untouched.
    pub fn merge_into(self, report: &mut AnalysisReport) {
        let fields = [
            ("filename", self.filename),
            ("contract_type", self.contract_type),
            ("user_id", self.user_id),
            ("user_name", self.user_name),
            ("contract_text", self.contract_text),
        ];
        for (key, value) in fields {
            if let Some(value) = value {
                report.insert(key.to_string(), Value::String(value));
            }
        }
    }
}

/// Who authored a message in the client's chat transcript.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

/// One entry of the chat history the client resends with every question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    // Opaque to the server.
    #[serde(default)]
    pub timestamp: String,
}

//=========================================================================================
// Completion Port Types
//=========================================================================================

/// Role tag understood by the remote completion endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

impl From<ChatRole> for MessageRole {
    fn from(role: ChatRole) -> Self {
        match role {
            ChatRole::User => MessageRole::User,
            ChatRole::Assistant => MessageRole::Assistant,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionMessage {
    pub role: MessageRole,
    pub content: String,
}

impl CompletionMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Everything the completion port needs for one round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<CompletionMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn metadata_overrides_model_keys_and_keeps_the_rest() {
        let mut report = json!({
            "overall_risk_score": 4,
            "contract_type": "guessed by model",
            "key_dates": ["2025-01-01"]
        })
        .as_object()
        .cloned()
        .unwrap();

        AnalysisMetadata {
            filename: Some("nda.pdf".to_string()),
            contract_type: Some("nda".to_string()),
            ..AnalysisMetadata::default()
        }
        .merge_into(&mut report);

        assert_eq!(report["filename"], "nda.pdf");
        assert_eq!(report["contract_type"], "nda");
        assert_eq!(report["key_dates"], json!(["2025-01-01"]));
        assert!(!report.contains_key("user_id"));
    }

    #[test]
    fn chat_message_timestamp_is_optional() {
        let msg: ChatMessage =
            serde_json::from_str(r#"{"role":"assistant","content":"hi"}"#).unwrap();
        assert_eq!(msg.role, ChatRole::Assistant);
        assert!(msg.timestamp.is_empty());
    }
}
