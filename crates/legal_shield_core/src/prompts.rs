//! crates/legal_shield_core/src/prompts.rs
//!
//! Renders the analysis prompt and the chat message list sent to the model.
//! Both builders are pure functions of their inputs.

use serde_json::Value;

use crate::domain::{ChatMessage, CompletionMessage};

/// System message attached to every analysis request.
pub const ANALYSIS_SYSTEM_PROMPT: &str =
    "You are a legal expert who provides clear contract analysis in JSON format.";

/// Number of contract characters embedded in the chat context.
pub const CHAT_CONTRACT_PREVIEW_CHARS: usize = 3000;

/// Number of prior chat messages forwarded to the model.
pub const CHAT_HISTORY_LIMIT: usize = 10;

const ANALYSIS_TEMPLATE: &str = r#"
You are an expert contract lawyer. Analyze this {contract_type} contract and identify risky clauses.

CONTRACT TEXT:
{contract_text}

Return your analysis in this exact JSON format:
{
    "overall_risk_score": <1-10 integer>,
    "risky_clauses": [
        {
            "clause_text": "<exact text from contract>",
            "risk_level": "<high|medium|low>",
            "explanation": "<why this is risky in plain English>",
            "suggestion": "<how to negotiate or what to ask for>"
        }
    ],
    "summary": "<2-3 sentence overall assessment>",
    "negotiation_points": ["<key points to negotiate>"]
}

Focus on common red flags like:
- Excessive penalties or fees
- One-sided termination clauses
- Broad liability or indemnification
- Automatic renewals
- Restrictive non-compete clauses
- Unusual payment terms
"#;

const CHAT_SYSTEM_TEMPLATE: &str = r#"You are an expert legal advisor chatbot. You can ONLY answer questions about the specific contract that was analyzed.

CONTRACT ANALYSIS CONTEXT:
- Contract Type: {contract_type}
- Overall Risk Score: {risk_score}/10
- Summary: {summary}
- Risky Clauses Found: {clause_count}
- Negotiation Points: {negotiation_count}

CONTRACT TEXT:
{contract_preview}...

PREVIOUS ANALYSIS RESULTS:
{analysis_json}

IMPORTANT RULES:
1. ONLY answer questions related to this specific contract and its analysis
2. If asked about other contracts, legal advice in general, or unrelated topics, politely redirect to the current contract
3. Base your answers on the contract text and analysis results provided
4. Be helpful but remind users to consult a real lawyer for legal decisions
5. Keep responses concise and practical
6. If you need to reference specific clauses, quote them directly from the contract"#;

/// Builds the user prompt asking the model for a JSON risk assessment.
pub fn build_analysis_prompt(contract_text: &str, contract_type: &str) -> String {
    // Contract text goes in last so placeholders inside it are never expanded.
    ANALYSIS_TEMPLATE
        .replace("{contract_type}", contract_type)
        .replace("{contract_text}", contract_text)
}

/// Builds the full message list for a follow-up question: the system context,
/// the most recent history, then the new question.
pub fn build_chat_messages(
    message: &str,
    contract_text: &str,
    analysis_result: &Value,
    chat_history: &[ChatMessage],
) -> Vec<CompletionMessage> {
    let mut messages = Vec::with_capacity(chat_history.len().min(CHAT_HISTORY_LIMIT) + 2);
    messages.push(CompletionMessage::system(build_chat_system_prompt(
        contract_text,
        analysis_result,
    )));

    let skip = chat_history.len().saturating_sub(CHAT_HISTORY_LIMIT);
    messages.extend(chat_history[skip..].iter().map(|msg| CompletionMessage {
        role: msg.role.into(),
        content: msg.content.clone(),
    }));

    messages.push(CompletionMessage::user(message));
    messages
}

fn build_chat_system_prompt(contract_text: &str, analysis_result: &Value) -> String {
    let contract_type = analysis_result
        .get("contract_type")
        .map(display_value)
        .unwrap_or_else(|| "general".to_string());
    let risk_score = analysis_result
        .get("overall_risk_score")
        .map(display_value)
        .unwrap_or_else(|| "N/A".to_string());
    let summary = analysis_result
        .get("summary")
        .map(display_value)
        .unwrap_or_default();
    let clause_count = array_len(analysis_result, "risky_clauses");
    let negotiation_count = array_len(analysis_result, "negotiation_points");

    let contract_preview: String = contract_text
        .chars()
        .take(CHAT_CONTRACT_PREVIEW_CHARS)
        .collect();
    let analysis_json = serde_json::to_string_pretty(analysis_result)
        .unwrap_or_else(|_| analysis_result.to_string());

    CHAT_SYSTEM_TEMPLATE
        .replace("{contract_type}", &contract_type)
        .replace("{risk_score}", &risk_score)
        .replace("{summary}", &summary)
        .replace("{clause_count}", &clause_count.to_string())
        .replace("{negotiation_count}", &negotiation_count.to_string())
        .replace("{analysis_json}", &analysis_json)
        .replace("{contract_preview}", &contract_preview)
}

/// Renders a JSON value for prose: strings without quotes, everything else as JSON.
fn display_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn array_len(value: &Value, key: &str) -> usize {
    value
        .get(key)
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChatRole, MessageRole};
    use serde_json::json;

    fn history(n: usize) -> Vec<ChatMessage> {
        (0..n)
            .map(|i| ChatMessage {
                role: if i % 2 == 0 {
                    ChatRole::User
                } else {
                    ChatRole::Assistant
                },
                content: format!("message {}", i),
                timestamp: String::new(),
            })
            .collect()
    }

    #[test]
    fn analysis_prompt_embeds_inputs_and_red_flags() {
        let prompt = build_analysis_prompt("The tenant shall pay...", "lease");
        assert!(prompt.contains("Analyze this lease contract"));
        assert!(prompt.contains("The tenant shall pay..."));
        assert!(prompt.contains("\"overall_risk_score\": <1-10 integer>"));
        assert!(prompt.contains("\"negotiation_points\""));
        assert!(prompt.contains("- Automatic renewals"));
        assert!(prompt.contains("- Restrictive non-compete clauses"));
    }

    #[test]
    fn analysis_prompt_is_deterministic() {
        let a = build_analysis_prompt("same text", "nda");
        let b = build_analysis_prompt("same text", "nda");
        assert_eq!(a, b);
    }

    #[test]
    fn contract_text_placeholders_are_left_alone() {
        let prompt = build_analysis_prompt("literal {contract_type} in text", "nda");
        assert!(prompt.contains("literal {contract_type} in text"));
    }

    #[test]
    fn history_is_truncated_to_the_last_ten_in_order() {
        let messages = build_chat_messages("new question", "contract", &json!({}), &history(14));

        assert_eq!(messages.len(), 1 + CHAT_HISTORY_LIMIT + 1);
        assert_eq!(messages[0].role, MessageRole::System);
        let forwarded: Vec<&str> = messages[1..=CHAT_HISTORY_LIMIT]
            .iter()
            .map(|m| m.content.as_str())
            .collect();
        let expected: Vec<String> = (4..14).map(|i| format!("message {}", i)).collect();
        assert_eq!(forwarded, expected);
        assert_eq!(messages[1].role, MessageRole::User);
        assert_eq!(messages[2].role, MessageRole::Assistant);

        let last = messages.last().unwrap();
        assert_eq!(last.role, MessageRole::User);
        assert_eq!(last.content, "new question");
    }

    #[test]
    fn short_history_is_forwarded_whole() {
        let messages = build_chat_messages("q", "contract", &json!({}), &history(3));
        assert_eq!(messages.len(), 5);
        assert_eq!(messages[1].content, "message 0");
    }

    #[test]
    fn chat_context_summarises_the_analysis() {
        let analysis = json!({
            "contract_type": "nda",
            "overall_risk_score": 6,
            "summary": "Mostly balanced.",
            "risky_clauses": [{"clause_text": "a"}, {"clause_text": "b"}],
            "negotiation_points": ["x"]
        });
        let messages = build_chat_messages("q", "contract body", &analysis, &[]);
        let system = &messages[0].content;

        assert!(system.contains("- Contract Type: nda"));
        assert!(system.contains("- Overall Risk Score: 6/10"));
        assert!(system.contains("- Summary: Mostly balanced."));
        assert!(system.contains("- Risky Clauses Found: 2"));
        assert!(system.contains("- Negotiation Points: 1"));
        assert!(system.contains("contract body..."));
        assert!(system.contains("\"overall_risk_score\": 6"));
        assert!(system.contains("quote them directly from the contract"));
    }

    #[test]
    fn missing_or_oddly_shaped_fields_fall_back_to_defaults() {
        let analysis = json!({ "risky_clauses": "not a list" });
        let messages = build_chat_messages("q", "c", &analysis, &[]);
        let system = &messages[0].content;

        assert!(system.contains("- Contract Type: general"));
        assert!(system.contains("- Overall Risk Score: N/A/10"));
        assert!(system.contains("- Risky Clauses Found: 0"));
        assert!(system.contains("- Negotiation Points: 0"));
    }

    #[test]
    fn contract_preview_is_capped() {
        let long_contract = "a".repeat(CHAT_CONTRACT_PREVIEW_CHARS + 500);
        let messages = build_chat_messages("q", &long_contract, &json!({}), &[]);
        let system = &messages[0].content;

        let expected = format!("{}...", "a".repeat(CHAT_CONTRACT_PREVIEW_CHARS));
        assert!(system.contains(&expected));
        assert!(!system.contains(&"a".repeat(CHAT_CONTRACT_PREVIEW_CHARS + 1)));
    }
}
