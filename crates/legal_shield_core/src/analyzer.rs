//! crates/legal_shield_core/src/analyzer.rs
//!
//! The `ContractAnalyzer` ties the prompt builders, the completion port and the
//! response parser together. It holds no per-request state, so one instance is
//! shared by every handler.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info};

use crate::domain::{AnalysisReport, ChatMessage, CompletionMessage, CompletionRequest};
use crate::parsing::parse_analysis;
use crate::ports::{CompletionService, PortError, PortResult};
use crate::prompts::{build_analysis_prompt, build_chat_messages, ANALYSIS_SYSTEM_PROMPT};

/// Model parameters for the two kinds of request.
#[derive(Debug, Clone)]
pub struct AnalyzerSettings {
    pub analysis_model: String,
    pub analysis_temperature: f32,
    pub analysis_max_tokens: u32,
    pub chat_model: String,
    pub chat_temperature: f32,
    pub chat_max_tokens: u32,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            analysis_model: "deepseek/deepseek-r1".to_string(),
            analysis_temperature: 0.1,
            analysis_max_tokens: 2000,
            chat_model: "deepseek/deepseek-r1".to_string(),
            chat_temperature: 0.3,
            chat_max_tokens: 1000,
        }
    }
}

#[derive(Clone)]
pub struct ContractAnalyzer {
    completion: Arc<dyn CompletionService>,
    settings: AnalyzerSettings,
}

impl ContractAnalyzer {
    /// Creates a new `ContractAnalyzer`.
    pub fn new(completion: Arc<dyn CompletionService>, settings: AnalyzerSettings) -> Self {
        Self {
            completion,
            settings,
        }
    }

    /// Asks the model for a risk assessment of `contract_text` and decodes it.
    ///
    /// The report holds only what the model produced; callers merge metadata.
    pub async fn analyze(
        &self,
        contract_text: &str,
        contract_type: &str,
    ) -> PortResult<AnalysisReport> {
        info!(
            contract_type,
            chars = contract_text.chars().count(),
            "Requesting contract analysis"
        );

        let request = CompletionRequest {
            model: self.settings.analysis_model.clone(),
            messages: vec![
                CompletionMessage::system(ANALYSIS_SYSTEM_PROMPT),
                CompletionMessage::user(build_analysis_prompt(contract_text, contract_type)),
            ],
            temperature: self.settings.analysis_temperature,
            max_tokens: self.settings.analysis_max_tokens,
        };

        let content = self.completion.complete(request).await?;
        debug!(reply_len = content.len(), "Analysis reply received");

        let report = parse_analysis(&content)?;
        info!(
            score = %report.get("overall_risk_score").unwrap_or(&serde_json::Value::Null),
            clauses = report
                .get("risky_clauses")
                .and_then(serde_json::Value::as_array)
                .map_or(0, Vec::len),
            "Contract analysis complete"
        );
        Ok(report)
    }

    /// Answers a follow-up question about a contract that was already analyzed.
    /// The model's reply is returned verbatim. Provider failures surface as
    /// `PortError::ChatFailed`.
    pub async fn chat(
        &self,
        message: &str,
        contract_text: &str,
        analysis_result: &Value,
        chat_history: &[ChatMessage],
    ) -> PortResult<String> {
        info!(history = chat_history.len(), "Answering contract question");

        let request = CompletionRequest {
            model: self.settings.chat_model.clone(),
            messages: build_chat_messages(message, contract_text, analysis_result, chat_history),
            temperature: self.settings.chat_temperature,
            max_tokens: self.settings.chat_max_tokens,
        };

        self.completion.complete(request).await.map_err(|e| match e {
            PortError::UpstreamCall(msg) => PortError::ChatFailed(msg),
            other => other,
        })
    }
}
