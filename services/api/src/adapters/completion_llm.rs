//! services/api/src/adapters/completion_llm.rs
//!
//! This module contains the adapter for the remote chat-completion LLM.
//! It implements the `CompletionService` port from the `core` crate against any
//! OpenAI-compatible endpoint (OpenRouter by default).

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
        CreateChatCompletionResponse,
    },
    Client,
};
use async_trait::async_trait;
use legal_shield_core::{
    domain::{CompletionMessage, CompletionRequest, MessageRole},
    ports::{CompletionService, PortError, PortResult},
};
use std::time::Duration;
use tracing::{info, warn};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `CompletionService` using an OpenAI-compatible LLM.
///
/// Each attempt is bounded by `timeout`. Transport failures and timeouts are
/// retried up to `max_retries` times; errors returned by the provider are not.
#[derive(Clone)]
pub struct OpenAiCompletionAdapter {
    client: Client<OpenAIConfig>,
    timeout: Duration,
    max_retries: u32,
}

impl OpenAiCompletionAdapter {
    /// Creates a new `OpenAiCompletionAdapter`.
    pub fn new(client: Client<OpenAIConfig>, timeout: Duration, max_retries: u32) -> Self {
        Self {
            client,
            timeout,
            max_retries,
        }
    }

    /// Builds the underlying client for the given provider.
    pub fn client_for(api_key: &str, base_url: &str) -> Client<OpenAIConfig> {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(base_url);
        Client::with_config(config)
    }

    async fn send_with_retry(&self, request: CreateChatCompletionRequest) -> PortResult<String> {
        let mut attempt = 0;
        loop {
            let outcome =
                tokio::time::timeout(self.timeout, self.client.chat().create(request.clone()))
                    .await;

            let failure = match outcome {
                Ok(Ok(response)) => return first_choice_text(response),
                Ok(Err(e)) if is_transient(&e) => e.to_string(),
                Ok(Err(e)) => return Err(PortError::UpstreamCall(e.to_string())),
                Err(_) => format!("request timed out after {:?}", self.timeout),
            };

            if attempt >= self.max_retries {
                return Err(PortError::UpstreamCall(failure));
            }
            attempt += 1;
            warn!(attempt, "Completion request failed, retrying: {}", failure);
        }
    }
}

fn is_transient(error: &OpenAIError) -> bool {
    matches!(error, OpenAIError::Reqwest(_))
}

/// Extracts the text content from the first choice in the response.
fn first_choice_text(response: CreateChatCompletionResponse) -> PortResult<String> {
    if let Some(choice) = response.choices.into_iter().next() {
        if let Some(content) = choice.message.content {
            Ok(content)
        } else {
            Err(PortError::UpstreamCall(
                "LLM response contained no text content.".to_string(),
            ))
        }
    } else {
        Err(PortError::UpstreamCall(
            "LLM returned no choices in its response.".to_string(),
        ))
    }
}

fn to_request_message(message: &CompletionMessage) -> PortResult<ChatCompletionRequestMessage> {
    let content = message.content.clone();
    let built: Result<ChatCompletionRequestMessage, OpenAIError> = match message.role {
        MessageRole::System => ChatCompletionRequestSystemMessageArgs::default()
            .content(content)
            .build()
            .map(Into::into),
        MessageRole::User => ChatCompletionRequestUserMessageArgs::default()
            .content(content)
            .build()
            .map(Into::into),
        MessageRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
            .content(content)
            .build()
            .map(Into::into),
    };
    built.map_err(|e| PortError::Unexpected(e.to_string()))
}

//=========================================================================================
// `CompletionService` Trait Implementation
//=========================================================================================

#[async_trait]
impl CompletionService for OpenAiCompletionAdapter {
    async fn complete(&self, request: CompletionRequest) -> PortResult<String> {
        let messages = request
            .messages
            .iter()
            .map(to_request_message)
            .collect::<PortResult<Vec<_>>>()?;

        #[allow(deprecated)]
        let api_request = CreateChatCompletionRequestArgs::default()
            .model(&request.model)
            .messages(messages)
            .temperature(request.temperature)
            .max_tokens(request.max_tokens)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        info!(
            model = %request.model,
            messages = request.messages.len(),
            "Calling completion endpoint"
        );
        self.send_with_retry(api_request).await
    }
}
