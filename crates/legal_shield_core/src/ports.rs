//! crates/legal_shield_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of the LLM vendor and of the document decoding libraries.

use async_trait::async_trait;
use crate::domain::CompletionRequest;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
///
/// `InvalidInput` is the caller's fault; every other variant is a server-side
/// failure.
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("AI service error: {0}")]
    UpstreamCall(String),
    #[error("AI response parsing error: {0}")]
    UpstreamParse(String),
    #[error("Chat error: {0}")]
    ChatFailed(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

impl PortError {
    /// True when the failure was caused by the request rather than the server.
    pub fn is_client_error(&self) -> bool {
        matches!(self, PortError::InvalidInput(_))
    }
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Sends the messages to the remote model and returns the first choice's text.
    async fn complete(&self, request: CompletionRequest) -> PortResult<String>;
}

#[async_trait]
pub trait TextExtractionService: Send + Sync {
    /// Extracts plain text from an uploaded document, choosing the decoder by
    /// the filename's extension.
    async fn extract_text(&self, data: Vec<u8>, filename: &str) -> PortResult<String>;
}

