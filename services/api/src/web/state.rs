//! services/api/src/web/state.rs
//!
//! Defines the application state shared by every request handler.

use crate::config::Config;
use legal_shield_core::{ports::TextExtractionService, ContractAnalyzer};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
///
/// Everything in here is immutable or stateless, so concurrent requests never
/// contend on it.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub analyzer: Arc<ContractAnalyzer>,
    pub extractor: Arc<dyn TextExtractionService>,
}
