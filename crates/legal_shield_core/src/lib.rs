pub mod analyzer;
pub mod domain;
pub mod parsing;
pub mod ports;
pub mod prompts;
pub mod validation;

pub use analyzer::{AnalyzerSettings, ContractAnalyzer};
pub use domain::{
    AnalysisMetadata, AnalysisReport, AnalysisResult, ChatMessage, ChatRole,
    CompletionMessage, CompletionRequest, MessageRole, RiskLevel, RiskyClause,
};
pub use ports::{CompletionService, PortError, PortResult, TextExtractionService};
pub use validation::ValidationRules;
