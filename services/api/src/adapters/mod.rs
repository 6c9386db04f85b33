pub mod completion_llm;
pub mod extractor;

pub use completion_llm::OpenAiCompletionAdapter;
pub use extractor::DocumentTextExtractor;
