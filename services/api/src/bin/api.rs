//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{DocumentTextExtractor, OpenAiCompletionAdapter},
    config::Config,
    error::ApiError,
    web::{create_router, AppState},
};
use legal_shield_core::ContractAnalyzer;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Initialize Service Adapters ---
    let client =
        OpenAiCompletionAdapter::client_for(config.require_api_key()?, &config.llm_base_url);
    let completion_adapter = Arc::new(OpenAiCompletionAdapter::new(
        client,
        config.llm_timeout,
        config.llm_max_retries,
    ));
    info!(
        base_url = %config.llm_base_url,
        analysis_model = %config.analyzer.analysis_model,
        chat_model = %config.analyzer.chat_model,
        "LLM provider configured"
    );

    let analyzer = Arc::new(ContractAnalyzer::new(
        completion_adapter,
        config.analyzer.clone(),
    ));

    // --- 3. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        config: config.clone(),
        analyzer,
        extractor: Arc::new(DocumentTextExtractor::new()),
    });

    // --- 4. Create the Web Router ---
    let app = create_router(app_state)?;

    // --- 5. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
