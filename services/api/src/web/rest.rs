//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::{
    error::{ApiError, ErrorResponse},
    web::{extract::ApiJson, state::AppState},
};
use axum::{
    extract::{Multipart, State},
    response::Json,
};
use legal_shield_core::{
    AnalysisMetadata, AnalysisReport, AnalysisResult, ChatMessage, ChatRole, RiskLevel,
    RiskyClause,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::info;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        root_handler,
        health_handler,
        upload_handler,
        analyze_contract_handler,
        chat_handler,
    ),
    components(
        schemas(
            AnalyzeContractRequest,
            AnalysisResult,
            RiskyClause,
            RiskLevel,
            ChatRequest,
            ChatMessage,
            ChatRole,
            ChatResponse,
            HealthResponse,
            BannerResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "contracts", description = "Contract upload and risk analysis."),
        (name = "chat", description = "Follow-up questions about an analyzed contract.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

#[derive(Serialize, Deserialize, ToSchema)]
pub struct BannerResponse {
    pub message: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
}

/// Direct-text variant of an upload.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct AnalyzeContractRequest {
    pub contract_text: String,
    #[serde(default = "default_contract_type")]
    pub contract_type: String,
}

/// A follow-up question. The client resends the full context every time.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ChatRequest {
    pub user_id: String,
    pub message: String,
    pub contract_text: String,
    /// The analysis previously returned by `/upload` or `/analyze-contract`.
    /// Any JSON object is accepted.
    #[schema(value_type = Object)]
    pub analysis_result: Value,
    #[serde(default)]
    pub chat_history: Vec<ChatMessage>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ChatResponse {
    pub response: String,
    pub status: String,
}

fn default_contract_type() -> String {
    "general".to_string()
}

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Service banner.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 200, description = "Banner", body = BannerResponse))
)]
pub async fn root_handler() -> Json<BannerResponse> {
    Json(BannerResponse {
        message: "AI Legal Shield API - Ready to analyze contracts!".to_string(),
    })
}

/// Liveness check.
#[utoipa::path(
    get,
    path = "/health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "ai-legal-shield".to_string(),
    })
}

/// Upload a contract document and analyze it.
///
/// Accepts a multipart/form-data request with a `file` part and the text parts
/// `userId`, `userName` and (optionally) `contract_type`.
#[utoipa::path(
    post,
    path = "/upload",
    tag = "contracts",
    request_body(content_type = "multipart/form-data", description = "The contract file and uploader details."),
    responses(
        (status = 200, description = "Analysis with upload metadata", body = AnalysisResult),
        (status = 400, description = "Unsupported, oversized, unreadable or too short document", body = ErrorResponse),
        (status = 500, description = "The AI provider failed or replied with invalid JSON", body = ErrorResponse)
    )
)]
pub async fn upload_handler(
    State(app_state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisReport>, ApiError> {
    let rules = &app_state.config.validation;

    let mut upload: Option<(String, Vec<u8>)> = None;
    let mut user_id = None;
    let mut user_name = None;
    let mut contract_type = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or_default().to_string();
                rules.validate_extension(&filename)?;
                rules.validate_content_type(field.content_type())?;
                let data = field.bytes().await?;
                rules.validate_file_size(data.len())?;
                upload = Some((filename, data.to_vec()));
            }
            "userId" => user_id = Some(field.text().await?),
            "userName" => user_name = Some(field.text().await?),
            "contract_type" => contract_type = Some(field.text().await?),
            _ => {}
        }
    }

    let (filename, data) = upload.ok_or(ApiError::MissingField("file"))?;
    let user_id = user_id.ok_or(ApiError::MissingField("userId"))?;
    let user_name = user_name.ok_or(ApiError::MissingField("userName"))?;
    let contract_type = contract_type
        .filter(|t| !t.trim().is_empty())
        .unwrap_or_else(default_contract_type);

    info!(%filename, bytes = data.len(), %user_id, "Received contract upload");

    let contract_text = app_state.extractor.extract_text(data, &filename).await?;
    rules.validate_contract_text(&contract_text)?;

    let mut report = app_state
        .analyzer
        .analyze(&contract_text, &contract_type)
        .await?;

    AnalysisMetadata {
        filename: Some(filename),
        contract_type: Some(contract_type),
        user_id: Some(user_id),
        user_name: Some(user_name),
        contract_text: Some(contract_text),
    }
    .merge_into(&mut report);
    Ok(Json(report))
}

/// Analyze contract text submitted directly.
#[utoipa::path(
    post,
    path = "/analyze-contract",
    tag = "contracts",
    request_body = AnalyzeContractRequest,
    responses(
        (status = 200, description = "Analysis result", body = AnalysisResult),
        (status = 400, description = "Contract text too short", body = ErrorResponse),
        (status = 422, description = "Malformed or incomplete JSON body", body = ErrorResponse),
        (status = 500, description = "The AI provider failed or replied with invalid JSON", body = ErrorResponse)
    )
)]
pub async fn analyze_contract_handler(
    State(app_state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<AnalyzeContractRequest>,
) -> Result<Json<AnalysisReport>, ApiError> {
    app_state
        .config
        .validation
        .validate_contract_text(&req.contract_text)?;

    let mut report = app_state
        .analyzer
        .analyze(&req.contract_text, &req.contract_type)
        .await?;

    AnalysisMetadata {
        contract_type: Some(req.contract_type),
        ..AnalysisMetadata::default()
    }
    .merge_into(&mut report);
    Ok(Json(report))
}

/// Ask a follow-up question about an analyzed contract.
#[utoipa::path(
    post,
    path = "/chat",
    tag = "chat",
    request_body = ChatRequest,
    responses(
        (status = 200, description = "The assistant's answer", body = ChatResponse),
        (status = 422, description = "Malformed or incomplete JSON body", body = ErrorResponse),
        (status = 500, description = "The AI provider failed", body = ErrorResponse)
    )
)]
pub async fn chat_handler(
    State(app_state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    info!(user_id = %req.user_id, "Received chat question");

    let response = app_state
        .analyzer
        .chat(
            &req.message,
            &req.contract_text,
            &req.analysis_result,
            &req.chat_history,
        )
        .await?;

    Ok(Json(ChatResponse {
        response,
        status: "success".to_string(),
    }))
}
