use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use chrono::{Local, Utc};
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::connector::api::Container;
use crate::domain::{truncate_chars, MessageRequest, SentimentResult};

use super::dto::{chat_message_id, BulkMessageRequest, BulkSentimentResponse, ChatAnalysisResponse};
use super::error::ApiError;

const API_NAME: &str = "Chat Sentiment Analysis API";
const API_VERSION: &str = env!("CARGO_PKG_VERSION");
const HEALTH_CHECK_MESSAGE: &str = "Hello, this is a test message for health check";

type AppState = State<Arc<Container>>;

fn now_iso() -> String {
    Local::now().to_rfc3339()
}

pub async fn analyze_sentiment(
    State(container): AppState,
    Json(request): Json<MessageRequest>,
) -> Result<Json<SentimentResult>, ApiError> {
    if request.is_blank() {
        return Err(ApiError::bad_request("Message cannot be empty"));
    }

    let max_chars = container.max_message_chars();
    if request.char_len() > max_chars {
        return Err(ApiError::bad_request(format!(
            "Message too long (max {} characters)",
            max_chars
        )));
    }

    let request = request.with_default_timestamp(now_iso);
    let result = container
        .analyze_message_use_case()
        .execute(&request)
        .await
        .map_err(|e| ApiError::internal(format!("Sentiment analysis failed: {}", e)))?;

    Ok(Json(result))
}

pub async fn analyze_bulk(
    State(container): AppState,
    Json(request): Json<BulkMessageRequest>,
) -> Result<Json<BulkSentimentResponse>, ApiError> {
    if request.messages.is_empty() {
        return Err(ApiError::bad_request("Messages list cannot be empty"));
    }

    let max_batch = container.policy().max_batch_size;
    if request.messages.len() > max_batch {
        return Err(ApiError::bad_request(format!(
            "Maximum {} messages allowed per bulk request for optimal performance. \
             For larger datasets, use multiple smaller requests.",
            max_batch
        )));
    }

    let max_chars = container.max_message_chars();
    let messages: Vec<MessageRequest> = request
        .messages
        .into_iter()
        .map(|m| m.with_default_timestamp(now_iso).truncated(max_chars))
        .collect();

    let analysis = container
        .analyze_bulk_use_case()
        .execute(&messages)
        .await
        .map_err(|e| ApiError::internal(format!("Bulk sentiment analysis failed: {}", e)))?;

    info!(
        "Bulk request of {} messages answered in {:?} mode",
        analysis.results.len(),
        analysis.mode
    );

    Ok(Json(analysis.into()))
}

/// Single-message analysis with a flattened response for live-chat widgets.
///
/// Line breaks are folded into spaces and over-long input is truncated rather
/// than rejected.
pub async fn chat_analysis(
    State(container): AppState,
    Json(request): Json<MessageRequest>,
) -> Result<Json<ChatAnalysisResponse>, ApiError> {
    let cleaned = request.message.trim().replace(['\n', '\r'], " ");
    if cleaned.is_empty() {
        return Err(ApiError::bad_request("Message cannot be empty"));
    }

    let request = MessageRequest {
        message: truncate_chars(&cleaned, container.max_message_chars()),
        ..request
    };

    let result = container
        .analyze_message_use_case()
        .execute(&request)
        .await
        .map_err(|e| ApiError::internal(format!("Chat analysis failed: {}", e)))?;

    let message_id = chat_message_id(request.customer_id.as_deref(), Utc::now().timestamp_micros());
    Ok(Json(ChatAnalysisResponse::new(&result, message_id, now_iso())))
}

/// Runs a canned message through the single-message path. Always 200; the
/// status field carries the verdict.
pub async fn health(State(container): AppState) -> Json<Value> {
    let probe = MessageRequest::new(HEALTH_CHECK_MESSAGE);

    match container.analyze_message_use_case().execute(&probe).await {
        Ok(result) => Json(json!({
            "status": "healthy",
            "llm_connection": "working",
            "model": container.model_name(),
            "analyzer_status": "functional",
            "bulk_processing_limit": container.policy().max_batch_size,
            "single_message_limit": format!("{} characters", container.max_message_chars()),
            "timestamp": now_iso(),
            "test_sentiment": result.sentiment(),
            "api_version": API_VERSION,
        })),
        Err(e) => {
            warn!("Health check failed: {}", e);
            Json(json!({
                "status": "unhealthy",
                "error": e.to_string(),
                "timestamp": now_iso(),
            }))
        }
    }
}

pub async fn root() -> Json<Value> {
    Json(json!({
        "message": API_NAME,
        "version": API_VERSION,
        "status": "healthy",
        "features": [
            "Advanced sentiment analysis",
            "Churn prediction & revenue risk",
            "WhatsApp conversation cost optimization",
            "Template category recommendations",
            "Performance optimized bulk processing",
            "Multi-language support"
        ],
        "timestamp": now_iso(),
    }))
}

pub async fn performance(State(container): AppState) -> Json<Value> {
    let policy = container.policy();

    Json(json!({
        "api_version": API_VERSION,
        "performance_optimizations": {
            "bulk_processing": format!(
                "Combined batch processing for <= {} messages",
                policy.combined_threshold
            ),
            "individual_fallback": "Per-message processing for larger batches",
            "message_limits": format!("{} messages max per bulk request", policy.max_batch_size),
            "character_limits": format!(
                "{} characters max per message",
                container.max_message_chars()
            ),
        },
        "business_intelligence_features": [
            "Churn probability prediction",
            "Revenue risk assessment",
            "Purchase intent scoring",
            "WhatsApp conversation cost optimization",
            "Template category recommendations",
            "Response success prediction",
            "Multi-language support (Hindi/English)"
        ],
        "integration_ready": {
            "aisensy_endpoint": "/aisensy/chat-analysis",
            "bulk_endpoint": "/analyze-bulk",
            "single_endpoint": "/analyze-sentiment",
            "health_check": "/health"
        },
    }))
}
