use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::application::{BulkAnalysis, DispatchMode};
use crate::domain::{
    AlertLevel, BatchSummary, ConversationCategory, CustomerValueTier, MessageRequest,
    ResponseTime, RetentionAction, RevenueRisk, Sentiment, SentimentResult,
};

#[derive(Debug, Deserialize)]
pub struct BulkMessageRequest {
    #[serde(default)]
    pub messages: Vec<MessageRequest>,
}

#[derive(Debug, Serialize)]
pub struct BulkSentimentResponse {
    pub results: Vec<SentimentResult>,
    pub summary: BatchSummary,
    pub processing_mode: DispatchMode,
}

impl From<BulkAnalysis> for BulkSentimentResponse {
    fn from(analysis: BulkAnalysis) -> Self {
        Self {
            results: analysis.results,
            summary: analysis.summary,
            processing_mode: analysis.mode,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChatBusinessIntelligence {
    pub churn_risk: u8,
    pub revenue_risk: RevenueRisk,
    pub purchase_intent: u8,
    pub customer_tier: CustomerValueTier,
    pub retention_action: RetentionAction,
}

#[derive(Debug, Serialize)]
pub struct WhatsappOptimization {
    pub recommended_category: ConversationCategory,
    pub predicted_cost: String,
    pub cost_saved: String,
    pub avoid_categories: BTreeSet<String>,
}

#[derive(Debug, Serialize)]
pub struct ResponseGuidance {
    pub success_probability: u8,
    pub best_response_time: ResponseTime,
    pub escalation_risk: u8,
}

/// Flattened view of a [`SentimentResult`] for live-chat integrations.
#[derive(Debug, Serialize)]
pub struct ChatAnalysisResponse {
    pub message_id: String,
    pub sentiment: Sentiment,
    pub confidence: f64,
    pub alert_required: bool,
    pub alert_level: AlertLevel,
    pub summary: String,
    pub business_intelligence: ChatBusinessIntelligence,
    pub whatsapp_optimization: WhatsappOptimization,
    pub response_guidance: ResponseGuidance,
    pub customer_id: Option<String>,
    pub agent_id: Option<String>,
    pub processed_at: String,
}

impl ChatAnalysisResponse {
    pub fn new(result: &SentimentResult, message_id: String, processed_at: String) -> Self {
        let cost = result.cost_prediction();
        let response = result.response_prediction();
        let template = result.template_recommendation();

        Self {
            message_id,
            sentiment: result.sentiment(),
            confidence: result.confidence_score(),
            alert_required: result.alert_level().requires_alert(),
            alert_level: result.alert_level(),
            summary: result.reasoning().to_string(),
            business_intelligence: ChatBusinessIntelligence {
                churn_risk: result.churn_probability(),
                revenue_risk: result.revenue_risk(),
                purchase_intent: result.purchase_intent(),
                customer_tier: result.customer_value_tier(),
                retention_action: result.retention_action(),
            },
            whatsapp_optimization: WhatsappOptimization {
                recommended_category: template.primary_category,
                predicted_cost: cost.predicted_cost.clone(),
                cost_saved: cost.cost_saved.clone(),
                avoid_categories: template.avoid_categories.clone(),
            },
            response_guidance: ResponseGuidance {
                success_probability: response.success_probability,
                best_response_time: response.best_response_time,
                escalation_risk: response.escalation_probability,
            },
            customer_id: result.customer_id().map(str::to_string),
            agent_id: result.agent_id().map(str::to_string),
            processed_at,
        }
    }
}

/// `msg_<customer>_<unix seconds>` with microsecond precision.
pub fn chat_message_id(customer_id: Option<&str>, unix_micros: i64) -> String {
    format!(
        "msg_{}_{:.6}",
        customer_id.unwrap_or("anonymous"),
        unix_micros as f64 / 1_000_000.0
    )
}
