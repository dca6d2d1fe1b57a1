use std::collections::BTreeSet;

use serde::Serialize;

use super::{
    AlertLevel, ConversationCategory, CustomerValueTier, Likelihood, MessageRequest,
    ResponseTime, RetentionAction, RevenueRisk, Sentiment,
};

/// Currency used for WhatsApp conversation pricing.
pub const CURRENCY_SYMBOL: &str = "₹";

pub fn format_currency(amount: f64) -> String {
    format!("{}{:.2}", CURRENCY_SYMBOL, amount)
}

/// Parse a currency-formatted amount such as `₹0.88`, `Rs. 12` or `0.125`.
///
/// Any leading symbol or prefix is skipped; returns `None` when what remains
/// is not a number.
pub fn parse_currency(text: &str) -> Option<f64> {
    let numeric = text
        .trim()
        .trim_start_matches(|c: char| !(c.is_ascii_digit() || c == '-' || c == '.'));
    numeric
        .parse::<f64>()
        .or_else(|_| numeric.trim_start_matches('.').trim().parse::<f64>())
        .ok()
        .filter(|v| v.is_finite())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostPrediction {
    pub optimal_conversation_type: ConversationCategory,
    pub predicted_cost: String,
    pub cost_saved: String,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponsePrediction {
    pub success_probability: u8,
    pub best_response_time: ResponseTime,
    pub escalation_probability: u8,
    pub resolution_likelihood: Likelihood,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateRecommendation {
    pub primary_category: ConversationCategory,
    pub confidence: u8,
    pub cost_impact: String,
    pub avoid_categories: BTreeSet<String>,
    pub reasoning: String,
}

/// Everything the model contributes to a [`SentimentResult`].
///
/// Only the response parser builds these from model output, and it validates
/// every range before doing so. Fields are crate-private so an unchecked
/// payload cannot be assembled elsewhere; read them through
/// [`SentimentResult`].
///
/// ```compile_fail
/// let payload = chatsense::domain::AnalysisPayload::fallback("x");
/// let _ = payload.churn_probability;
/// ```
///
/// ```compile_fail
/// let _: chatsense::domain::AnalysisPayload = serde_json::from_str("{}").unwrap();
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisPayload {
    pub(crate) sentiment: Sentiment,
    pub(crate) confidence_score: f64,
    pub(crate) reasoning: String,
    pub(crate) alert_level: AlertLevel,

    pub(crate) churn_probability: u8,
    pub(crate) revenue_risk: RevenueRisk,
    pub(crate) purchase_intent: u8,
    pub(crate) customer_value_tier: CustomerValueTier,
    pub(crate) retention_action: RetentionAction,

    pub(crate) cost_prediction: CostPrediction,
    pub(crate) response_prediction: ResponsePrediction,
    pub(crate) template_recommendation: TemplateRecommendation,
}

impl AnalysisPayload {
    /// Conservative defaults used when the model's verdict is unavailable:
    /// neutral, medium alert, free service category, never marketing.
    pub fn fallback(cause: &str) -> Self {
        Self {
            sentiment: Sentiment::Neutral,
            confidence_score: 0.0,
            reasoning: format!("Analysis error: {}", cause),
            alert_level: AlertLevel::Medium,

            churn_probability: 50,
            revenue_risk: RevenueRisk::AtRisk,
            purchase_intent: 25,
            customer_value_tier: CustomerValueTier::MediumValue,
            retention_action: RetentionAction::FollowUp,

            cost_prediction: CostPrediction {
                optimal_conversation_type: ConversationCategory::Service,
                predicted_cost: format_currency(0.0),
                cost_saved: format_currency(0.0),
                reasoning: "Fallback to safe service category due to analysis error".to_string(),
            },
            response_prediction: ResponsePrediction {
                success_probability: 50,
                best_response_time: ResponseTime::WithinOneHour,
                escalation_probability: 30,
                resolution_likelihood: Likelihood::Medium,
            },
            template_recommendation: TemplateRecommendation {
                primary_category: ConversationCategory::Service,
                confidence: 60,
                cost_impact: format_currency(0.0),
                avoid_categories: BTreeSet::from([ConversationCategory::Marketing
                    .as_str()
                    .to_string()]),
                reasoning: "Safe fallback recommendation - use service category".to_string(),
            },
        }
    }
}

/// One message's analysis, as returned to API clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentResult {
    message: String,
    customer_id: Option<String>,
    agent_id: Option<String>,
    timestamp: Option<String>,
    #[serde(flatten)]
    analysis: AnalysisPayload,
    #[serde(skip)]
    fallback: bool,
}

impl SentimentResult {
    pub fn new(request: &MessageRequest, analysis: AnalysisPayload) -> Self {
        Self {
            message: request.message.clone(),
            customer_id: request.customer_id.clone(),
            agent_id: request.agent_id.clone(),
            timestamp: request.timestamp.clone(),
            analysis,
            fallback: false,
        }
    }

    pub fn fallback(request: &MessageRequest, cause: &str) -> Self {
        Self {
            fallback: true,
            ..Self::new(request, AnalysisPayload::fallback(cause))
        }
    }

    /// Whether this record was substituted because no usable analysis was obtained.
    pub fn is_fallback(&self) -> bool {
        self.fallback
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn customer_id(&self) -> Option<&str> {
        self.customer_id.as_deref()
    }

    pub fn agent_id(&self) -> Option<&str> {
        self.agent_id.as_deref()
    }

    pub fn timestamp(&self) -> Option<&str> {
        self.timestamp.as_deref()
    }

    pub fn analysis(&self) -> &AnalysisPayload {
        &self.analysis
    }

    pub fn sentiment(&self) -> Sentiment {
        self.analysis.sentiment
    }

    pub fn confidence_score(&self) -> f64 {
        self.analysis.confidence_score
    }

    pub fn reasoning(&self) -> &str {
        &self.analysis.reasoning
    }

    pub fn alert_level(&self) -> AlertLevel {
        self.analysis.alert_level
    }

    pub fn churn_probability(&self) -> u8 {
        self.analysis.churn_probability
    }

    pub fn revenue_risk(&self) -> RevenueRisk {
        self.analysis.revenue_risk
    }

    pub fn purchase_intent(&self) -> u8 {
        self.analysis.purchase_intent
    }

    pub fn customer_value_tier(&self) -> CustomerValueTier {
        self.analysis.customer_value_tier
    }

    pub fn retention_action(&self) -> RetentionAction {
        self.analysis.retention_action
    }

    pub fn cost_prediction(&self) -> &CostPrediction {
        &self.analysis.cost_prediction
    }

    pub fn response_prediction(&self) -> &ResponsePrediction {
        &self.analysis.response_prediction
    }

    pub fn template_recommendation(&self) -> &TemplateRecommendation {
        &self.analysis.template_recommendation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_record_is_conservative() {
        let request = MessageRequest::new("where is my order")
            .with_customer_id("c-1")
            .with_agent_id("a-9");
        let result = SentimentResult::fallback(&request, "timeout");

        assert!(result.is_fallback());
        assert_eq!(result.message(), "where is my order");
        assert_eq!(result.customer_id(), Some("c-1"));
        assert_eq!(result.agent_id(), Some("a-9"));
        assert_eq!(result.sentiment(), Sentiment::Neutral);
        assert_eq!(result.confidence_score(), 0.0);
        assert_eq!(result.alert_level(), AlertLevel::Medium);
        assert_eq!(result.churn_probability(), 50);
        assert_eq!(result.purchase_intent(), 25);
        assert_eq!(result.revenue_risk(), RevenueRisk::AtRisk);
        assert_eq!(result.retention_action(), RetentionAction::FollowUp);
        assert_eq!(result.reasoning(), "Analysis error: timeout");
        assert_eq!(result.cost_prediction().cost_saved, "₹0.00");
        assert_eq!(
            result.template_recommendation().primary_category,
            ConversationCategory::Service
        );
        assert!(result
            .template_recommendation()
            .avoid_categories
            .contains("marketing"));
    }

    #[test]
    fn serializes_flat_snake_case_record() {
        let request = MessageRequest::new("hello").with_timestamp("2024-05-01T10:00:00");
        let result = SentimentResult::fallback(&request, "no json");
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["message"], "hello");
        assert_eq!(json["sentiment"], "neutral");
        assert_eq!(json["alert_level"], "medium");
        assert_eq!(json["timestamp"], "2024-05-01T10:00:00");
        assert_eq!(json["customer_id"], serde_json::Value::Null);
        assert_eq!(json["response_prediction"]["best_response_time"], "within_1_hour");
        assert_eq!(json["template_recommendation"]["avoid_categories"][0], "marketing");
        assert!(json.get("fallback").is_none());
    }

    #[test]
    fn parse_currency_strips_prefixes() {
        assert_eq!(parse_currency("₹0.88"), Some(0.88));
        assert_eq!(parse_currency(" ₹0.125 "), Some(0.125));
        assert_eq!(parse_currency("Rs. 12"), Some(12.0));
        assert_eq!(parse_currency("0.5"), Some(0.5));
        assert_eq!(parse_currency("free"), None);
        assert_eq!(parse_currency("₹0.00/₹0.125"), None);
        assert_eq!(parse_currency(""), None);
    }

    #[test]
    fn format_currency_uses_two_decimals() {
        assert_eq!(format_currency(0.0), "₹0.00");
        assert_eq!(format_currency(1.25 + 0.88), "₹2.13");
        assert_eq!(parse_currency("₹.5"), Some(0.5));
    }
}
