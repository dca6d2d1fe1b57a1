use serde::{Deserialize, Serialize};

/// Percentages are rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentDistribution {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
    pub positive_percentage: f64,
    pub negative_percentage: f64,
    pub neutral_percentage: f64,
}

/// Percentages are rounded to 2 decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertDistribution {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
    pub low_percentage: f64,
    pub medium_percentage: f64,
    pub high_percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessIntelligenceSummary {
    pub average_churn_risk: f64,
    pub average_purchase_intent: f64,
    pub high_value_customers: usize,
    pub high_value_percentage: f64,
    pub total_cost_savings: String,
    pub customers_needing_retention: usize,
    pub immediate_response_required: usize,
    pub marketing_opportunities: usize,
    pub service_required: usize,
}

/// Batch-level statistics derived from a non-empty list of results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub total_messages: usize,
    pub sentiment_distribution: SentimentDistribution,
    pub alert_distribution: AlertDistribution,
    pub high_priority_count: usize,
    pub average_confidence: f64,
    pub business_intelligence: BusinessIntelligenceSummary,
}
