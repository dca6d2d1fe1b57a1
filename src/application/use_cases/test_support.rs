//! Test doubles shared by the use case and HTTP tests.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::application::CompletionClient;
use crate::domain::DomainError;

/// Replays scripted replies in order and records every prompt it receives.
pub struct ScriptedClient {
    replies: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    pub fn new(replies: Vec<Result<String, String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for ScriptedClient {
    async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(e)) => Err(DomainError::completion(e)),
            None => Err(DomainError::completion("no scripted reply left")),
        }
    }

    fn model_name(&self) -> &str {
        "scripted"
    }
}

pub fn analysis_json(sentiment: &str, tier: &str, cost_saved: &str) -> serde_json::Value {
    serde_json::json!({
        "sentiment": sentiment,
        "confidence_score": 0.8,
        "reasoning": format!("{} tone", sentiment),
        "alert_level": "low",
        "churn_probability": 20,
        "revenue_risk": "safe",
        "purchase_intent": 70,
        "customer_value_tier": tier,
        "retention_action": "none",
        "cost_prediction": {
            "optimal_conversation_type": "marketing",
            "predicted_cost": "₹0.88",
            "cost_saved": cost_saved,
            "reasoning": "Conversion opportunity"
        },
        "response_prediction": {
            "success_probability": 80,
            "best_response_time": "within_24_hours",
            "escalation_probability": 5,
            "resolution_likelihood": "high"
        },
        "template_recommendation": {
            "primary_category": "marketing",
            "confidence": 75,
            "cost_impact": "₹0.88",
            "avoid_categories": [],
            "reasoning": "Upsell"
        }
    })
}
