use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::application::CompletionClient;
use crate::domain::{format_currency, Sentiment};

const POSITIVE_WORDS: &[&str] = &[
    "amazing", "awesome", "excellent", "fantastic", "good", "great", "happy", "love",
    "outstanding", "perfect", "recommend", "satisfied", "thank", "thanks", "wonderful",
];

const NEGATIVE_WORDS: &[&str] = &[
    "angry", "awful", "bad", "broken", "cancel", "complaint", "crashed", "disappointed",
    "frustrated", "hate", "issue", "poor", "problem", "refund", "slow", "switching", "terrible",
    "worst",
];

const PURCHASE_WORDS: &[&str] = &["buy", "premium", "price", "pricing", "purchase", "upgrade"];

const SECURITY_WORDS: &[&str] = &["login", "otp", "password", "verify", "verification"];

const BATCH_HEADER: &str = "Messages to analyze:";

const MARKETING_COST: f64 = 0.88;
const UTILITY_COST: f64 = 0.125;

/// Offline [`CompletionClient`] that answers with keyword-based analyses.
///
/// It recognises the single-message and combined prompts by their
/// `Message: "..."` and `Message <i>: ...` lines and replies with JSON in the
/// shape the real model is asked for. Useful for local runs and tests where no
/// API key is available; the verdicts are deterministic but naive.
pub struct MockCompletion;

impl MockCompletion {
    pub fn new() -> Self {
        Self
    }

    fn count_hits(words: &[String], lexicon: &[&str]) -> usize {
        words
            .iter()
            .filter(|w| lexicon.contains(&w.as_str()))
            .count()
    }

    fn tokenize(message: &str) -> Vec<String> {
        message
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect()
    }

    fn classify(message: &str) -> (Sentiment, usize) {
        let words = Self::tokenize(message);
        let positive = Self::count_hits(&words, POSITIVE_WORDS);
        let negative = Self::count_hits(&words, NEGATIVE_WORDS);

        if negative > positive {
            (Sentiment::Negative, negative)
        } else if positive > negative {
            (Sentiment::Positive, positive)
        } else {
            (Sentiment::Neutral, 0)
        }
    }

    fn analyze(message: &str) -> Value {
        let (sentiment, hits) = Self::classify(message);
        let words = Self::tokenize(message);
        let buying = Self::count_hits(&words, PURCHASE_WORDS) > 0;
        let security = Self::count_hits(&words, SECURITY_WORDS) > 0;
        let confidence = (0.55 + 0.1 * hits as f64).min(0.95);

        let (alert, churn, risk, intent, tier, action, category, cost, saved, timing) =
            match sentiment {
                Sentiment::Negative if hits >= 2 => (
                    "high", 80, "high_risk", 5, "medium_value", "urgent_intervention",
                    "service", 0.0, MARKETING_COST, "immediate",
                ),
                Sentiment::Negative => (
                    "medium", 60, "at_risk", 10, "medium_value", "manager_call",
                    "service", 0.0, MARKETING_COST, "within_1_hour",
                ),
                Sentiment::Positive if buying => (
                    "low", 10, "safe", 85, "high_value", "none",
                    "marketing", MARKETING_COST, 0.0, "within_1_hour",
                ),
                Sentiment::Positive => (
                    "low", 15, "safe", 55, "medium_value", "none",
                    "marketing", MARKETING_COST, 0.0, "within_24_hours",
                ),
                Sentiment::Neutral => (
                    "low", 30, "safe", if buying { 60 } else { 30 }, "medium_value", "follow_up",
                    "utility", UTILITY_COST, 0.0, "within_1_hour",
                ),
            };
        let category = if security { "authentication" } else { category };
        let avoid: Vec<&str> = match sentiment {
            Sentiment::Negative => vec!["marketing"],
            _ => vec![],
        };

        json!({
            "sentiment": sentiment.as_str(),
            "confidence_score": confidence,
            "reasoning": format!("Keyword match: {} {} cue(s)", hits, sentiment),
            "alert_level": alert,
            "churn_probability": churn,
            "revenue_risk": risk,
            "purchase_intent": intent,
            "customer_value_tier": tier,
            "retention_action": action,
            "cost_prediction": {
                "optimal_conversation_type": category,
                "predicted_cost": format_currency(cost),
                "cost_saved": format_currency(saved),
                "reasoning": format!("{} conversation fits a {} message", category, sentiment)
            },
            "response_prediction": {
                "success_probability": if sentiment == Sentiment::Negative { 55 } else { 80 },
                "best_response_time": timing,
                "escalation_probability": if sentiment == Sentiment::Negative { 60 } else { 10 },
                "resolution_likelihood": if sentiment == Sentiment::Negative { "medium" } else { "high" }
            },
            "template_recommendation": {
                "primary_category": category,
                "confidence": 70,
                "cost_impact": format_currency(cost),
                "avoid_categories": avoid,
                "reasoning": format!("Default {} template", category)
            }
        })
    }

    /// Messages enumerated as `Message <i>: <text>` in a combined prompt.
    fn batch_messages(prompt: &str) -> Vec<&str> {
        let Some(start) = prompt.find(BATCH_HEADER) else {
            return Vec::new();
        };
        prompt[start + BATCH_HEADER.len()..]
            .lines()
            .filter_map(|line| {
                let rest = line.strip_prefix("Message ")?;
                let (index, text) = rest.split_once(": ")?;
                index.parse::<usize>().ok().map(|_| text)
            })
            .collect()
    }

    /// The quoted text after `Message: ` in a single-message prompt.
    fn single_message(prompt: &str) -> Option<&str> {
        let start = prompt.find("Message: \"")? + "Message: \"".len();
        let rest = &prompt[start..];
        let end = rest.find("\"\n").unwrap_or(rest.len());
        Some(&rest[..end])
    }
}

impl Default for MockCompletion {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CompletionClient for MockCompletion {
    async fn complete(&self, prompt: &str) -> Result<String, crate::domain::DomainError> {
        let batch = Self::batch_messages(prompt);
        let reply = if !batch.is_empty() {
            let items: Vec<Value> = batch.iter().map(|m| Self::analyze(m)).collect();
            Value::Array(items)
        } else {
            Self::analyze(Self::single_message(prompt).unwrap_or(prompt))
        };

        debug!("Generated mock completion ({} batch items)", batch.len());
        Ok(reply.to_string())
    }

    fn model_name(&self) -> &str {
        "mock-completion"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::response_parser::{parse_bulk, parse_single};
    use crate::application::use_cases::prompts::{bulk_prompt, single_message_prompt};
    use crate::domain::{AlertLevel, ConversationCategory, MessageRequest};

    #[tokio::test]
    async fn single_prompt_gets_parsable_object() {
        let client = MockCompletion::new();
        let prompt = single_message_prompt("This service is terrible! I want a refund now!");

        let reply = client.complete(&prompt).await.unwrap();
        let payload = parse_single(&reply).unwrap();

        assert_eq!(payload.sentiment, Sentiment::Negative);
        assert_eq!(payload.alert_level, AlertLevel::High);
        assert_eq!(
            payload.template_recommendation.primary_category,
            ConversationCategory::Service
        );
        assert!(payload
            .template_recommendation
            .avoid_categories
            .contains("marketing"));
    }

    #[tokio::test]
    async fn bulk_prompt_gets_array_in_order() {
        let client = MockCompletion::new();
        let messages = vec![
            MessageRequest::new("Amazing product! Where can I buy the premium version?"),
            MessageRequest::new("How do I track my order status?"),
            MessageRequest::new("Website crashed during checkout. Frustrated!"),
        ];

        let reply = client.complete(&bulk_prompt(&messages)).await.unwrap();
        let payloads = parse_bulk(&reply).unwrap();

        assert_eq!(payloads.len(), 3);
        assert_eq!(payloads[0].sentiment, Sentiment::Positive);
        assert_eq!(payloads[0].purchase_intent, 85);
        assert_eq!(payloads[1].sentiment, Sentiment::Neutral);
        assert_eq!(payloads[2].sentiment, Sentiment::Negative);
    }

    #[test]
    fn security_messages_map_to_authentication() {
        let value = MockCompletion::analyze("I can't login, please resend the OTP");
        assert_eq!(value["template_recommendation"]["primary_category"], "authentication");
    }

    #[test]
    fn single_message_extraction() {
        let prompt = single_message_prompt("hello \"there\"");
        assert_eq!(MockCompletion::single_message(&prompt), Some("hello \"there\""));
    }
}
