use crate::domain::MessageRequest;

const MESSAGE_PLACEHOLDER: &str = "{message}";
const BATCH_PLACEHOLDER: &str = "{messages_batch}";

/// Prompt for a single message. The model must reply with one JSON object.
const SINGLE_PROMPT: &str = r#"You are an expert sentiment analyzer for WhatsApp Business conversations with advanced prediction and recommendation capabilities.
Analyze the message and provide comprehensive business intelligence including cost optimization and template recommendations.

Message: "{message}"

Respond in this EXACT JSON format:
{
    "sentiment": "positive/negative/neutral",
    "confidence_score": 0.0-1.0,
    "reasoning": "Brief explanation of sentiment classification",
    "alert_level": "low/medium/high",

    "churn_probability": 0-100,
    "revenue_risk": "safe/at_risk/high_risk/critical",
    "purchase_intent": 0-100,
    "customer_value_tier": "low_value/medium_value/high_value/vip",
    "retention_action": "none/follow_up/discount_offer/manager_call/urgent_intervention",

    "cost_prediction": {
        "optimal_conversation_type": "service/utility/marketing/authentication",
        "predicted_cost": "₹0.00/₹0.125/₹0.88",
        "cost_saved": "₹0.00/₹0.125/₹0.88",
        "reasoning": "Why this conversation type is recommended"
    },

    "response_prediction": {
        "success_probability": 0-100,
        "best_response_time": "immediate/within_1_hour/within_24_hours",
        "escalation_probability": 0-100,
        "resolution_likelihood": "low/medium/high"
    },

    "template_recommendation": {
        "primary_category": "service/utility/marketing/authentication",
        "confidence": 0-100,
        "cost_impact": "₹0.00/₹0.125/₹0.88",
        "avoid_categories": ["list", "of", "categories"],
        "reasoning": "Why this template category is recommended"
    }
}

BUSINESS RULES:
1. Negative sentiment → service category (FREE) - focus on problem resolution
2. Positive sentiment + high purchase intent → marketing category (₹0.88) - conversion opportunity
3. Neutral sentiment → utility category (₹0.125) - informational updates
4. Never recommend marketing to angry/frustrated customers - waste of money
5. High churn risk customers → immediate response required
6. High-value customers → prioritize retention actions
7. Authentication only for login/security related messages

Only respond with valid JSON, no additional text."#;

/// Prompt for a combined batch. The model must reply with a JSON array whose
/// elements follow the order of the enumerated messages.
const BULK_PROMPT: &str = r#"You are an expert sentiment analyzer. Analyze these messages and return a JSON array with analysis for each message.

Messages to analyze:
{messages_batch}
For each message, provide this exact structure in a JSON array, in the same order as the messages:
[
    {
        "message_index": 1,
        "sentiment": "positive/negative/neutral",
        "confidence_score": 0.0-1.0,
        "reasoning": "Brief explanation",
        "alert_level": "low/medium/high",
        "churn_probability": 0-100,
        "revenue_risk": "safe/at_risk/high_risk/critical",
        "purchase_intent": 0-100,
        "customer_value_tier": "low_value/medium_value/high_value/vip",
        "retention_action": "none/follow_up/discount_offer/manager_call/urgent_intervention",
        "cost_prediction": {
            "optimal_conversation_type": "service/utility/marketing",
            "predicted_cost": "₹0.00/₹0.125/₹0.88",
            "cost_saved": "₹0.00/₹0.125/₹0.88",
            "reasoning": "Brief reason"
        },
        "response_prediction": {
            "success_probability": 0-100,
            "best_response_time": "immediate/within_1_hour/within_24_hours",
            "escalation_probability": 0-100,
            "resolution_likelihood": "low/medium/high"
        },
        "template_recommendation": {
            "primary_category": "service/utility/marketing",
            "confidence": 0-100,
            "cost_impact": "₹0.00/₹0.125/₹0.88",
            "avoid_categories": ["list"],
            "reasoning": "Brief reason"
        }
    }
]

Rules: Negative→service(₹0.00), Positive→marketing(₹0.88), Neutral→utility(₹0.125)
Only return valid JSON array, no additional text."#;

pub fn single_message_prompt(message: &str) -> String {
    SINGLE_PROMPT.replace(MESSAGE_PLACEHOLDER, message)
}

/// Lists the messages as `Message <i>: <text>` lines with 1-based indices.
pub fn bulk_prompt(messages: &[MessageRequest]) -> String {
    let batch: String = messages
        .iter()
        .enumerate()
        .map(|(i, m)| format!("Message {}: {}\n", i + 1, m.message))
        .collect();
    BULK_PROMPT.replace(BATCH_PLACEHOLDER, &batch)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_prompt_embeds_message() {
        let prompt = single_message_prompt("Where is my refund?");
        assert!(prompt.contains("Message: \"Where is my refund?\""));
        assert!(!prompt.contains(MESSAGE_PLACEHOLDER));
    }

    #[test]
    fn bulk_prompt_enumerates_from_one() {
        let messages = vec![MessageRequest::new("first"), MessageRequest::new("second")];
        let prompt = bulk_prompt(&messages);
        assert!(prompt.contains("Message 1: first\nMessage 2: second\n"));
        assert!(!prompt.contains(BATCH_PLACEHOLDER));
    }
}
