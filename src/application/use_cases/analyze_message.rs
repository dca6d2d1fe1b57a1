use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use crate::application::use_cases::prompts::single_message_prompt;
use crate::application::use_cases::response_parser::parse_single;
use crate::application::CompletionClient;
use crate::domain::{DomainError, MessageRequest, SentimentResult};

/// Single-message analysis: one prompt, one completion, strict parse.
pub struct AnalyzeMessageUseCase {
    client: Arc<dyn CompletionClient>,
}

impl AnalyzeMessageUseCase {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self { client }
    }

    /// Analyze one message.
    ///
    /// A reply that cannot be parsed degrades to the fallback record. Only a
    /// failure of the completion request itself is returned as an error.
    pub async fn execute(&self, request: &MessageRequest) -> Result<SentimentResult, DomainError> {
        let start_time = Instant::now();
        let prompt = single_message_prompt(&request.message);

        let reply = self.client.complete(&prompt).await?;
        debug!("Model reply for single message: {}", reply);

        let result = match parse_single(&reply) {
            Ok(payload) => SentimentResult::new(request, payload),
            Err(e) => {
                warn!("Could not parse model reply: {}. Using fallback record.", e);
                SentimentResult::fallback(request, &e.to_string())
            }
        };

        info!(
            "Analyzed message as {} (confidence {:.2}) in {:.2}s",
            result.sentiment(),
            result.confidence_score(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(result)
    }

    /// Like [`execute`](Self::execute), but a completion failure also degrades
    /// to the fallback record.
    pub async fn execute_or_fallback(&self, request: &MessageRequest) -> SentimentResult {
        match self.execute(request).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Completion request failed: {}. Using fallback record.", e);
                SentimentResult::fallback(request, &format!("Processing error: {}", e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::test_support::{analysis_json, ScriptedClient};
    use crate::domain::Sentiment;

    #[tokio::test]
    async fn execute_parses_model_reply() {
        let reply = format!("Here you go: {}", analysis_json("positive", "vip", "₹0.00"));
        let client = Arc::new(ScriptedClient::new(vec![Ok(reply)]));
        let use_case = AnalyzeMessageUseCase::new(client.clone());

        let request = MessageRequest::new("Love it!").with_customer_id("c-7");
        let result = use_case.execute(&request).await.unwrap();

        assert!(!result.is_fallback());
        assert_eq!(result.sentiment(), Sentiment::Positive);
        assert_eq!(result.customer_id(), Some("c-7"));
        assert!(client.prompts()[0].contains("Message: \"Love it!\""));
    }

    #[tokio::test]
    async fn execute_degrades_unparsable_reply_to_fallback() {
        let client = Arc::new(ScriptedClient::new(vec![Ok("I am not sure.".to_string())]));
        let use_case = AnalyzeMessageUseCase::new(client);

        let result = use_case.execute(&MessageRequest::new("hmm")).await.unwrap();
        assert!(result.is_fallback());
        assert_eq!(result.sentiment(), Sentiment::Neutral);
        assert!(result.reasoning().contains("no JSON object found"));
    }

    #[tokio::test]
    async fn execute_propagates_completion_failure() {
        let client = Arc::new(ScriptedClient::new(vec![Err("rate limited".to_string())]));
        let use_case = AnalyzeMessageUseCase::new(client);

        let err = use_case.execute(&MessageRequest::new("hi")).await.unwrap_err();
        assert!(err.is_completion_error());
    }

    #[tokio::test]
    async fn execute_or_fallback_absorbs_completion_failure() {
        let client = Arc::new(ScriptedClient::new(vec![Err("rate limited".to_string())]));
        let use_case = AnalyzeMessageUseCase::new(client);

        let result = use_case.execute_or_fallback(&MessageRequest::new("hi")).await;
        assert!(result.is_fallback());
        assert!(result.reasoning().contains("rate limited"));
    }
}
