//! Integration tests for chatsense.
//!
//! These tests drive the public API end to end with the offline mock client.

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use chatsense::{
    http_router, AnalyzeBulkUseCase, AnalyzeMessageUseCase, CompletionClient, Container,
    ContainerConfig, DispatchMode, DomainError, MessageRequest, MockCompletion, Sentiment,
};

/// Answers like [`MockCompletion`], except that combined prompts get prose
/// and any single prompt mentioning `FAIL` errors out.
struct FlakyClient {
    inner: MockCompletion,
}

#[async_trait]
impl CompletionClient for FlakyClient {
    async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
        if prompt.contains("Messages to analyze:") {
            return Ok("Sorry, I can only look at one message at a time.".to_string());
        }
        if prompt.contains("FAIL") {
            return Err(DomainError::completion("simulated outage"));
        }
        self.inner.complete(prompt).await
    }

    fn model_name(&self) -> &str {
        "flaky"
    }
}

fn sample_messages() -> Vec<MessageRequest> {
    vec![
        MessageRequest::new("Amazing product! Where can I buy the premium version?")
            .with_customer_id("c-1"),
        MessageRequest::new("How do I track my order status?").with_customer_id("c-2"),
        MessageRequest::new("This is terrible, the app crashed and I want a refund")
            .with_customer_id("c-3"),
        MessageRequest::new("Thanks, the delivery was perfect").with_customer_id("c-4"),
        MessageRequest::new("Please send the invoice").with_customer_id("c-5"),
    ]
}

#[tokio::test]
async fn test_single_message_with_mock_client() {
    let use_case = AnalyzeMessageUseCase::new(Arc::new(MockCompletion::new()));
    let request = MessageRequest::new("Worst support ever, I am switching providers")
        .with_customer_id("cust-1")
        .with_agent_id("agent-7");

    let result = use_case.execute(&request).await.expect("analysis failed");

    assert!(!result.is_fallback());
    assert_eq!(result.sentiment(), Sentiment::Negative);
    assert!(result.alert_level().requires_alert());
    assert_eq!(result.customer_id(), Some("cust-1"));
    assert_eq!(result.agent_id(), Some("agent-7"));
}

#[tokio::test]
async fn test_bulk_combined_mode_preserves_order() {
    let use_case = AnalyzeBulkUseCase::new(Arc::new(MockCompletion::new()));
    let messages = sample_messages();

    let analysis = use_case.execute(&messages).await.expect("bulk failed");

    assert_eq!(analysis.mode, DispatchMode::Combined);
    assert_eq!(analysis.results.len(), 5);
    for (result, request) in analysis.results.iter().zip(&messages) {
        assert_eq!(result.message(), request.message);
        assert_eq!(result.customer_id(), request.customer_id.as_deref());
        assert!(!result.is_fallback());
    }
    assert_eq!(analysis.results[0].sentiment(), Sentiment::Positive);
    assert_eq!(analysis.results[2].sentiment(), Sentiment::Negative);
    assert_eq!(analysis.summary.total_messages, 5);
}

#[tokio::test]
async fn test_bulk_large_batch_goes_individual() {
    let use_case = AnalyzeBulkUseCase::new(Arc::new(MockCompletion::new()));
    let messages: Vec<MessageRequest> = (0..12)
        .map(|i| MessageRequest::new(format!("Question number {}", i)))
        .collect();

    let analysis = use_case.execute(&messages).await.expect("bulk failed");

    assert_eq!(analysis.mode, DispatchMode::Individual);
    assert_eq!(analysis.results.len(), 12);
    assert_eq!(analysis.summary.sentiment_distribution.neutral, 12);
}

#[tokio::test]
async fn test_bulk_isolates_failing_message() {
    let client = Arc::new(FlakyClient {
        inner: MockCompletion::new(),
    });
    let use_case = AnalyzeBulkUseCase::new(client);
    let mut messages = sample_messages();
    messages[2] = MessageRequest::new("FAIL on this one").with_customer_id("c-3");

    let analysis = use_case.execute(&messages).await.expect("bulk failed");

    assert_eq!(analysis.mode, DispatchMode::Individual);
    assert_eq!(analysis.results.len(), 5);
    for (i, result) in analysis.results.iter().enumerate() {
        assert_eq!(result.is_fallback(), i == 2, "result {}", i);
    }
    assert_eq!(analysis.results[2].customer_id(), Some("c-3"));
    assert!(analysis.results[2].reasoning().contains("simulated outage"));
}

#[tokio::test]
async fn test_http_bulk_endpoint_end_to_end() {
    let config = ContainerConfig {
        mock_llm: true,
        ..ContainerConfig::default()
    };
    let container = Container::new(config).expect("container");
    let app = http_router(Arc::new(container));

    let body = serde_json::json!({
        "messages": sample_messages()
    });
    let request = Request::builder()
        .method("POST")
        .uri("/analyze-bulk")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(value["processing_mode"], "combined");
    assert_eq!(value["results"].as_array().unwrap().len(), 5);

    let sentiment = &value["summary"]["sentiment_distribution"];
    let total = sentiment["positive_percentage"].as_f64().unwrap()
        + sentiment["negative_percentage"].as_f64().unwrap()
        + sentiment["neutral_percentage"].as_f64().unwrap();
    assert!((total - 100.0).abs() <= 0.1);
    assert!(value["summary"]["business_intelligence"]["total_cost_savings"]
        .as_str()
        .unwrap()
        .starts_with('₹'));
}
