use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::application::use_cases::prompts::bulk_prompt;
use crate::application::use_cases::response_parser::parse_bulk;
use crate::application::use_cases::summarize::summarize;
use crate::application::{AnalyzeMessageUseCase, CompletionClient};
use crate::domain::{BatchSummary, DomainError, MessageRequest, SentimentResult};

/// Batches up to this size are sent to the model as one combined prompt.
pub const DEFAULT_COMBINED_THRESHOLD: usize = 8;

/// Largest batch accepted per bulk request.
pub const DEFAULT_MAX_BATCH_SIZE: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchPolicy {
    pub combined_threshold: usize,
    pub max_batch_size: usize,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self {
            combined_threshold: DEFAULT_COMBINED_THRESHOLD,
            max_batch_size: DEFAULT_MAX_BATCH_SIZE,
        }
    }
}

/// How a batch ended up being analyzed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchMode {
    /// One completion request for the whole batch.
    Combined,
    /// One completion request per message, in order.
    Individual,
}

#[derive(Debug, Clone)]
pub struct BulkAnalysis {
    pub results: Vec<SentimentResult>,
    pub summary: BatchSummary,
    pub mode: DispatchMode,
}

/// Analyzes a batch of messages, choosing between a combined prompt and
/// per-message requests.
///
/// Small batches cost a single round trip but depend on the model returning
/// a well-formed array; when it doesn't, the whole batch is re-run one
/// message at a time so that a bad reply only ever costs one message.
pub struct AnalyzeBulkUseCase {
    client: Arc<dyn CompletionClient>,
    single: AnalyzeMessageUseCase,
    policy: DispatchPolicy,
}

impl AnalyzeBulkUseCase {
    pub fn new(client: Arc<dyn CompletionClient>) -> Self {
        Self {
            single: AnalyzeMessageUseCase::new(client.clone()),
            client,
            policy: DispatchPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: DispatchPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> DispatchPolicy {
        self.policy
    }

    /// Produce exactly one result per message (up to the batch cap), in input order.
    pub async fn execute(&self, messages: &[MessageRequest]) -> Result<BulkAnalysis, DomainError> {
        if messages.is_empty() {
            return Err(DomainError::invalid_input("Messages list cannot be empty"));
        }

        let messages = if messages.len() > self.policy.max_batch_size {
            warn!(
                "Limited batch of {} messages to the first {}",
                messages.len(),
                self.policy.max_batch_size
            );
            &messages[..self.policy.max_batch_size]
        } else {
            messages
        };

        let start_time = Instant::now();

        let (results, mode) = if messages.len() <= self.policy.combined_threshold {
            match self.analyze_combined(messages).await {
                Ok(results) => (results, DispatchMode::Combined),
                Err(e) => {
                    warn!(
                        "Combined analysis failed: {}. Falling back to individual processing.",
                        e
                    );
                    (self.analyze_individually(messages).await, DispatchMode::Individual)
                }
            }
        } else {
            (self.analyze_individually(messages).await, DispatchMode::Individual)
        };

        let summary = summarize(&results)?;

        info!(
            "Analyzed {} messages ({:?} mode, {} fallbacks) in {:.2}s",
            results.len(),
            mode,
            results.iter().filter(|r| r.is_fallback()).count(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(BulkAnalysis {
            results,
            summary,
            mode,
        })
    }

    /// One prompt for the whole batch. Array element `i` is matched to message
    /// `i` by position; a short array leaves fallbacks for the tail.
    async fn analyze_combined(
        &self,
        messages: &[MessageRequest],
    ) -> Result<Vec<SentimentResult>, DomainError> {
        let prompt = bulk_prompt(messages);
        let reply = self.client.complete(&prompt).await?;
        debug!("Model reply for combined batch: {}", reply);

        let payloads = parse_bulk(&reply).map_err(|e| DomainError::parse(e.to_string()))?;
        if payloads.len() != messages.len() {
            warn!(
                "Model returned {} analyses for {} messages",
                payloads.len(),
                messages.len()
            );
        }

        let mut payloads = payloads.into_iter();
        Ok(messages
            .iter()
            .map(|request| match payloads.next() {
                Some(payload) => SentimentResult::new(request, payload),
                None => SentimentResult::fallback(request, "Batch processing incomplete"),
            })
            .collect())
    }

    /// Sequential per-message requests; a failure only affects its own message.
    async fn analyze_individually(&self, messages: &[MessageRequest]) -> Vec<SentimentResult> {
        info!("Processing {} messages individually", messages.len());

        let mut results = Vec::with_capacity(messages.len());
        for (i, request) in messages.iter().enumerate() {
            debug!("Processing message {}/{}", i + 1, messages.len());
            results.push(self.single.execute_or_fallback(request).await);
        }
        results
    }
}
