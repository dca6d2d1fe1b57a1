use std::sync::Arc;
use std::time::Duration;

use anyhow::{ensure, Result};
use tracing::debug;

use crate::application::{
    AnalyzeBulkUseCase, AnalyzeMessageUseCase, CompletionClient, DispatchPolicy,
};
use crate::connector::adapter::{GroqClient, MockCompletion, DEFAULT_TIMEOUT_SECS};

/// Longest message accepted by the single-message endpoints; bulk and chat
/// inputs are truncated to it instead.
pub const DEFAULT_MAX_MESSAGE_CHARS: usize = 2000;

#[derive(Debug, Clone)]
pub struct ContainerConfig {
    /// Use the offline keyword-based client instead of calling Groq.
    pub mock_llm: bool,
    pub timeout_secs: u64,
    pub policy: DispatchPolicy,
    pub max_message_chars: usize,
}

impl Default for ContainerConfig {
    fn default() -> Self {
        Self {
            mock_llm: false,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            policy: DispatchPolicy::default(),
            max_message_chars: DEFAULT_MAX_MESSAGE_CHARS,
        }
    }
}

pub struct Container {
    client: Arc<dyn CompletionClient>,
    config: ContainerConfig,
}

impl Container {
    pub fn new(config: ContainerConfig) -> Result<Self> {
        ensure!(
            config.policy.max_batch_size >= 1,
            "max batch size must be at least 1"
        );
        ensure!(
            config.max_message_chars >= 1,
            "max message length must be at least 1 character"
        );

        let client: Arc<dyn CompletionClient> = if config.mock_llm {
            debug!("Using mock completion client");
            Arc::new(MockCompletion::new())
        } else {
            let client = GroqClient::from_env(Duration::from_secs(config.timeout_secs))?;
            debug!("Using Groq completion client at {}", client.url());
            Arc::new(client)
        };

        Ok(Self::with_client(client, config))
    }

    /// Wire the container around an already constructed client.
    pub fn with_client(client: Arc<dyn CompletionClient>, config: ContainerConfig) -> Self {
        Self { client, config }
    }

    pub fn analyze_message_use_case(&self) -> AnalyzeMessageUseCase {
        AnalyzeMessageUseCase::new(self.client.clone())
    }

    pub fn analyze_bulk_use_case(&self) -> AnalyzeBulkUseCase {
        AnalyzeBulkUseCase::new(self.client.clone()).with_policy(self.config.policy)
    }

    pub fn model_name(&self) -> &str {
        self.client.model_name()
    }

    pub fn policy(&self) -> DispatchPolicy {
        self.config.policy
    }

    pub fn max_message_chars(&self) -> usize {
        self.config.max_message_chars
    }
}
