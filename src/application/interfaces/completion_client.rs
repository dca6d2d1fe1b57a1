use async_trait::async_trait;

use crate::domain::DomainError;

/// Sends a single formatted prompt to a language model and returns the raw
/// text completion.
///
/// Implementors encapsulate transport, authentication and vendor-specific
/// request shapes. No structured-output guarantee is assumed: the returned
/// text may wrap the expected JSON in arbitrary prose.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, DomainError>;

    /// Model identifier, for logging and health reports.
    fn model_name(&self) -> &str;
}
