use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Completion error: {0}")]
    CompletionError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl DomainError {
    pub fn completion(msg: impl Into<String>) -> Self {
        Self::CompletionError(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::ParseError(msg.into())
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn is_completion_error(&self) -> bool {
        matches!(self, Self::CompletionError(_))
    }

    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}
