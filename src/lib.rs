pub mod application;
pub mod cli;
pub mod connector;
pub mod domain;

pub use application::{
    AnalyzeBulkUseCase, AnalyzeMessageUseCase, BulkAnalysis, CompletionClient, DispatchMode,
    DispatchPolicy,
};

pub use cli::Commands;

pub use connector::{
    http_router, serve, Container, ContainerConfig, GroqClient, MockCompletion, Router,
};

pub use domain::{
    AlertLevel, BatchSummary, DomainError, MessageRequest, Sentiment, SentimentResult,
};
