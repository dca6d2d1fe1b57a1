use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::Local;

use crate::connector::adapter::http::BulkSentimentResponse;
use crate::domain::MessageRequest;

use super::super::Container;

pub struct BulkController<'a> {
    container: &'a Container,
}

impl<'a> BulkController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn bulk(&self, file: &Path) -> Result<String> {
        let content = tokio::fs::read_to_string(file)
            .await
            .with_context(|| format!("failed to read {}", file.display()))?;

        let messages = self.parse_messages(&content);
        if messages.is_empty() {
            bail!("No messages found in {}", file.display());
        }

        let max_batch = self.container.policy().max_batch_size;
        if messages.len() > max_batch {
            bail!(
                "{} holds {} messages; at most {} are allowed per bulk run",
                file.display(),
                messages.len(),
                max_batch
            );
        }

        let analysis = self
            .container
            .analyze_bulk_use_case()
            .execute(&messages)
            .await?;

        Ok(serde_json::to_string_pretty(&BulkSentimentResponse::from(
            analysis,
        ))?)
    }

    /// One message per non-blank line, truncated to the configured cap.
    fn parse_messages(&self, content: &str) -> Vec<MessageRequest> {
        let timestamp = Local::now().to_rfc3339();
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| {
                MessageRequest::new(line)
                    .with_timestamp(timestamp.clone())
                    .truncated(self.container.max_message_chars())
            })
            .collect()
    }
}
