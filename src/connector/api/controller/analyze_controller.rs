use anyhow::{bail, Result};
use chrono::Local;

use crate::domain::MessageRequest;

use super::super::Container;

pub struct AnalyzeController<'a> {
    container: &'a Container,
}

impl<'a> AnalyzeController<'a> {
    pub fn new(container: &'a Container) -> Self {
        Self { container }
    }

    pub async fn analyze(
        &self,
        message: String,
        customer_id: Option<String>,
        agent_id: Option<String>,
    ) -> Result<String> {
        let request = MessageRequest {
            message,
            customer_id,
            agent_id,
            timestamp: None,
        };

        if request.is_blank() {
            bail!("Message cannot be empty");
        }
        let max_chars = self.container.max_message_chars();
        if request.char_len() > max_chars {
            bail!("Message too long (max {} characters)", max_chars);
        }

        let request = request.with_default_timestamp(|| Local::now().to_rfc3339());
        let result = self
            .container
            .analyze_message_use_case()
            .execute(&request)
            .await?;

        Ok(serde_json::to_string_pretty(&result)?)
    }
}
