use serde::{Deserialize, Serialize};

/// Suffix appended to messages cut down to the character cap.
pub const TRUNCATION_MARKER: &str = "...";

/// A customer chat message plus the correlation fields echoed into its result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRequest {
    pub message: String,
    #[serde(default)]
    pub customer_id: Option<String>,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

impl MessageRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            customer_id: None,
            agent_id: None,
            timestamp: None,
        }
    }

    pub fn with_customer_id(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    pub fn with_agent_id(mut self, agent_id: impl Into<String>) -> Self {
        self.agent_id = Some(agent_id.into());
        self
    }

    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Fill in the timestamp only when the caller did not supply one.
    pub fn with_default_timestamp(mut self, timestamp: impl FnOnce() -> String) -> Self {
        if self.timestamp.as_deref().map_or(true, str::is_empty) {
            self.timestamp = Some(timestamp());
        }
        self
    }

    /// Cut the message to `max_chars` characters, appending [`TRUNCATION_MARKER`]
    /// when anything was removed.
    pub fn truncated(mut self, max_chars: usize) -> Self {
        self.message = truncate_chars(&self.message, max_chars);
        self
    }

    /// Number of characters (not bytes) in the message.
    pub fn char_len(&self) -> usize {
        self.message.chars().count()
    }

    pub fn is_blank(&self) -> bool {
        self.message.trim().is_empty()
    }
}

pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}{}", &text[..byte_idx], TRUNCATION_MARKER),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "₹".repeat(5);
        assert_eq!(truncate_chars(&text, 3), "₹₹₹...");
        assert_eq!(truncate_chars(&text, 5), text);
        assert_eq!(truncate_chars(&text, 10), text);
    }

    #[test]
    fn default_timestamp_keeps_existing_value() {
        let req = MessageRequest::new("hi")
            .with_timestamp("2024-01-01T00:00:00")
            .with_default_timestamp(|| "now".to_string());
        assert_eq!(req.timestamp.as_deref(), Some("2024-01-01T00:00:00"));

        let req = MessageRequest::new("hi").with_default_timestamp(|| "now".to_string());
        assert_eq!(req.timestamp.as_deref(), Some("now"));
    }

    #[test]
    fn blank_and_length_checks() {
        assert!(MessageRequest::new("   \n").is_blank());
        assert!(!MessageRequest::new(" ok ").is_blank());
        assert_eq!(MessageRequest::new("héllo").char_len(), 5);
    }

    #[test]
    fn deserializes_with_optional_fields_missing() {
        let req: MessageRequest = serde_json::from_str(r#"{"message": "hello"}"#).unwrap();
        assert_eq!(req, MessageRequest::new("hello"));
    }
}
