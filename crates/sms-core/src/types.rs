use serde::{Deserialize, Serialize};

pub const SEND_SUCCESS: &str = "SMS sent successfully";
pub const SEND_FAILURE: &str = "Failed to send SMS";
pub const BULK_SUCCESS: &str = "Bulk SMS sent successfully";
pub const BULK_FAILURE: &str = "Failed to send bulk SMS";
pub const BALANCE_SUCCESS: &str = "Balance retrieved successfully";
pub const BALANCE_FAILURE: &str = "Failed to retrieve balance";

/// Per-call overrides. Never written back into the client's configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SendOptions {
    /// Sender id/name for this call only (Sparrow `from`, Akash `sender_id`,
    /// Fast `sender`).
    pub sender: Option<String>,
    /// Skip the provider's phone validator in `send`.
    pub skip_phone_validation: bool,
}

impl SendOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    pub fn skip_phone_validation(mut self, skip: bool) -> Self {
        self.skip_phone_validation = skip;
        self
    }

    /// Sender override, falling back to the client's configured one.
    pub fn sender_or<'a>(&'a self, configured: &'a str) -> &'a str {
        self.sender.as_deref().unwrap_or(configured)
    }
}

/// Normalized outcome of a send, bulk send or balance call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendResult {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub message: String,
}

impl SendResult {
    pub fn ok(data: Option<serde_json::Value>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data,
            error: None,
            message: message.into(),
        }
    }

    pub fn failed(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            message: message.into(),
        }
    }
}

/// How a gateway fans a message out to several recipients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkStrategy {
    /// One batched provider request; the provider's ack covers every recipient.
    Native,
    /// One `send` per recipient, in order, aggregated into a [`BulkSendResult`].
    Sequential,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipientResult {
    pub recipient: String,
    pub result: SendResult,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkSummary {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
    /// One entry per input recipient, in input order.
    pub results: Vec<RecipientResult>,
}

/// Aggregate of a sequential bulk send.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BulkSendResult {
    pub success: bool,
    pub data: BulkSummary,
    pub message: String,
}

impl BulkSendResult {
    pub fn from_results(results: Vec<RecipientResult>) -> Self {
        let success = results.iter().filter(|r| r.result.success).count();
        let failed = results.len() - success;
        Self {
            success: failed == 0,
            message: format!("{success} messages sent successfully, {failed} failed"),
            data: BulkSummary {
                total: results.len(),
                success,
                failed,
                results,
            },
        }
    }

    /// First result recorded for `recipient`.
    pub fn result_for(&self, recipient: &str) -> Option<&SendResult> {
        self.data
            .results
            .iter()
            .find(|r| r.recipient == recipient)
            .map(|r| &r.result)
    }
}

/// Result of `send_multiple`; the variant follows the gateway's [`BulkStrategy`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MultiSendResult {
    PerRecipient(BulkSendResult),
    Batched(SendResult),
}

impl MultiSendResult {
    pub fn success(&self) -> bool {
        match self {
            Self::Batched(result) => result.success,
            Self::PerRecipient(bulk) => bulk.success,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Batched(result) => &result.message,
            Self::PerRecipient(bulk) => &bulk.message,
        }
    }

    pub fn as_bulk(&self) -> Option<&BulkSendResult> {
        match self {
            Self::PerRecipient(bulk) => Some(bulk),
            Self::Batched(_) => None,
        }
    }

    pub fn as_batched(&self) -> Option<&SendResult> {
        match self {
            Self::Batched(result) => Some(result),
            Self::PerRecipient(_) => None,
        }
    }
}
