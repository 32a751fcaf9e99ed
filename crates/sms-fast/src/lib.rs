//! # Fast SMS
//!
//! Fast SMS (<https://fastsms.com>) backend. Authenticates with a bearer API
//! key and accepts international numbers; bulk sends use the `send-bulk`
//! endpoint.

use async_trait::async_trait;
use serde::Serialize;
use sms_core::http;
use sms_core::{
    BulkStrategy, GatewayConfig, GatewayError, MultiSendResult, PhoneValidator, SendOptions,
    SendResult, SmsGateway,
};
use std::fmt;
use tracing::debug;

pub const PROVIDER: &str = "fast";
pub const DEFAULT_BASE_URL: &str = "https://fastsms.com/api/v1/";

/// Fast SMS REST client.
#[derive(Clone)]
pub struct FastClient {
    api_key: String,
    sender: String,
    /// API base URL; override for testing/mocking.
    base_url: String,
    http: reqwest::Client,
}

impl FastClient {
    /// Build from `api_key`, `sender` and optional `base_url`.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        Self::with_http_client(config, reqwest::Client::new())
    }

    pub fn with_http_client(
        config: &GatewayConfig,
        http: reqwest::Client,
    ) -> Result<Self, GatewayError> {
        Ok(Self {
            api_key: config.require(PROVIDER, "api_key")?,
            sender: config.require(PROVIDER, "sender")?,
            base_url: config.get_or("base_url", DEFAULT_BASE_URL),
            http,
        })
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
        outcome: http::Outcome,
    ) -> Result<SendResult, GatewayError> {
        let response = self
            .http
            .post(http::endpoint(&self.base_url, path))
            .bearer_auth(&self.api_key)
            .json(payload)
            .send()
            .await;
        http::normalize(PROVIDER, response, outcome).await
    }
}

impl fmt::Debug for FastClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FastClient")
            .field("sender", &self.sender)
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct FastSendRequest<'a> {
    sender: &'a str,
    recipient: &'a str,
    message: &'a str,
}

#[derive(Debug, Serialize)]
struct FastBulkRequest<'a> {
    sender: &'a str,
    recipients: &'a [String],
    message: &'a str,
}

#[async_trait]
impl SmsGateway for FastClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn bulk_strategy(&self) -> BulkStrategy {
        BulkStrategy::Native
    }

    fn phone_validator(&self) -> PhoneValidator {
        PhoneValidator::International
    }

    async fn send(
        &self,
        to: &str,
        message: &str,
        options: &SendOptions,
    ) -> Result<SendResult, GatewayError> {
        self.ensure_valid_recipient(to, options)?;
        debug!(gateway = PROVIDER, to, "sending sms");
        let payload = FastSendRequest {
            sender: options.sender_or(&self.sender),
            recipient: to,
            message,
        };
        self.post("send", &payload, http::SEND).await
    }

    async fn send_multiple(
        &self,
        recipients: &[String],
        message: &str,
        options: &SendOptions,
    ) -> Result<MultiSendResult, GatewayError> {
        debug!(gateway = PROVIDER, count = recipients.len(), "sending bulk sms");
        let payload = FastBulkRequest {
            sender: options.sender_or(&self.sender),
            recipients,
            message,
        };
        let result = self.post("send-bulk", &payload, http::BULK).await?;
        Ok(MultiSendResult::Batched(result))
    }

    async fn check_balance(&self) -> Result<SendResult, GatewayError> {
        let response = self
            .http
            .get(http::endpoint(&self.base_url, "balance"))
            .bearer_auth(&self.api_key)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .send()
            .await;
        http::normalize(PROVIDER, response, http::BALANCE).await
    }
}
