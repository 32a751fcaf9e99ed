//! # Akash SMS
//!
//! Akash SMS (<https://akashsms.com>) backend. Bulk sends go out as a single
//! request with a comma-joined recipient list.

use async_trait::async_trait;
use serde::Serialize;
use sms_core::http;
use sms_core::{
    BulkStrategy, GatewayConfig, GatewayError, MultiSendResult, PhoneValidator, SendOptions,
    SendResult, SmsGateway,
};
use std::fmt;
use tracing::debug;

pub const PROVIDER: &str = "akash";
pub const DEFAULT_BASE_URL: &str = "https://akashsms.com/api/v3/";

/// Akash SMS REST client.
#[derive(Clone)]
pub struct AkashClient {
    auth_key: String,
    sender_id: String,
    /// API base URL; override for testing/mocking.
    base_url: String,
    http: reqwest::Client,
}

impl AkashClient {
    /// Build from `auth_key`, `sender_id` and optional `base_url`.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        Self::with_http_client(config, reqwest::Client::new())
    }

    pub fn with_http_client(
        config: &GatewayConfig,
        http: reqwest::Client,
    ) -> Result<Self, GatewayError> {
        Ok(Self {
            auth_key: config.require(PROVIDER, "auth_key")?,
            sender_id: config.require(PROVIDER, "sender_id")?,
            base_url: config.get_or("base_url", DEFAULT_BASE_URL),
            http,
        })
    }

    pub fn sender_id(&self) -> &str {
        &self.sender_id
    }

    async fn post_send(
        &self,
        payload: &AkashSendRequest<'_>,
        outcome: http::Outcome,
    ) -> Result<SendResult, GatewayError> {
        let response = self
            .http
            .post(http::endpoint(&self.base_url, "sms/send"))
            .json(payload)
            .send()
            .await;
        http::normalize(PROVIDER, response, outcome).await
    }
}

impl fmt::Debug for AkashClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AkashClient")
            .field("sender_id", &self.sender_id)
            .field("base_url", &self.base_url)
            .field("auth_key", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct AkashSendRequest<'a> {
    auth_token: &'a str,
    from: &'a str,
    to: &'a str,
    text: &'a str,
}

#[async_trait]
impl SmsGateway for AkashClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn bulk_strategy(&self) -> BulkStrategy {
        BulkStrategy::Native
    }

    fn phone_validator(&self) -> PhoneValidator {
        PhoneValidator::NepalMobile
    }

    async fn send(
        &self,
        to: &str,
        message: &str,
        options: &SendOptions,
    ) -> Result<SendResult, GatewayError> {
        self.ensure_valid_recipient(to, options)?;
        debug!(gateway = PROVIDER, to, "sending sms");
        let payload = AkashSendRequest {
            auth_token: &self.auth_key,
            from: options.sender_or(&self.sender_id),
            to,
            text: message,
        };
        self.post_send(&payload, http::SEND).await
    }

    async fn send_multiple(
        &self,
        recipients: &[String],
        message: &str,
        options: &SendOptions,
    ) -> Result<MultiSendResult, GatewayError> {
        // Recipients are not validated one by one; the provider's ack covers the batch.
        let to = recipients.join(",");
        debug!(gateway = PROVIDER, count = recipients.len(), "sending bulk sms");
        let payload = AkashSendRequest {
            auth_token: &self.auth_key,
            from: options.sender_or(&self.sender_id),
            to: &to,
            text: message,
        };
        let result = self.post_send(&payload, http::BULK).await?;
        Ok(MultiSendResult::Batched(result))
    }

    async fn check_balance(&self) -> Result<SendResult, GatewayError> {
        let response = self
            .http
            .get(http::endpoint(&self.base_url, "credit"))
            .query(&[("auth_token", self.auth_key.as_str())])
            .send()
            .await;
        http::normalize(PROVIDER, response, http::BALANCE).await
    }
}
