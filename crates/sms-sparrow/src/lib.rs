//! # Sparrow SMS
//!
//! Sparrow SMS (<https://sparrowsms.com>) backend. Sparrow has no batch
//! endpoint, so bulk sends go out one request per recipient.

use async_trait::async_trait;
use serde::Serialize;
use sms_core::http::{self, Outcome};
use sms_core::{
    BulkStrategy, GatewayConfig, GatewayError, MultiSendResult, PhoneValidator, SendOptions,
    SendResult, SmsGateway,
};
use std::fmt;
use tracing::debug;

pub const PROVIDER: &str = "sparrow";
pub const DEFAULT_BASE_URL: &str = "http://api.sparrowsms.com/v2/sms/";
pub const DEFAULT_CREDIT_URL: &str = "http://api.sparrowsms.com/v2/credit/";

/// Sparrow SMS REST client.
#[derive(Clone)]
pub struct SparrowClient {
    token: String,
    from: String,
    /// Send endpoint; override for testing/mocking.
    base_url: String,
    /// Credit (balance) endpoint.
    credit_url: String,
    http: reqwest::Client,
}

impl SparrowClient {
    /// Build from `token`, `from` and optional `base_url` / `credit_url`.
    pub fn from_config(config: &GatewayConfig) -> Result<Self, GatewayError> {
        Self::with_http_client(config, reqwest::Client::new())
    }

    pub fn with_http_client(
        config: &GatewayConfig,
        http: reqwest::Client,
    ) -> Result<Self, GatewayError> {
        Ok(Self {
            token: config.require(PROVIDER, "token")?,
            from: config.require(PROVIDER, "from")?,
            base_url: config.get_or("base_url", DEFAULT_BASE_URL),
            credit_url: config.get_or("credit_url", DEFAULT_CREDIT_URL),
            http,
        })
    }

    pub fn sender(&self) -> &str {
        &self.from
    }

    async fn get<Q: Serialize + ?Sized>(
        &self,
        url: &str,
        query: &Q,
        outcome: Outcome,
    ) -> Result<SendResult, GatewayError> {
        let response = self.http.get(url).query(query).send().await;
        http::normalize(PROVIDER, response, outcome).await
    }
}

impl fmt::Debug for SparrowClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SparrowClient")
            .field("from", &self.from)
            .field("base_url", &self.base_url)
            .field("credit_url", &self.credit_url)
            .field("token", &"[REDACTED]")
            .finish()
    }
}

#[derive(Debug, Serialize)]
struct SparrowSendQuery<'a> {
    token: &'a str,
    from: &'a str,
    to: &'a str,
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct SparrowCreditQuery<'a> {
    token: &'a str,
}

#[async_trait]
impl SmsGateway for SparrowClient {
    fn name(&self) -> &'static str {
        PROVIDER
    }

    fn bulk_strategy(&self) -> BulkStrategy {
        BulkStrategy::Sequential
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
        let query = SparrowSendQuery {
            token: &self.token,
            from: options.sender_or(&self.from),
            to,
            text: message,
        };
        self.get(&self.base_url, &query, http::SEND).await
    }

    async fn send_multiple(
        &self,
        recipients: &[String],
        message: &str,
        options: &SendOptions,
    ) -> Result<MultiSendResult, GatewayError> {
        let bulk = sms_core::send_sequentially(self, recipients, message, options).await;
        Ok(MultiSendResult::PerRecipient(bulk))
    }

    async fn check_balance(&self) -> Result<SendResult, GatewayError> {
        let query = SparrowCreditQuery { token: &self.token };
        self.get(&self.credit_url, &query, http::BALANCE).await
    }
}
