//! # SMS Core
//!
//! Core contract and types for the nepali-sms gateway dispatch layer.
//!
//! This crate provides the building blocks every provider crate implements:
//! - [`SmsGateway`] trait for sending, bulk sending and balance checks
//! - [`PhoneValidator`] per-provider number format rules
//! - [`SendResult`] / [`BulkSendResult`] normalized responses
//! - [`GatewayError`] for hard failures
//!
//! ## Soft vs hard failures
//!
//! A provider that answers with a non-2xx status produces `Ok(SendResult {
//! success: false, .. })`. Invalid input, bad configuration or a transport
//! failure produce `Err(GatewayError)` and no result at all.
//!
//! ## Example
//!
//! ```rust,ignore
//! use sms_core::{SendOptions, SmsGateway};
//!
//! let result = gateway.send("9801234567", "Namaste!", &SendOptions::new()).await?;
//! if !result.success {
//!     eprintln!("provider said no: {:?}", result.error);
//! }
//! ```

use async_trait::async_trait;
use tracing::debug;

pub mod config;
pub mod error;
#[cfg(feature = "reqwest")]
pub mod http;
pub mod phone;
pub mod types;

pub use config::GatewayConfig;
pub use error::{BoxError, ErrorKind, GatewayError};
pub use phone::PhoneValidator;
pub use types::{
    BulkSendResult, BulkStrategy, BulkSummary, MultiSendResult, RecipientResult, SendOptions,
    SendResult,
};

/// Contract every SMS provider client satisfies.
#[async_trait]
pub trait SmsGateway: Send + Sync {
    /// Stable registry key, e.g. "sparrow".
    fn name(&self) -> &'static str;

    fn bulk_strategy(&self) -> BulkStrategy;

    fn phone_validator(&self) -> PhoneValidator;

    /// Send one message. Fails with [`GatewayError::InvalidPhoneNumber`]
    /// before any request when `to` does not pass the validator.
    async fn send(
        &self,
        to: &str,
        message: &str,
        options: &SendOptions,
    ) -> Result<SendResult, GatewayError>;

    /// Send one message to many recipients using the gateway's [`BulkStrategy`].
    async fn send_multiple(
        &self,
        recipients: &[String],
        message: &str,
        options: &SendOptions,
    ) -> Result<MultiSendResult, GatewayError>;

    async fn check_balance(&self) -> Result<SendResult, GatewayError>;

    fn validate_phone_number(&self, phone_number: &str) -> bool {
        self.phone_validator().validate(phone_number)
    }

    /// Validator check applied by `send` implementations.
    fn ensure_valid_recipient(&self, to: &str, options: &SendOptions) -> Result<(), GatewayError> {
        if options.skip_phone_validation || self.validate_phone_number(to) {
            Ok(())
        } else {
            Err(GatewayError::invalid_phone_number(to))
        }
    }
}

/// Bulk fallback for gateways without a batch endpoint.
///
/// Sends to each recipient in order, one request at a time. A hard failure for
/// one recipient is recorded as that recipient's `success: false` entry and the
/// loop continues.
pub async fn send_sequentially<G>(
    gateway: &G,
    recipients: &[String],
    message: &str,
    options: &SendOptions,
) -> BulkSendResult
where
    G: SmsGateway + ?Sized,
{
    let mut results = Vec::with_capacity(recipients.len());
    for recipient in recipients {
        let result = match gateway.send(recipient, message, options).await {
            Ok(result) => result,
            Err(err) => {
                debug!(gateway = gateway.name(), %recipient, error = %err, "recipient failed");
                SendResult::failed(err.to_string(), types::SEND_FAILURE)
            }
        };
        results.push(RecipientResult {
            recipient: recipient.clone(),
            result,
        });
    }
    BulkSendResult::from_results(results)
}
