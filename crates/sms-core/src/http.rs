//! Response normalization shared by the reqwest-backed gateways.

use crate::{GatewayError, SendResult};
use tracing::{debug, warn};

/// Success/failure summaries attached to a normalized result.
#[derive(Debug, Clone, Copy)]
pub struct Outcome {
    pub success: &'static str,
    pub failure: &'static str,
}

pub const SEND: Outcome = Outcome {
    success: crate::types::SEND_SUCCESS,
    failure: crate::types::SEND_FAILURE,
};

pub const BULK: Outcome = Outcome {
    success: crate::types::BULK_SUCCESS,
    failure: crate::types::BULK_FAILURE,
};

pub const BALANCE: Outcome = Outcome {
    success: crate::types::BALANCE_SUCCESS,
    failure: crate::types::BALANCE_FAILURE,
};

/// Turn a provider exchange into a [`SendResult`].
///
/// * transport error, unreadable body, or a 2xx body that is not JSON: hard
///   [`GatewayError::Provider`]
/// * 2xx: `success: true`, parsed JSON in `data` (`None` for an empty body)
/// * anything else: `success: false` with the raw body in `error`
pub async fn normalize(
    gateway: &'static str,
    response: Result<reqwest::Response, reqwest::Error>,
    outcome: Outcome,
) -> Result<SendResult, GatewayError> {
    let response = response.map_err(|e| GatewayError::provider(gateway, e))?;
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| GatewayError::provider(gateway, e))?;

    if !status.is_success() {
        warn!(gateway, %status, "provider rejected request");
        return Ok(SendResult::failed(body, outcome.failure));
    }

    debug!(gateway, %status, "provider accepted request");
    let data = if body.trim().is_empty() {
        None
    } else {
        Some(
            serde_json::from_str::<serde_json::Value>(&body)
                .map_err(|e| GatewayError::provider(gateway, e))?,
        )
    };
    Ok(SendResult::ok(data, outcome.success))
}

/// Join a provider base URL and an endpoint path with exactly one `/`.
pub fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
