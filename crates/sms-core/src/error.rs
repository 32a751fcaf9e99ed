use std::error::Error as StdError;

/// Boxed cause carried by [`GatewayError::Provider`].
pub type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Errors that abort a gateway call (hard failures).
///
/// A provider that answered but rejected the request is *not* an error; that
/// case is reported as a [`SendResult`](crate::SendResult) with `success: false`.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Gateway section missing, or a required credential is absent/empty.
    #[error("SMS gateway [{gateway}] is not properly configured.")]
    Configuration { gateway: String },
    /// The requested name is not in the gateway registry.
    #[error("SMS gateway [{gateway}] is not supported.")]
    UnsupportedGateway { gateway: String },
    /// Transport-level failure talking to the provider.
    #[error("SMS gateway [{gateway}] error: {source}")]
    Provider {
        gateway: String,
        #[source]
        source: BoxError,
    },
    /// Recipient rejected by the provider's phone validator; nothing was sent.
    #[error("Invalid phone number format: {number}")]
    InvalidPhoneNumber { number: String },
}

/// Discriminant of [`GatewayError`] for callers that only branch on the kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Configuration,
    UnsupportedGateway,
    Provider,
    InvalidPhoneNumber,
}

impl GatewayError {
    pub fn configuration(gateway: impl Into<String>) -> Self {
        Self::Configuration {
            gateway: gateway.into(),
        }
    }

    pub fn unsupported(gateway: impl Into<String>) -> Self {
        Self::UnsupportedGateway {
            gateway: gateway.into(),
        }
    }

    pub fn provider<E>(gateway: impl Into<String>, source: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self::Provider {
            gateway: gateway.into(),
            source: source.into(),
        }
    }

    pub fn invalid_phone_number(number: impl Into<String>) -> Self {
        Self::InvalidPhoneNumber {
            number: number.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::UnsupportedGateway { .. } => ErrorKind::UnsupportedGateway,
            Self::Provider { .. } => ErrorKind::Provider,
            Self::InvalidPhoneNumber { .. } => ErrorKind::InvalidPhoneNumber,
        }
    }

    /// Gateway named by the error, if any.
    pub fn gateway(&self) -> Option<&str> {
        match self {
            Self::Configuration { gateway }
            | Self::UnsupportedGateway { gateway }
            | Self::Provider { gateway, .. } => Some(gateway),
            Self::InvalidPhoneNumber { .. } => None,
        }
    }
}
