use sms_akash::AkashClient;
use sms_core::{GatewayConfig, GatewayError, SmsGateway};
use sms_fast::FastClient;
use sms_sparrow::SparrowClient;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Builds a gateway from its configuration section and the shared HTTP client.
pub type GatewayFactory =
    fn(&GatewayConfig, reqwest::Client) -> Result<Arc<dyn SmsGateway>, GatewayError>;

/// Name → constructor table consulted by the manager.
///
/// Adding a provider is one `.with(..)` entry; the manager's resolution flow
/// does not change.
#[derive(Clone)]
pub struct GatewayRegistry {
    factories: HashMap<&'static str, GatewayFactory>,
}

impl GatewayRegistry {
    /// Empty registry; every name is unsupported.
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// `sparrow`, `akash` and `fast`.
    pub fn builtin() -> Self {
        Self::new()
            .with(sms_sparrow::PROVIDER, sparrow)
            .with(sms_akash::PROVIDER, akash)
            .with(sms_fast::PROVIDER, fast)
    }

    pub fn with(mut self, name: &'static str, factory: GatewayFactory) -> Self {
        self.factories.insert(name, factory);
        self
    }

    pub fn get(&self, name: &str) -> Option<GatewayFactory> {
        self.factories.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.factories.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for GatewayRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for GatewayRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayRegistry")
            .field("gateways", &self.names())
            .finish()
    }
}

fn sparrow(
    config: &GatewayConfig,
    http: reqwest::Client,
) -> Result<Arc<dyn SmsGateway>, GatewayError> {
    Ok(Arc::new(SparrowClient::with_http_client(config, http)?))
}

fn akash(
    config: &GatewayConfig,
    http: reqwest::Client,
) -> Result<Arc<dyn SmsGateway>, GatewayError> {
    Ok(Arc::new(AkashClient::with_http_client(config, http)?))
}

fn fast(config: &GatewayConfig, http: reqwest::Client) -> Result<Arc<dyn SmsGateway>, GatewayError> {
    Ok(Arc::new(FastClient::with_http_client(config, http)?))
}
