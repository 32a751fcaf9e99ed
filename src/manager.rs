use crate::config::{AppConfig, ConfigSource};
use crate::registry::GatewayRegistry;
use serde::Serialize;
use sms_core::{GatewayError, MultiSendResult, SendOptions, SendResult, SmsGateway};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, error, info};

/// Resolves gateway names to configured clients and dispatches calls to them.
///
/// Clients are built lazily on first use and cached by name for the life of
/// the manager. The cache only grows; a failed construction caches nothing, so
/// a later call retries it.
pub struct GatewayManager {
    source: Arc<dyn ConfigSource>,
    registry: GatewayRegistry,
    http: reqwest::Client,
    gateways: RwLock<HashMap<String, Arc<dyn SmsGateway>>>,
}

impl GatewayManager {
    pub fn new(source: impl ConfigSource + 'static) -> Self {
        Self::from_shared(Arc::new(source))
    }

    /// Manager over a source the host keeps a handle to (e.g. to change the
    /// default gateway at runtime).
    pub fn from_shared(source: Arc<dyn ConfigSource>) -> Self {
        Self {
            source,
            registry: GatewayRegistry::builtin(),
            http: reqwest::Client::new(),
            gateways: RwLock::new(HashMap::new()),
        }
    }

    pub fn from_app_config(config: AppConfig) -> Self {
        Self::new(config.sms)
    }

    pub fn with_registry(mut self, registry: GatewayRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// HTTP client handed to every gateway this manager constructs.
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = http;
        self
    }

    /// Gateway for `name`, or for the configured default when `name` is
    /// `None` or empty.
    pub fn gateway(&self, name: Option<&str>) -> Result<Arc<dyn SmsGateway>, GatewayError> {
        let name = match name.filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None => self.default_name()?,
        };

        if let Some(gateway) = self.cached(&name) {
            return Ok(gateway);
        }

        let mut gateways = self.gateways.write().unwrap_or_else(PoisonError::into_inner);
        // Another caller may have inserted between the read and write locks.
        if let Some(gateway) = gateways.get(&name) {
            return Ok(Arc::clone(gateway));
        }
        let gateway = self.resolve(&name)?;
        gateways.insert(name, Arc::clone(&gateway));
        Ok(gateway)
    }

    /// Typed stand-in for forwarding arbitrary calls to the default gateway.
    pub fn default_gateway(&self) -> Result<Arc<dyn SmsGateway>, GatewayError> {
        self.gateway(None)
    }

    /// Names of the gateways constructed so far, sorted.
    pub fn resolved_gateways(&self) -> Vec<String> {
        let gateways = self.gateways.read().unwrap_or_else(PoisonError::into_inner);
        let mut names: Vec<String> = gateways.keys().cloned().collect();
        names.sort_unstable();
        names
    }

    pub async fn send(
        &self,
        to: &str,
        message: &str,
        options: &SendOptions,
        gateway: Option<&str>,
    ) -> Result<SendResult, GatewayError> {
        let gateway = self.gateway(gateway)?;
        let options = self.effective_options(options);
        let result = gateway.send(to, message, &options).await?;

        if self.source.log_enabled() {
            let rendered = render(&result);
            if result.success {
                info!(gateway = gateway.name(), to, text = message, result = %rendered, "SMS sent");
            } else {
                error!(gateway = gateway.name(), to, text = message, result = %rendered, "SMS sent");
            }
        }
        Ok(result)
    }

    pub async fn send_multiple(
        &self,
        recipients: &[String],
        message: &str,
        options: &SendOptions,
        gateway: Option<&str>,
    ) -> Result<MultiSendResult, GatewayError> {
        let gateway = self.gateway(gateway)?;
        let options = self.effective_options(options);
        let result = gateway.send_multiple(recipients, message, &options).await?;

        if self.source.log_enabled() {
            let recipients = recipients.join(",");
            let rendered = render(&result);
            if result.success() {
                info!(gateway = gateway.name(), %recipients, text = message, result = %rendered, "Bulk SMS sent");
            } else {
                error!(gateway = gateway.name(), %recipients, text = message, result = %rendered, "Bulk SMS sent");
            }
        }
        Ok(result)
    }

    pub async fn check_balance(&self, gateway: Option<&str>) -> Result<SendResult, GatewayError> {
        self.gateway(gateway)?.check_balance().await
    }

    /// Format check against the resolved gateway's rule. Errors only when the
    /// gateway itself cannot be resolved.
    pub fn validate_phone_number(
        &self,
        phone_number: &str,
        gateway: Option<&str>,
    ) -> Result<bool, GatewayError> {
        Ok(self.gateway(gateway)?.validate_phone_number(phone_number))
    }

    fn default_name(&self) -> Result<String, GatewayError> {
        self.source
            .default_gateway()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| GatewayError::configuration("default"))
    }

    fn cached(&self, name: &str) -> Option<Arc<dyn SmsGateway>> {
        let gateways = self.gateways.read().unwrap_or_else(PoisonError::into_inner);
        gateways.get(name).cloned()
    }

    fn resolve(&self, name: &str) -> Result<Arc<dyn SmsGateway>, GatewayError> {
        let factory = self
            .registry
            .get(name)
            .ok_or_else(|| GatewayError::unsupported(name))?;
        let config = self
            .source
            .gateway_config(name)
            .ok_or_else(|| GatewayError::configuration(name))?;

        debug!(gateway = name, "constructing sms gateway");
        factory(&config, self.http.clone())
    }

    fn effective_options<'a>(&self, options: &'a SendOptions) -> Cow<'a, SendOptions> {
        if self.source.validate_phone_number() || options.skip_phone_validation {
            Cow::Borrowed(options)
        } else {
            Cow::Owned(options.clone().skip_phone_validation(true))
        }
    }
}

impl fmt::Debug for GatewayManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayManager")
            .field("registry", &self.registry)
            .field("resolved", &self.resolved_gateways())
            .finish()
    }
}

// Logging must not fail a send; fall back to Debug if serialization does.
fn render<R: Serialize + fmt::Debug>(result: &R) -> String {
    serde_json::to_string(result).unwrap_or_else(|_| format!("{result:?}"))
}
