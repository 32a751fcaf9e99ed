use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use sms_core::GatewayConfig;
use std::collections::BTreeMap;
use std::env;

/// Application configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Gateway selection and credentials (`sms.*`)
    pub sms: SmsConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

/// SMS configuration, mirrors the `sms.*` key space.
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct SmsConfig {
    /// Gateway used when a call names none (default: sparrow)
    pub default: String,
    /// Per-gateway settings keyed by gateway name
    pub gateways: BTreeMap<String, GatewayConfig>,
    /// Emit a log record for every send (default: false)
    pub log_enabled: bool,
    /// Check recipients against the gateway's number format (default: true)
    pub validate_phone_number: bool,
}

/// Logging configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (default: info)
    pub level: String,
    /// Log format: json or pretty (default: json)
    pub format: String,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            default: "sparrow".to_string(),
            gateways: BTreeMap::new(),
            log_enabled: false,
            validate_phone_number: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "json".to_string(),
        }
    }
}

impl SmsConfig {
    pub fn with_default(mut self, name: impl Into<String>) -> Self {
        self.default = name.into();
        self
    }

    pub fn with_gateway(mut self, name: impl Into<String>, config: GatewayConfig) -> Self {
        self.gateways.insert(name.into(), config);
        self
    }

    pub fn with_logging(mut self, enabled: bool) -> Self {
        self.log_enabled = enabled;
        self
    }

    pub fn with_phone_validation(mut self, enabled: bool) -> Self {
        self.validate_phone_number = enabled;
        self
    }
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        Self::builder()?
            // Add configuration file based on environment
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add local configuration file (gitignored)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables, e.g. APP__SMS__GATEWAYS__SPARROW__TOKEN
            .add_source(Environment::with_prefix("APP").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Load configuration from an in-memory TOML document layered over the defaults.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Self::builder()?
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        // Start with default configuration
        Ok(Config::builder().add_source(Config::try_from(&AppConfig::default())?))
    }
}

/// Live configuration read by [`GatewayManager`](crate::GatewayManager).
///
/// Every method is called per operation, so implementations backed by a
/// mutable store see changes (e.g. a new default gateway) without rebuilding
/// the manager. Already-constructed gateways are never rebuilt.
pub trait ConfigSource: Send + Sync {
    /// `sms.default`
    fn default_gateway(&self) -> Option<String>;
    /// `sms.gateways.<name>`
    fn gateway_config(&self, name: &str) -> Option<GatewayConfig>;
    /// `sms.log_enabled`
    fn log_enabled(&self) -> bool;
    /// `sms.validate_phone_number`
    fn validate_phone_number(&self) -> bool;
}

impl ConfigSource for SmsConfig {
    fn default_gateway(&self) -> Option<String> {
        Some(self.default.clone())
    }

    fn gateway_config(&self, name: &str) -> Option<GatewayConfig> {
        self.gateways.get(name).cloned()
    }

    fn log_enabled(&self) -> bool {
        self.log_enabled
    }

    fn validate_phone_number(&self) -> bool {
        self.validate_phone_number
    }
}

impl ConfigSource for Config {
    fn default_gateway(&self) -> Option<String> {
        self.get_string("sms.default").ok()
    }

    fn gateway_config(&self, name: &str) -> Option<GatewayConfig> {
        self.get::<GatewayConfig>(&format!("sms.gateways.{name}")).ok()
    }

    fn log_enabled(&self) -> bool {
        self.get_bool("sms.log_enabled").unwrap_or(false)
    }

    fn validate_phone_number(&self) -> bool {
        self.get_bool("sms.validate_phone_number").unwrap_or(true)
    }
}
