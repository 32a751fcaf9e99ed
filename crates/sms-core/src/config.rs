use crate::GatewayError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Key/value settings for one gateway (`sms.gateways.<name>.*`).
///
/// Immutable once built; clients copy the fields they need at construction.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GatewayConfig {
    values: BTreeMap<String, String>,
}

impl GatewayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Value for `key`, or `default` when the key is absent or blank.
    pub fn get_or(&self, key: &str, default: &str) -> String {
        match self.get(key) {
            Some(value) if !value.trim().is_empty() => value.to_string(),
            _ => default.to_string(),
        }
    }

    /// Required credential; a missing or blank value is a configuration error
    /// naming `gateway`.
    pub fn require(&self, gateway: &str, key: &str) -> Result<String, GatewayError> {
        match self.get(key) {
            Some(value) if !value.trim().is_empty() => Ok(value.to_string()),
            _ => Err(GatewayError::configuration(gateway)),
        }
    }
}

impl<K, V> FromIterator<(K, V)> for GatewayConfig
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

// Values are credentials; only the key names are printed.
impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("keys", &self.values.keys().collect::<Vec<_>>())
            .finish()
    }
}
