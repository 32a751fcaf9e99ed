//! # Nepali SMS
//!
//! A uniform dispatch layer over Nepali SMS gateways.
//!
//! ## Features
//!
//! - **Multi-provider support**: Sparrow SMS, Akash SMS and Fast SMS behind one contract
//! - **Per-call override**: send through the default gateway or name one per call
//! - **Lazy, cached clients**: each gateway is built on first use and reused
//! - **Uniform results**: soft provider rejections come back as data, hard failures as errors
//! - **Comprehensive configuration**: file and environment based via the `config` crate
//! - **Observability**: optional structured send logs through `tracing`
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use nepali_sms::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = AppConfig::load()?;
//!     let sms = GatewayManager::from_app_config(config);
//!
//!     let result = sms
//!         .send("9801234567", "Namaste!", &SendOptions::new(), None)
//!         .await?;
//!     println!("{}", result.message);
//!
//!     // Same message through a specific gateway
//!     sms.send("9801234567", "Namaste!", &SendOptions::new(), Some("akash"))
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Bulk sends
//!
//! Akash and Fast accept a batch in one request and return a single
//! [`SendResult`](sms_core::SendResult). Sparrow has no batch endpoint, so
//! the batch is sent one recipient at a time and reported per recipient in a
//! [`BulkSendResult`](sms_core::BulkSendResult). Check
//! [`MultiSendResult`](sms_core::MultiSendResult) to see which one you got.
//!
//! ## Configuration
//!
//! ```toml
//! [sms]
//! default = "sparrow"
//! log_enabled = true
//!
//! [sms.gateways.sparrow]
//! token = "..."
//! from = "InfoSMS"
//! ```

pub mod config;
pub mod manager;
pub mod registry;
pub mod telemetry;

pub use crate::config::{AppConfig, ConfigSource, LoggingConfig, SmsConfig};
pub use crate::manager::GatewayManager;
pub use crate::registry::{GatewayFactory, GatewayRegistry};

/// Common imports for Nepali SMS usage
pub mod prelude {
    pub use crate::config::{AppConfig, ConfigSource, LoggingConfig, SmsConfig};
    pub use crate::manager::GatewayManager;
    pub use crate::registry::{GatewayFactory, GatewayRegistry};
    pub use sms_core::*;
}
