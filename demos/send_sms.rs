//! Send an SMS through the configured (or a named) gateway.
//!
//! ```text
//! APP__SMS__GATEWAYS__SPARROW__TOKEN=... APP__SMS__GATEWAYS__SPARROW__FROM=InfoSMS \
//!     cargo run --example send_sms -- --to 9801234567 --text "Namaste"
//! ```
use nepali_sms::{telemetry, AppConfig, GatewayManager};
use sms_core::{MultiSendResult, SendOptions};

use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    telemetry::init(&config.logging)?;

    let to = arg_or_env("--to", "SMS_TO");
    let text = arg_or_env("--text", "SMS_TEXT");
    let gateway = optional_arg("--gateway");
    let mut options = SendOptions::new();
    if let Some(sender) = optional_arg("--sender") {
        options = options.with_sender(sender);
    }

    let sms = GatewayManager::from_app_config(config);
    let recipients: Vec<String> = to.split(',').map(|s| s.trim().to_string()).collect();

    if recipients.len() == 1 {
        let res = sms.send(&to, &text, &options, gateway.as_deref()).await?;
        println!("{}\n{}", res.message, serde_json::to_string_pretty(&res)?);
    } else {
        match sms
            .send_multiple(&recipients, &text, &options, gateway.as_deref())
            .await?
        {
            MultiSendResult::PerRecipient(bulk) => {
                println!("{}", bulk.message);
                for entry in &bulk.data.results {
                    println!("  {} -> {}", entry.recipient, entry.result.message);
                }
            }
            MultiSendResult::Batched(res) => {
                println!("{}\n{}", res.message, serde_json::to_string_pretty(&res)?)
            }
        }
    }
    Ok(())
}

fn optional_arg(flag: &str) -> Option<String> {
    let args: Vec<String> = env::args().collect();
    let idx = args.iter().position(|a| a == flag)?;
    args.get(idx + 1).cloned()
}

fn arg_or_env(flag: &str, env_key: &str) -> String {
    optional_arg(flag)
        .or_else(|| env::var(env_key).ok())
        .unwrap_or_else(|| panic!("missing {} (arg {} or env {})", flag, flag, env_key))
}
