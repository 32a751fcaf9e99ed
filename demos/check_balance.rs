//! Print the account balance for every configured gateway.
use nepali_sms::{AppConfig, GatewayManager};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let names: Vec<String> = config.sms.gateways.keys().cloned().collect();
    let sms = GatewayManager::from_app_config(config);

    for name in names {
        match sms.check_balance(Some(&name)).await {
            Ok(res) if res.success => println!("{name}: {}", res.data.unwrap_or_default()),
            Ok(res) => println!("{name}: {} ({})", res.message, res.error.unwrap_or_default()),
            Err(e) => println!("{name}: {e}"),
        }
    }
    Ok(())
}
