use std::sync::Arc;

use telebot_core::{config::Config, relay::Relay};
use telebot_openai::OpenAiClient;

#[tokio::main]
async fn main() -> Result<(), telebot_core::Error> {
    telebot_core::logging::init("telebot")?;

    let cfg = match Config::load() {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            tracing::error!(error = %e, "configuration error");
            return Err(e);
        }
    };
    cfg.log_summary();

    let client = OpenAiClient::from_config(&cfg)?;
    let relay = Arc::new(Relay::new(cfg.clone(), Arc::new(client)));

    telebot_telegram::router::run(cfg, relay)
        .await
        .map_err(|e| telebot_core::Error::External(format!("telegram bot failed: {e}")))?;

    Ok(())
}
