use std::{collections::HashMap, net::SocketAddr, sync::Arc};

use anyhow::Context;
use teloxide::{
    dispatching::Dispatcher,
    dptree,
    error_handlers::LoggingErrorHandler,
    prelude::*,
    update_listeners::{webhooks, Polling},
};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{info, warn};

use telebot_core::{
    config::{Config, Deployment, WEBHOOK_PATH},
    messaging::port::MessagingPort,
    relay::Relay,
};

use crate::handlers;
use crate::TelegramMessenger;

#[derive(Clone)]
pub struct AppState {
    pub relay: Arc<Relay>,
    pub messenger: Arc<dyn MessagingPort>,
    pub chat_locks: Arc<ChatLocks>,
}

/// One async mutex per chat, created on first use.
#[derive(Default)]
pub struct ChatLocks {
    inner: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl ChatLocks {
    pub async fn lock_chat(&self, chat_id: i64) -> OwnedMutexGuard<()> {
        let lock = {
            let mut map = self.inner.lock().await;
            map.entry(chat_id)
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

/// Connect to Telegram and process updates until shutdown (Ctrl-C).
pub async fn run(cfg: Arc<Config>, relay: Arc<Relay>) -> anyhow::Result<()> {
    let bot = Bot::new(cfg.telegram_bot_token.clone());

    let me = bot.get_me().await.context("telegram getMe failed")?;
    info!(username = %me.username(), "telegram bot connected");
    handlers::commands::register(&bot).await;

    let messenger: Arc<dyn MessagingPort> = Arc::new(TelegramMessenger::new(bot.clone()));
    let state = Arc::new(AppState {
        relay,
        messenger,
        chat_locks: Arc::new(ChatLocks::default()),
    });

    let handler = dptree::entry().branch(Update::filter_message().endpoint(handlers::handle_message));
    let mut dispatcher = Dispatcher::builder(bot.clone(), handler)
        .dependencies(dptree::deps![state])
        .enable_ctrlc_handler()
        .build();

    match &cfg.deployment {
        Deployment::Webhook { port, url } => {
            let opts = webhook_options(*port, url)?;
            info!(port = *port, url = %url, "starting bot in webhook mode");
            let listener = webhooks::axum(bot, opts)
                .await
                .context("failed to set up telegram webhook")?;
            dispatcher
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the webhook listener"),
                )
                .await;
        }
        Deployment::Polling => {
            info!("starting bot in polling mode");
            let listener = Polling::builder(bot).drop_pending_updates().build();
            dispatcher
                .dispatch_with_listener(
                    listener,
                    LoggingErrorHandler::with_custom_text("An error from the polling listener"),
                )
                .await;
        }
    }

    warn!("dispatcher stopped");
    Ok(())
}

/// Webhook listener on all interfaces, serving `WEBHOOK_PATH` regardless of the public URL's path.
fn webhook_options(port: u16, url: &str) -> anyhow::Result<webhooks::Options> {
    let address = SocketAddr::from(([0, 0, 0, 0], port));
    let url = reqwest::Url::parse(url).with_context(|| format!("invalid webhook url: {url}"))?;
    Ok(webhooks::Options::new(address, url)
        .path(WEBHOOK_PATH.to_string())
        .drop_pending_updates())
}
