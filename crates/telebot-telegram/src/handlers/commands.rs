use teloxide::{prelude::*, types::BotCommand};
use tracing::warn;

/// Commands advertised in the Telegram client menu.
pub fn bot_commands() -> Vec<BotCommand> {
    vec![
        BotCommand::new("start", "Show usage"),
        BotCommand::new("help", "Show usage"),
        BotCommand::new("topic", "Turn the next message into a dialogue drill"),
    ]
}

/// Best-effort: a failure here only affects the command menu.
pub async fn register(bot: &Bot) {
    if let Err(e) = bot.set_my_commands(bot_commands()).await {
        warn!(error = %e, "failed to register bot commands");
    }
}
