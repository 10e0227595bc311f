use async_trait::async_trait;

use crate::{
    domain::{ChatId, MessageRef},
    messaging::types::{ChatAction, MessagingCapabilities},
    Result,
};

/// Outbound side of a messenger.
///
/// Senders must pre-chunk text to `capabilities().max_message_len`; the port
/// gives no delivery-size guarantee of its own.
#[async_trait]
pub trait MessagingPort: Send + Sync {
    fn capabilities(&self) -> MessagingCapabilities;

    /// Send plain text (no parse mode).
    async fn send_text(&self, chat_id: ChatId, text: &str) -> Result<MessageRef>;

    /// Best-effort, fire-and-forget status indicator.
    async fn send_chat_action(&self, chat_id: ChatId, action: ChatAction) -> Result<()>;
}
