//! Telegram update handlers.
//!
//! Each handler is a small adapter that turns a teloxide `Message` into a core
//! `IncomingUpdate` and hands it to the relay. Errors are logged, never
//! propagated to the dispatcher.

use std::sync::Arc;

use teloxide::{
    prelude::*,
    types::{Message, MessageEntity, MessageEntityKind},
};
use tracing::{debug, warn};

use telebot_core::{
    domain::ChatId,
    messaging::types::{IncomingUpdate, TextMessage},
};

use crate::router::AppState;

pub mod commands;

pub async fn handle_message(msg: Message, state: Arc<AppState>) -> ResponseResult<()> {
    // Stickers, photos, voice and the rest are ignored.
    let Some(raw) = msg.text() else {
        return Ok(());
    };
    let chat_id = ChatId(msg.chat.id.0);
    let update = classify(chat_id, raw, msg.entities());

    // Sequentialize text messages per chat so a pending mode is consumed in order.
    let _guard = match &update {
        IncomingUpdate::Text(_) => Some(state.chat_locks.lock_chat(chat_id.0).await),
        IncomingUpdate::Command(_) => None,
    };

    match state
        .relay
        .handle_update(update, state.messenger.clone())
        .await
    {
        Ok(outcome) => debug!(chat_id = %chat_id, ?outcome, "update handled"),
        Err(e) => warn!(chat_id = %chat_id, error = %e, "reply delivery failed"),
    }
    Ok(())
}

/// Telegram marks real commands with a `bot_command` entity at offset 0;
/// everything else is treated as text, even when it starts with `/`.
fn classify(chat_id: ChatId, text: &str, entities: Option<&[MessageEntity]>) -> IncomingUpdate {
    if starts_with_bot_command(entities) {
        return IncomingUpdate::from_text(chat_id, text);
    }
    IncomingUpdate::Text(TextMessage {
        chat_id,
        text: text.to_string(),
    })
}

fn starts_with_bot_command(entities: Option<&[MessageEntity]>) -> bool {
    entities
        .unwrap_or_default()
        .iter()
        .any(|e| e.offset == 0 && matches!(e.kind, MessageEntityKind::BotCommand))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity(kind: MessageEntityKind, offset: usize, length: usize) -> MessageEntity {
        MessageEntity {
            kind,
            offset,
            length,
        }
    }

    #[test]
    fn command_entity_at_start_makes_a_command() {
        let entities = [entity(MessageEntityKind::BotCommand, 0, 6)];
        assert!(matches!(
            classify(ChatId(1), "/topic", Some(&entities)),
            IncomingUpdate::Command(ref c) if c.name == "topic"
        ));
    }

    #[test]
    fn slash_text_without_command_entity_is_text() {
        for (text, entities) in [
            ("/ 今天去了公园", vec![]),
            ("/topic", vec![]),
            ("see /topic", vec![entity(MessageEntityKind::BotCommand, 4, 6)]),
        ] {
            let entities = (!entities.is_empty()).then_some(entities.as_slice());
            assert!(
                matches!(classify(ChatId(1), text, entities), IncomingUpdate::Text(_)),
                "{text:?}"
            );
        }
    }
}
