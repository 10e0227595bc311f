use crate::domain::ChatId;

/// Cross-messenger incoming update model.
///
/// Telegram-specific fields live in the Telegram adapter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IncomingUpdate {
    Command(Command),
    Text(TextMessage),
}

impl IncomingUpdate {
    /// Classify raw message text.
    ///
    /// Only a leading `/name` token with a valid command name is a command;
    /// anything else, including a bare `/ ...`, is ordinary text.
    pub fn from_text(chat_id: ChatId, text: &str) -> Self {
        match command_name(text) {
            Some(name) => IncomingUpdate::Command(Command { chat_id, name }),
            None => IncomingUpdate::Text(TextMessage {
                chat_id,
                text: text.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Command {
    pub chat_id: ChatId,
    /// Lowercased, without the leading `/` or any `@botname` suffix.
    pub name: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextMessage {
    pub chat_id: ChatId,
    pub text: String,
}

/// Extract `cmd` from `/cmd@botname arg1 ...`.
///
/// Returns `None` unless the first token is `/` followed by one or more
/// ASCII letters, digits or underscores (Telegram's command alphabet).
pub fn command_name(text: &str) -> Option<String> {
    let first = text.strip_prefix('/')?.split(char::is_whitespace).next()?;
    let name = first.split('@').next().unwrap_or("");

    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_') {
        return None;
    }
    Some(name.to_ascii_lowercase())
}

/// Outgoing "chat action" (typing indicator).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChatAction {
    Typing,
}

/// Capabilities / feature flags of a messenger implementation.
#[derive(Clone, Copy, Debug)]
pub struct MessagingCapabilities {
    pub supports_chat_actions: bool,
    pub max_message_len: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_command_name_without_bot_suffix_or_args() {
        assert_eq!(
            command_name("/Topic@telebot_bot  extra words "),
            Some("topic".to_string())
        );
        assert_eq!(command_name("/start"), Some("start".to_string()));
    }

    #[test]
    fn slash_without_a_valid_name_is_not_a_command() {
        assert_eq!(command_name("/ 今天去了公园"), None);
        assert_eq!(command_name("/"), None);
        assert_eq!(command_name("/今天"), None);
        assert_eq!(command_name("/@telebot_bot"), None);
        assert_eq!(command_name("half / half"), None);
        assert_eq!(command_name(" /start"), None);
    }

    #[test]
    fn classifies_commands_and_text() {
        let chat = ChatId(3);
        assert!(matches!(
            IncomingUpdate::from_text(chat, "/help"),
            IncomingUpdate::Command(Command { ref name, .. }) if name == "help"
        ));
        assert_eq!(
            IncomingUpdate::from_text(chat, "/ 今天 had noodles"),
            IncomingUpdate::Text(TextMessage {
                chat_id: chat,
                text: "/ 今天 had noodles".to_string()
            })
        );
        assert_eq!(
            IncomingUpdate::from_text(chat, "Had noodles / soup"),
            IncomingUpdate::Text(TextMessage {
                chat_id: chat,
                text: "Had noodles / soup".to_string()
            })
        );
    }
}
