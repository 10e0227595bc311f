use std::{collections::HashMap, fmt};

use tokio::sync::Mutex;

use crate::domain::ChatId;

/// Selects the prompt template for the next inbound message of a conversation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Free-form conversational rewrite.
    #[default]
    Default,
    /// Structured Topic / Context / Practice Dialogue output.
    TopicPractice,
}

impl Mode {
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Default => "default",
            Mode::TopicPractice => "topic",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pending single-use mode per conversation, held in memory only.
///
/// `take` is a single locked remove: a pending mode is observed by at most one
/// message and is cleared by that same read.
#[derive(Default)]
pub struct ModeStore {
    pending: Mutex<HashMap<ChatId, Mode>>,
}

impl ModeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the mode for the next message. Selecting `Default` clears any pending mode.
    pub async fn set(&self, chat_id: ChatId, mode: Mode) {
        let mut pending = self.pending.lock().await;
        match mode {
            Mode::Default => {
                pending.remove(&chat_id);
            }
            other => {
                pending.insert(chat_id, other);
            }
        }
    }

    /// Read and clear the pending mode (absent → `Default`).
    pub async fn take(&self, chat_id: ChatId) -> Mode {
        self.pending
            .lock()
            .await
            .remove(&chat_id)
            .unwrap_or_default()
    }

    /// Non-consuming read.
    pub async fn peek(&self, chat_id: ChatId) -> Mode {
        self.pending
            .lock()
            .await
            .get(&chat_id)
            .copied()
            .unwrap_or_default()
    }
}
