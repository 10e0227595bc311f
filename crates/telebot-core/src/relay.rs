use std::sync::Arc;

use tracing::{debug, error, info};

use crate::{
    chunking::split_message,
    config::Config,
    domain::ChatId,
    messaging::{
        port::MessagingPort,
        types::{Command, IncomingUpdate},
        typing::TypingIndicator,
    },
    mode::{Mode, ModeStore},
    model::{
        client::CompletionClient,
        pool::CompletionPool,
        types::{CompletionErrorKind, CompletionRequest},
    },
    prompt, Result,
};

/// Reply to `/start` and `/help`.
pub const USAGE_TEXT: &str = "Send your daily log entries and I will convert them into natural spoken English.\n\n\
Send /topic first to turn your next message into a Topic / Context / Practice Dialogue drill.";

/// Reply to `/topic`.
pub const TOPIC_ACK_TEXT: &str =
    "请发送你的日志内容，我将生成主题对话练习。\n(Topic / Context / Practice Dialogue)";

/// Sent when the completion call fails, whatever the cause.
pub const FAILURE_NOTICE: &str = "Translation failed. Please try again.";

/// Sent when the completion succeeds with no usable text.
pub const NO_RESPONSE_NOTICE: &str = "No response from LLM.";

/// Terminal state of one inbound update.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RelayOutcome {
    /// Empty text or an unknown command; nothing was sent.
    Ignored,
    /// A command was acknowledged with a fixed reply.
    Replied,
    /// The completion was delivered in `chunks` sends.
    Delivered { chunks: usize },
    /// The completion was empty; the no-response notice was sent.
    NoContent,
    /// The completion failed; the failure notice was sent.
    Failed(CompletionErrorKind),
}

/// Per-message orchestration: mode → prompt → completion → chunked delivery.
///
/// One `Relay` serves every conversation. The only cross-message state is the
/// pending mode per chat.
pub struct Relay {
    cfg: Arc<Config>,
    completions: CompletionPool,
    modes: ModeStore,
}

impl Relay {
    pub fn new(cfg: Arc<Config>, client: Arc<dyn CompletionClient>) -> Self {
        let completions = CompletionPool::new(client, cfg.completion_workers);
        Self {
            cfg,
            completions,
            modes: ModeStore::new(),
        }
    }

    pub async fn select_mode(&self, chat_id: ChatId, mode: Mode) {
        self.modes.set(chat_id, mode).await;
    }

    pub async fn pending_mode(&self, chat_id: ChatId) -> Mode {
        self.modes.peek(chat_id).await
    }

    pub async fn handle_update(
        &self,
        update: IncomingUpdate,
        messenger: Arc<dyn MessagingPort>,
    ) -> Result<RelayOutcome> {
        match update {
            IncomingUpdate::Command(cmd) => self.handle_command(&cmd, messenger.as_ref()).await,
            IncomingUpdate::Text(msg) => self.handle_text(msg.chat_id, &msg.text, messenger).await,
        }
    }

    pub async fn handle_command(
        &self,
        cmd: &Command,
        messenger: &dyn MessagingPort,
    ) -> Result<RelayOutcome> {
        match cmd.name.as_str() {
            "start" | "help" => {
                messenger.send_text(cmd.chat_id, USAGE_TEXT).await?;
                Ok(RelayOutcome::Replied)
            }
            "topic" => {
                self.select_mode(cmd.chat_id, Mode::TopicPractice).await;
                info!(chat_id = %cmd.chat_id, "topic mode selected for next message");
                messenger.send_text(cmd.chat_id, TOPIC_ACK_TEXT).await?;
                Ok(RelayOutcome::Replied)
            }
            other => {
                debug!(chat_id = %cmd.chat_id, command = other, "ignoring unknown command");
                Ok(RelayOutcome::Ignored)
            }
        }
    }

    /// Run one inbound text message through the full cycle.
    ///
    /// Provider failures are reported to the user and returned as
    /// `RelayOutcome::Failed`; only transport errors surface as `Err`.
    pub async fn handle_text(
        &self,
        chat_id: ChatId,
        text: &str,
        messenger: Arc<dyn MessagingPort>,
    ) -> Result<RelayOutcome> {
        let user_text = text.trim();
        if user_text.is_empty() {
            return Ok(RelayOutcome::Ignored);
        }

        let mode = self.modes.take(chat_id).await;
        let req = CompletionRequest {
            prompt: prompt::build(mode, user_text),
            model: self.cfg.openai_model.clone(),
            temperature: self.cfg.openai_temperature,
            max_output_tokens: self.cfg.openai_max_tokens,
        };
        debug!(
            chat_id = %chat_id,
            mode = %mode,
            input_chars = user_text.chars().count(),
            "prompt built"
        );

        let typing =
            TypingIndicator::start(messenger.clone(), chat_id, self.cfg.typing_interval).await;
        let result = self.completions.submit(req).await;
        typing.stop().await;

        let completion = match result {
            Ok(text) => text,
            Err(err) => {
                error!(
                    chat_id = %chat_id,
                    provider = self.completions.provider(),
                    kind = %err.kind,
                    error = %err.detail,
                    "LLM request failed"
                );
                messenger.send_text(chat_id, FAILURE_NOTICE).await?;
                return Ok(RelayOutcome::Failed(err.kind));
            }
        };

        let limit = self
            .cfg
            .message_chunk_limit
            .min(messenger.capabilities().max_message_len);
        let chunks = split_message(completion.trim(), limit);
        if chunks.is_empty() {
            info!(chat_id = %chat_id, mode = %mode, "completion returned no content");
            messenger.send_text(chat_id, NO_RESPONSE_NOTICE).await?;
            return Ok(RelayOutcome::NoContent);
        }

        // Strictly sequential: chunk k+1 is not sent until chunk k is accepted.
        for chunk in &chunks {
            messenger.send_text(chat_id, chunk).await?;
        }

        info!(chat_id = %chat_id, mode = %mode, chunks = chunks.len(), "reply delivered");
        Ok(RelayOutcome::Delivered {
            chunks: chunks.len(),
        })
    }
}
