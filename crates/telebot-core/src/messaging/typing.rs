use std::{sync::Arc, time::Duration};

use tokio::{
    task::JoinHandle,
    time::{Instant, MissedTickBehavior},
};
use tracing::debug;

use crate::{
    domain::ChatId,
    messaging::{port::MessagingPort, types::ChatAction},
};

/// Upper bound on how long the first indicator may hold up the caller.
const FIRST_SEND_TIMEOUT: Duration = Duration::from_millis(250);

/// Keeps a "typing" indicator alive while a long call is outstanding.
///
/// The first indicator is attempted before `start` returns (bounded by a short
/// timeout); refreshes run on a background task that `stop` aborts, even if a
/// send is in flight. All sends are best-effort.
pub struct TypingIndicator {
    task: Option<JoinHandle<()>>,
}

impl TypingIndicator {
    pub async fn start(
        messenger: Arc<dyn MessagingPort>,
        chat_id: ChatId,
        refresh: Duration,
    ) -> Self {
        if !messenger.capabilities().supports_chat_actions {
            return Self { task: None };
        }

        if tokio::time::timeout(FIRST_SEND_TIMEOUT, send_typing(messenger.as_ref(), chat_id))
            .await
            .is_err()
        {
            debug!(chat_id = %chat_id, "typing indicator timed out");
        }

        let task = tokio::spawn(async move {
            let mut tick = tokio::time::interval_at(Instant::now() + refresh, refresh);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tick.tick().await;
                send_typing(messenger.as_ref(), chat_id).await;
            }
        });

        Self { task: Some(task) }
    }

    /// Stop refreshing. No indicator is sent after this returns.
    pub async fn stop(mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            let _ = task.await;
        }
    }
}

impl Drop for TypingIndicator {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn send_typing(messenger: &dyn MessagingPort, chat_id: ChatId) {
    if let Err(e) = messenger.send_chat_action(chat_id, ChatAction::Typing).await {
        debug!(chat_id = %chat_id, error = %e, "typing indicator failed");
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::{
        domain::{MessageId, MessageRef},
        messaging::types::MessagingCapabilities,
        Result,
    };

    /// Chat actions from call number `hang_from` onwards never complete.
    struct StuckActions {
        calls: AtomicUsize,
        hang_from: usize,
    }

    #[async_trait]
    impl MessagingPort for StuckActions {
        fn capabilities(&self) -> MessagingCapabilities {
            MessagingCapabilities {
                supports_chat_actions: true,
                max_message_len: 4096,
            }
        }

        async fn send_text(&self, chat_id: ChatId, _text: &str) -> Result<MessageRef> {
            Ok(MessageRef {
                chat_id,
                message_id: MessageId(1),
            })
        }

        async fn send_chat_action(&self, _chat_id: ChatId, _action: ChatAction) -> Result<()> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if n >= self.hang_from {
                std::future::pending::<()>().await;
            }
            Ok(())
        }
    }

    #[tokio::test]
    async fn stop_does_not_wait_for_a_stuck_refresh() {
        let messenger = Arc::new(StuckActions {
            calls: AtomicUsize::new(0),
            hang_from: 2,
        });
        let typing =
            TypingIndicator::start(messenger.clone(), ChatId(1), Duration::from_millis(10)).await;
        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(messenger.calls.load(Ordering::SeqCst), 2);

        tokio::time::timeout(Duration::from_millis(200), typing.stop())
            .await
            .expect("stop returns while a send is stuck");
    }

    #[tokio::test]
    async fn stuck_first_indicator_is_bounded() {
        let messenger = Arc::new(StuckActions {
            calls: AtomicUsize::new(0),
            hang_from: 1,
        });
        let started = Instant::now();
        let typing =
            TypingIndicator::start(messenger.clone(), ChatId(1), Duration::from_secs(60)).await;
        assert!(started.elapsed() < Duration::from_secs(1));
        typing.stop().await;
    }
}
