use std::sync::Arc;

use tokio::sync::Semaphore;

use super::{
    client::CompletionClient,
    types::{CompletionError, CompletionErrorKind, CompletionRequest, CompletionResult},
};

/// Bounded worker pool for completion calls.
///
/// Each admitted call runs as its own tokio task holding one permit, so a slow
/// completion never stalls the dispatcher and at most `workers` calls are in
/// flight at once. Callers suspend on the task until it resolves; there is no
/// cancellation path.
pub struct CompletionPool {
    client: Arc<dyn CompletionClient>,
    permits: Arc<Semaphore>,
}

impl CompletionPool {
    pub fn new(client: Arc<dyn CompletionClient>, workers: usize) -> Self {
        Self {
            client,
            permits: Arc::new(Semaphore::new(workers.max(1))),
        }
    }

    pub fn provider(&self) -> &'static str {
        self.client.provider()
    }

    /// Number of calls that could start right now without queueing.
    pub fn idle_workers(&self) -> usize {
        self.permits.available_permits()
    }

    pub async fn submit(&self, req: CompletionRequest) -> CompletionResult<String> {
        let permit = self.permits.clone().acquire_owned().await.map_err(|_| {
            CompletionError::new(CompletionErrorKind::Internal, "completion pool closed")
        })?;

        let client = self.client.clone();
        let task = tokio::spawn(async move {
            let _permit = permit;
            client.complete(req).await
        });

        match task.await {
            Ok(res) => res,
            Err(e) => Err(CompletionError::new(
                CompletionErrorKind::Internal,
                format!("completion task failed: {e}"),
            )),
        }
    }
}
