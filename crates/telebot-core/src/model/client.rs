use async_trait::async_trait;

use super::types::{CompletionRequest, CompletionResult};

/// Completion provider interface used by the relay.
///
/// Implementations return the raw generated text (possibly empty); trimming and
/// empty-result handling belong to the caller.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Short provider name for logs.
    fn provider(&self) -> &'static str;

    async fn complete(&self, req: CompletionRequest) -> CompletionResult<String>;
}
