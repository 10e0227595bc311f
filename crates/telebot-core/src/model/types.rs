use std::fmt;

/// Normalized request for a single completion call.
///
/// Built fresh per inbound message and consumed by exactly one provider call.
#[derive(Clone, Debug, PartialEq)]
pub struct CompletionRequest {
    pub prompt: String,
    pub model: String,
    pub temperature: f32,
    pub max_output_tokens: u32,
}

/// Coarse failure category, decoupled from any provider's native error types.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CompletionErrorKind {
    Network,
    Timeout,
    Authentication,
    RateLimited,
    InvalidRequest,
    Provider,
    MalformedResponse,
    Internal,
}

impl CompletionErrorKind {
    pub fn label(self) -> &'static str {
        match self {
            CompletionErrorKind::Network => "ConnectionError",
            CompletionErrorKind::Timeout => "TimeoutError",
            CompletionErrorKind::Authentication => "AuthenticationError",
            CompletionErrorKind::RateLimited => "RateLimitError",
            CompletionErrorKind::InvalidRequest => "BadRequestError",
            CompletionErrorKind::Provider => "ServerError",
            CompletionErrorKind::MalformedResponse => "MalformedResponseError",
            CompletionErrorKind::Internal => "InternalError",
        }
    }
}

impl fmt::Display for CompletionErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A failed completion call. `detail` is for operator logs only.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {detail}")]
pub struct CompletionError {
    pub kind: CompletionErrorKind,
    pub detail: String,
}

impl CompletionError {
    pub fn new(kind: CompletionErrorKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }
}

pub type CompletionResult<T> = std::result::Result<T, CompletionError>;
