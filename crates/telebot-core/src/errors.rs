/// Core error type for the relay.
///
/// Adapter crates map their specific errors into this type. Completion
/// failures never appear here: the relay turns them into a user-facing notice.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("external error: {0}")]
    External(String),
}

pub type Result<T> = std::result::Result<T, Error>;
