//! Completion provider port (OpenAI today; any chat-completions backend later).

pub mod client;
pub mod pool;
pub mod types;
