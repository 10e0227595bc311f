//! Core domain + application logic for the Telegram LLM relay.
//!
//! This crate is intentionally framework-agnostic. Telegram and the completion
//! provider live behind ports (traits) implemented in adapter crates.

pub mod chunking;
pub mod config;
pub mod domain;
pub mod errors;
pub mod logging;
pub mod messaging;
pub mod mode;
pub mod model;
pub mod prompt;
pub mod relay;

pub use errors::{Error, Result};
