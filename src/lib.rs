//! Hopper - a quick and lightweight tmux session/project manager.
//!
//! This library provides the core functionality for the `hop` CLI tool:
//! saving project templates, and materializing them as tmux sessions
//! (or reattaching to sessions that are already running).

pub mod cli;
pub mod commands;
pub mod config;
pub mod editor;
pub mod exec;
pub mod models;
pub mod selector;
pub mod service;
pub mod session;
pub mod storage;
pub mod tmux;

/// Library-level error type for Hopper operations.
///
/// Every failure the session engine can produce maps to exactly one variant;
/// callers match on the variant, never on the message.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Template file error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid template: {0}")]
    InvalidTemplateArgs(String),

    #[error("Failed to check session: {0}")]
    FailedToCheckSession(String),

    #[error("Failed to assemble session: {0}")]
    Assembly(String),

    #[error("Failed to attach to session: {0}")]
    Dispatch(String),

    #[error("Failed to list sessions: {0}")]
    ListSessions(String),

    #[error("Failed to kill session: {0}")]
    KillSession(String),

    #[error("Selector failed: {0}")]
    Selector(String),

    #[error("Editor failed: {0}")]
    Editor(String),

    #[error("Operation cancelled")]
    Cancelled,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// True when the user aborted an interactive selection.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Error::Cancelled)
    }
}

/// Result type alias for Hopper operations.
pub type Result<T> = std::result::Result<T, Error>;
