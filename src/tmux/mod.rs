//! Tmux integration.
//!
//! `command` builds tmux argument vectors; `client` executes them and
//! implements [`Multiplexer`](crate::session::Multiplexer).

pub mod client;
pub mod command;

pub use client::TmuxClient;

/// Default tmux binary, looked up in PATH.
pub const DEFAULT_TMUX: &str = "tmux";

/// Whether the current process runs inside a tmux client.
///
/// tmux exports `TMUX` to every pane it spawns; an empty value counts as
/// outside.
pub fn is_inside_tmux(tmux_env: Option<&str>) -> bool {
    tmux_env.is_some_and(|v| !v.is_empty())
}
