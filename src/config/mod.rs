//! Configuration for Hopper.
//!
//! ## config.kdl - User preferences
//!
//! Located at `<config_dir>/config.kdl`, where the config dir is
//! `--config-dir`, else `$HOP_CONFIG_DIR`, else `~/.config/hopper`.
//!
//! Contains:
//! - `editor` - Editor command for `hop edit`
//! - `output-format` - "json" or "human"
//! - `tmux` - tmux binary
//! - `selector` - fuzzy finder binary
//!
//! Use the [`resolver`] module for precedence resolution.

pub mod resolver;
pub mod schema;

pub use resolver::{
    ConfigOverrides, Resolved, ResolvedConfig, ValueSource, resolve_config, resolve_config_with,
};
pub use schema::{HopperConfig, OutputFormat};
