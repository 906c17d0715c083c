//! CLI argument definitions for Hopper.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Hopper - a quick and lightweight tmux session/project manager.
///
/// Run `hop` with no command to pick a template or running session.
#[derive(Parser, Debug)]
#[command(name = "hop")]
#[command(author, version, about = "A quick and lightweight tmux session/project manager", long_about = None)]
pub struct Cli {
    /// Output in JSON format instead of human-readable text
    #[arg(long = "json", global = true)]
    pub json: bool,

    /// Directory holding config.kdl and the saved templates
    #[arg(long = "config-dir", global = true, env = "HOP_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Top-level commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Open a template or running session (builds the session if needed)
    #[command(visible_aliases = ["o", "s", "select"])]
    Open {
        /// Template name or uuid, or running session name. Prompts when omitted.
        name: Option<String>,
    },

    /// Save a new template for a directory
    #[command(visible_aliases = ["c", "a", "add", "new"])]
    Create {
        /// Template name (defaults to the directory name)
        name: Option<String>,

        /// Session root directory (defaults to the current directory)
        #[arg(long)]
        root: Option<PathBuf>,
    },

    /// Edit a template file, then validate it
    #[command(visible_alias = "e")]
    Edit {
        /// Template name or uuid. Prompts when omitted.
        name: Option<String>,

        /// Editor command (overrides $EDITOR and config.kdl)
        #[arg(long)]
        editor: Option<String>,
    },

    /// Delete a saved template
    #[command(visible_aliases = ["d", "rm"])]
    Delete {
        /// Template name or uuid. Prompts when omitted.
        name: Option<String>,
    },

    /// Kill a running session
    #[command(visible_alias = "k")]
    Kill {
        /// Session name. Prompts when omitted.
        session: Option<String>,
    },

    /// List saved templates and running sessions
    #[command(visible_aliases = ["l", "ls"])]
    List,
}

impl Cli {
    /// The command to run; no command means `open` with a prompt.
    pub fn resolved_command(&self) -> Commands {
        self.command
            .clone()
            .unwrap_or(Commands::Open { name: None })
    }
}
