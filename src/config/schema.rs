//! KDL schema for config.kdl.

use crate::{Error, Result};
use kdl::KdlDocument;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name of the user configuration inside the config dir.
pub const CONFIG_FILE: &str = "config.kdl";

/// Output format preference for CLI commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    #[default]
    Human,
    /// JSON output (machine-readable)
    Json,
}

impl OutputFormat {
    /// Parse from string, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "human" => Some(OutputFormat::Human),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Human => "human",
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// User preferences stored in config.kdl.
///
/// # KDL Schema
///
/// ```kdl
/// editor "nvim"
/// output-format "human"  // or "json"
/// tmux "/usr/local/bin/tmux"
/// selector "fzf"
/// ```
///
/// Unknown nodes are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HopperConfig {
    /// Editor command used by `hop edit` (e.g., "nvim", "code --wait")
    pub editor: Option<String>,

    /// Default output format for CLI commands
    pub output_format: Option<OutputFormat>,

    /// tmux binary
    pub tmux: Option<String>,

    /// Fuzzy finder binary
    pub selector: Option<String>,
}

fn string_arg(doc: &KdlDocument, name: &str) -> Option<String> {
    doc.get(name)
        .and_then(|node| node.entries().first())
        .and_then(|entry| entry.value().as_string())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl HopperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse config from a KDL document.
    pub fn from_kdl(doc: &KdlDocument) -> Self {
        Self {
            editor: string_arg(doc, "editor"),
            output_format: string_arg(doc, "output-format").and_then(|s| OutputFormat::parse(&s)),
            tmux: string_arg(doc, "tmux"),
            selector: string_arg(doc, "selector"),
        }
    }

    /// Parse config from KDL text.
    pub fn parse(text: &str) -> Result<Self> {
        let doc: KdlDocument = text
            .parse()
            .map_err(|e| Error::Config(format!("invalid config.kdl: {}", e)))?;
        Ok(Self::from_kdl(&doc))
    }

    /// Read `config.kdl` from `config_dir`. A missing file is an empty config.
    pub fn load(config_dir: &Path) -> Result<Self> {
        let path = config_dir.join(CONFIG_FILE);
        if !path.exists() {
            return Ok(Self::new());
        }
        let text = std::fs::read_to_string(&path)?;
        Self::parse(&text)
    }
}
