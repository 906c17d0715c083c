//! Precedence resolution for configuration.
//!
//! ## Precedence (highest to lowest)
//!
//! 1. CLI flags (passed at runtime)
//! 2. Environment variables (`HOP_TMUX`, `HOP_SELECTOR`, `EDITOR`)
//! 3. config.kdl in the config dir
//! 4. Built-in defaults
//!
//! The editor has no built-in default.

use crate::config::schema::CONFIG_FILE;
use crate::config::{HopperConfig, OutputFormat};
use crate::selector::DEFAULT_SELECTOR;
use crate::tmux::DEFAULT_TMUX;
use crate::{Error, Result};
use std::path::{Path, PathBuf};

/// Environment variable overriding the config directory.
pub const CONFIG_DIR_ENV: &str = "HOP_CONFIG_DIR";
/// Environment variable overriding the tmux binary.
pub const TMUX_ENV: &str = "HOP_TMUX";
/// Environment variable overriding the selector binary.
pub const SELECTOR_ENV: &str = "HOP_SELECTOR";
/// Editor fallback shared with most Unix tools.
pub const EDITOR_ENV: &str = "EDITOR";

/// Tracks where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValueSource {
    /// Value from CLI flag
    CliFlag,
    /// Value from environment variable
    EnvVar(String),
    /// Value from config.kdl
    ConfigFile,
    /// Built-in default value
    Default,
}

impl std::fmt::Display for ValueSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueSource::CliFlag => write!(f, "cli"),
            ValueSource::EnvVar(name) => write!(f, "env:{}", name),
            ValueSource::ConfigFile => write!(f, "config"),
            ValueSource::Default => write!(f, "default"),
        }
    }
}

/// A resolved value with its source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved<T> {
    pub value: T,
    pub source: ValueSource,
}

impl<T> Resolved<T> {
    pub fn new(value: T, source: ValueSource) -> Self {
        Self { value, source }
    }
}

/// Fully resolved configuration with source tracking.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// Directory holding config.kdl and the templates
    pub config_dir: PathBuf,
    pub editor: Option<Resolved<String>>,
    pub output_format: Resolved<OutputFormat>,
    pub tmux: Resolved<String>,
    pub selector: Resolved<String>,
}

impl ResolvedConfig {
    /// Get the editor value, or a config error naming every way to set one.
    pub fn editor(&self) -> Result<&str> {
        self.editor.as_ref().map(|r| r.value.as_str()).ok_or_else(|| {
            Error::Config(format!(
                "no editor configured; pass --editor, set ${}, or add `editor` to {}",
                EDITOR_ENV,
                config_file_path(&self.config_dir).display()
            ))
        })
    }

    pub fn output_format(&self) -> OutputFormat {
        self.output_format.value
    }

    pub fn tmux(&self) -> &str {
        &self.tmux.value
    }

    pub fn selector(&self) -> &str {
        &self.selector.value
    }
}

/// CLI overrides for configuration resolution.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config_dir: Option<PathBuf>,
    pub editor: Option<String>,
    pub output_format: Option<OutputFormat>,
}

impl ConfigOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config_dir = Some(dir.into());
        self
    }

    pub fn with_editor(mut self, editor: impl Into<String>) -> Self {
        self.editor = Some(editor.into());
        self
    }

    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = Some(format);
        self
    }
}

/// Default config directory: `<platform config dir>/hopper`.
pub fn default_config_dir() -> Result<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join("hopper"))
        .ok_or_else(|| Error::Config("could not determine config directory".to_string()))
}

fn pick(
    flag: Option<&String>,
    env: &dyn Fn(&str) -> Option<String>,
    env_name: &str,
    file: Option<&String>,
) -> Option<Resolved<String>> {
    if let Some(value) = flag {
        return Some(Resolved::new(value.clone(), ValueSource::CliFlag));
    }
    if let Some(value) = env(env_name).filter(|v| !v.is_empty()) {
        return Some(Resolved::new(
            value,
            ValueSource::EnvVar(env_name.to_string()),
        ));
    }
    file.map(|value| Resolved::new(value.clone(), ValueSource::ConfigFile))
}

/// Resolve configuration against the process environment.
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<ResolvedConfig> {
    resolve_config_with(overrides, &|name| std::env::var(name).ok())
}

/// Resolve configuration, reading environment variables through `env`.
pub fn resolve_config_with(
    overrides: &ConfigOverrides,
    env: &dyn Fn(&str) -> Option<String>,
) -> Result<ResolvedConfig> {
    let config_dir = match &overrides.config_dir {
        Some(dir) => dir.clone(),
        None => match env(CONFIG_DIR_ENV).filter(|v| !v.is_empty()) {
            Some(dir) => PathBuf::from(dir),
            None => default_config_dir()?,
        },
    };
    let file = HopperConfig::load(&config_dir)?;
    Ok(merge(config_dir, &file, overrides, env))
}

fn merge(
    config_dir: PathBuf,
    file: &HopperConfig,
    overrides: &ConfigOverrides,
    env: &dyn Fn(&str) -> Option<String>,
) -> ResolvedConfig {
    let editor = pick(
        overrides.editor.as_ref(),
        env,
        EDITOR_ENV,
        file.editor.as_ref(),
    );

    let output_format = if let Some(format) = overrides.output_format {
        Resolved::new(format, ValueSource::CliFlag)
    } else if let Some(format) = file.output_format {
        Resolved::new(format, ValueSource::ConfigFile)
    } else {
        Resolved::new(OutputFormat::default(), ValueSource::Default)
    };

    let tmux = pick(None, env, TMUX_ENV, file.tmux.as_ref())
        .unwrap_or_else(|| Resolved::new(DEFAULT_TMUX.to_string(), ValueSource::Default));
    let selector = pick(None, env, SELECTOR_ENV, file.selector.as_ref())
        .unwrap_or_else(|| Resolved::new(DEFAULT_SELECTOR.to_string(), ValueSource::Default));

    ResolvedConfig {
        config_dir,
        editor,
        output_format,
        tmux,
        selector,
    }
}

/// Path of config.kdl inside `config_dir`.
pub fn config_file_path(config_dir: &Path) -> PathBuf {
    config_dir.join(CONFIG_FILE)
}
