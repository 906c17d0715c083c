//! Data models for Hopper entities.
//!
//! This module defines the core data structures:
//! - `Project` - A named, persisted template record
//! - `Template` - Root directory, startup commands, and windows of a session
//! - `Window` / `Pane` - Subdivisions of a session
//! - `SessionName` - The tmux session identifier derived from a project
//! - `LiveSession` - A running tmux session discovered at runtime
//! - `Candidate` - An entry offered to the interactive selector

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Current template schema version.
pub const CURRENT_VERSION: u32 = 1;

fn default_version() -> u32 {
    CURRENT_VERSION
}

/// A saved project template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Stable identifier, assigned on first save. Stored as the directory
    /// name on disk, never inside the file.
    #[serde(skip)]
    pub uuid: String,

    /// Human identifier
    pub name: String,

    /// Schema version tag
    #[serde(default = "default_version")]
    pub version: u32,

    /// Session blueprint
    #[serde(default)]
    pub template: Option<Template>,
}

impl Project {
    /// Create an unsaved project (empty uuid) at the current schema version.
    pub fn new(name: impl Into<String>, template: Template) -> Self {
        Self {
            uuid: String::new(),
            name: name.into(),
            version: CURRENT_VERSION,
            template: Some(template),
        }
    }

    /// Name shown to the user: the template's session-name override if
    /// set, otherwise the project name.
    pub fn display_name(&self) -> &str {
        self.template
            .as_ref()
            .and_then(|t| t.name.as_deref())
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.name)
    }

    /// Validate everything a persisted project must satisfy.
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::InvalidTemplateArgs(
                "project name cannot be empty".to_string(),
            ));
        }
        match &self.template {
            Some(template) => template.validate(),
            None => Err(Error::InvalidTemplateArgs(
                "project template cannot be missing".to_string(),
            )),
        }
    }
}

/// Blueprint a session is assembled from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    /// Overrides the project name as the session name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Absolute working directory of the session
    pub root: String,

    /// Commands replayed in every window, before the window's own
    #[serde(rename = "run", default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<String>,

    /// Window focused once the session is built
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_window: Option<String>,

    /// Windows in creation order; the first one is created with the session
    #[serde(default)]
    pub windows: Vec<Window>,
}

impl Template {
    /// Template rooted at `root` with the given windows.
    pub fn new(root: impl Into<String>, windows: Vec<Window>) -> Self {
        Self {
            root: root.into(),
            windows,
            ..Self::default()
        }
    }

    /// Check the preconditions of session assembly.
    pub fn validate(&self) -> Result<()> {
        if self.root.is_empty() {
            return Err(Error::InvalidTemplateArgs(
                "session root cannot be empty".to_string(),
            ));
        }
        if self.windows.is_empty() {
            return Err(Error::InvalidTemplateArgs(
                "project template needs at least one window to be created".to_string(),
            ));
        }
        if self.commands.iter().any(String::is_empty) {
            return Err(Error::InvalidTemplateArgs(
                "template commands cannot be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for window in &self.windows {
            window.validate()?;
            if !seen.insert(window.name.as_str()) {
                return Err(Error::InvalidTemplateArgs(format!(
                    "duplicate window name '{}'",
                    window.name
                )));
            }
        }

        if let Some(active) = &self.active_window {
            if !seen.contains(active.as_str()) {
                return Err(Error::InvalidTemplateArgs(format!(
                    "active window '{}' is not one of the template's windows",
                    active
                )));
            }
        }

        Ok(())
    }
}

/// A named window of a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Window {
    /// Window name, also used as the tmux window target
    pub name: String,

    /// Overrides the template root for this window
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,

    #[serde(rename = "run", default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<String>,

    /// Not assembled yet; only validated
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub panes: Vec<Pane>,
}

impl Window {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::InvalidTemplateArgs(
                "window name cannot be empty".to_string(),
            ));
        }
        if self.commands.iter().any(String::is_empty) {
            return Err(Error::InvalidTemplateArgs(format!(
                "window '{}' has an empty command",
                self.name
            )));
        }
        for pane in &self.panes {
            pane.validate()?;
        }
        Ok(())
    }
}

/// A pane within a window.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pane {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<String>,

    #[serde(rename = "run", default, skip_serializing_if = "Vec::is_empty")]
    pub commands: Vec<String>,
}

impl Pane {
    pub fn validate(&self) -> Result<()> {
        if self.name.is_empty() {
            return Err(Error::InvalidTemplateArgs(
                "pane name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Identifier of a tmux session. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SessionName(String);

impl SessionName {
    /// Wrap a session name, rejecting the empty string.
    pub fn new(name: impl Into<String>) -> Result<Self> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::InvalidTemplateArgs(
                "session name cannot be empty".to_string(),
            ));
        }
        Ok(Self(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for SessionName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A running tmux session, known only by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiveSession {
    pub name: SessionName,
}

impl LiveSession {
    pub fn new(name: SessionName) -> Self {
        Self { name }
    }
}

/// Label prefix marking live sessions in the selector.
pub const ACTIVE_PREFIX: &str = "(active) ";

/// An entry the user can pick from.
#[derive(Debug, Clone, PartialEq)]
pub enum Candidate {
    Template(Project),
    Live(LiveSession),
}

impl Candidate {
    /// Text shown for this candidate in the selector.
    pub fn label(&self) -> String {
        match self {
            Candidate::Template(project) => project.display_name().to_string(),
            Candidate::Live(live) => format!("{}{}", ACTIVE_PREFIX, live.name),
        }
    }
}
