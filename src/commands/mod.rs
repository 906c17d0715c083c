//! Command implementations for the `hop` CLI.
//!
//! Each function runs one CLI command against an [`AppService`] and returns
//! a result type that renders as JSON or as human-readable text.

use crate::editor::EditorLauncher;
use crate::models::{LiveSession, Project};
use crate::selector::Selector;
use crate::service::{AppService, Opened};
use crate::session::{Multiplexer, resolve_session_name};
use crate::storage::Catalog;
use crate::Result;
use serde::Serialize;
use std::path::Path;

/// Command results that can be serialized to JSON or formatted for humans.
pub trait CommandResult {
    /// Serialize to JSON string.
    fn to_json(&self) -> String;

    /// Format for human-readable output. May be empty.
    fn to_human(&self) -> String;
}

fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!(r#"{{"error":"{}"}}"#, e))
}

#[derive(Debug, Serialize)]
pub struct CreateResult {
    pub name: String,
    pub uuid: String,
    pub root: String,
}

impl CommandResult for CreateResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!("Created template '{}' at {}", self.name, self.root)
    }
}

/// Save a template for `root`.
pub fn create<C: Catalog, M: Multiplexer, S: Selector>(
    service: &AppService<C, M, S>,
    name: Option<&str>,
    root: &Path,
) -> Result<CreateResult> {
    let project = service.create_project(name, root)?;
    Ok(CreateResult {
        root: project
            .template
            .as_ref()
            .map(|t| t.root.clone())
            .unwrap_or_default(),
        name: project.name,
        uuid: project.uuid,
    })
}

#[derive(Debug, Serialize)]
pub struct OpenResult {
    /// "template" or "live"
    pub kind: &'static str,
    pub session: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
}

impl CommandResult for OpenResult {
    fn to_json(&self) -> String {
        json(self)
    }

    // The terminal was just handed back from tmux; stay quiet.
    fn to_human(&self) -> String {
        String::new()
    }
}

/// Open a template or running session.
pub fn open<C: Catalog, M: Multiplexer, S: Selector>(
    service: &AppService<C, M, S>,
    name: Option<&str>,
) -> Result<OpenResult> {
    Ok(match service.open_project(name)? {
        Opened::Template { project, session } => OpenResult {
            kind: "template",
            session: session.to_string(),
            template: Some(project),
        },
        Opened::Live { session } => OpenResult {
            kind: "live",
            session: session.to_string(),
            template: None,
        },
    })
}

#[derive(Debug, Serialize)]
pub struct DeleteResult {
    pub name: String,
    pub uuid: String,
}

impl CommandResult for DeleteResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!("Deleted template '{}'", self.name)
    }
}

pub fn delete<C: Catalog, M: Multiplexer, S: Selector>(
    service: &AppService<C, M, S>,
    name: Option<&str>,
) -> Result<DeleteResult> {
    let project = service.delete_project(name)?;
    Ok(DeleteResult {
        name: project.name,
        uuid: project.uuid,
    })
}

#[derive(Debug, Serialize)]
pub struct EditResult {
    pub name: String,
    pub uuid: String,
    pub path: String,
}

impl CommandResult for EditResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!("Template '{}' is valid ({})", self.name, self.path)
    }
}

pub fn edit<C: Catalog, M: Multiplexer, S: Selector, E: EditorLauncher>(
    service: &AppService<C, M, S>,
    name: Option<&str>,
    editor: &E,
) -> Result<EditResult> {
    let (project, path) = service.edit_project(name, editor)?;
    Ok(EditResult {
        name: project.name,
        uuid: project.uuid,
        path: path.display().to_string(),
    })
}

#[derive(Debug, Serialize)]
pub struct KillResult {
    pub session: String,
}

impl CommandResult for KillResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        format!("Killed session '{}'", self.session)
    }
}

pub fn kill<C: Catalog, M: Multiplexer, S: Selector>(
    service: &AppService<C, M, S>,
    name: Option<&str>,
) -> Result<KillResult> {
    let session = service.kill_session(name)?;
    Ok(KillResult {
        session: session.name.to_string(),
    })
}

#[derive(Debug, Serialize)]
pub struct TemplateEntry {
    pub name: String,
    pub uuid: String,
    pub session: String,
    pub root: String,
    pub windows: usize,
    /// A session with this template's name is running
    pub active: bool,
}

#[derive(Debug, Serialize)]
pub struct ListResult {
    pub templates: Vec<TemplateEntry>,
    pub sessions: Vec<String>,
}

impl ListResult {
    fn from_parts(templates: Vec<Project>, live: Vec<LiveSession>) -> Self {
        let sessions: Vec<String> = live.into_iter().map(|s| s.name.to_string()).collect();
        let templates = templates
            .into_iter()
            .map(|p| {
                let session = resolve_session_name(&p)
                    .map(|n| n.to_string())
                    .unwrap_or_default();
                let (root, windows) = p
                    .template
                    .as_ref()
                    .map(|t| (t.root.clone(), t.windows.len()))
                    .unwrap_or_default();
                TemplateEntry {
                    active: sessions.contains(&session),
                    name: p.name,
                    uuid: p.uuid,
                    session,
                    root,
                    windows,
                }
            })
            .collect();
        Self {
            templates,
            sessions,
        }
    }
}

impl CommandResult for ListResult {
    fn to_json(&self) -> String {
        json(self)
    }

    fn to_human(&self) -> String {
        let mut lines = Vec::new();
        if self.templates.is_empty() {
            lines.push("No templates.".to_string());
        } else {
            lines.push(format!("{} template(s):", self.templates.len()));
            for t in &self.templates {
                let marker = if t.active { "*" } else { " " };
                let windows = if t.windows == 1 { "window" } else { "windows" };
                lines.push(format!(
                    "{} {}  {} ({} {})",
                    marker, t.name, t.root, t.windows, windows
                ));
            }
        }
        if self.sessions.is_empty() {
            lines.push("No running sessions.".to_string());
        } else {
            lines.push(format!("{} running session(s):", self.sessions.len()));
            for s in &self.sessions {
                lines.push(format!("  {}", s));
            }
        }
        lines.join("\n")
    }
}

pub fn list<C: Catalog, M: Multiplexer, S: Selector>(
    service: &AppService<C, M, S>,
) -> Result<ListResult> {
    let (templates, live) = service.list_projects()?;
    Ok(ListResult::from_parts(templates, live))
}
