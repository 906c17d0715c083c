//! Session name resolution.

use crate::models::{Project, SessionName};
use crate::{Error, Result};

/// Derive the tmux session name for a project.
///
/// The template's `name` wins when set, otherwise the project name is used.
/// Fails with [`Error::InvalidTemplateArgs`] when the template is missing or
/// both names are empty.
pub fn resolve_session_name(project: &Project) -> Result<SessionName> {
    let template = project.template.as_ref().ok_or_else(|| {
        Error::InvalidTemplateArgs("project template cannot be missing".to_string())
    })?;

    if let Some(name) = template.name.as_deref().filter(|n| !n.is_empty()) {
        return SessionName::new(name);
    }
    if project.name.is_empty() {
        return Err(Error::InvalidTemplateArgs(
            "project name cannot be empty".to_string(),
        ));
    }
    SessionName::new(project.name.as_str())
}
