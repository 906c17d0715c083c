//! Session assembly.
//!
//! Turns a [`Template`] into a running session: one `new-session` for the
//! first window, one `new-window` for each further window, then the startup
//! commands typed into every window, then the active window selection.

use crate::models::{SessionName, Template};
use crate::session::Multiplexer;
use crate::{Error, Result};

/// Build `name` from `template`.
///
/// Callers must have checked that no session called `name` exists. The
/// template is validated before any command runs. The first failing step
/// aborts assembly; steps that already ran are not undone.
pub fn assemble<M: Multiplexer>(mux: &M, name: &SessionName, template: &Template) -> Result<()> {
    template.validate()?;

    let session = name.as_str();
    let root = template.root.as_str();

    let Some((main, rest)) = template.windows.split_first() else {
        return Err(Error::InvalidTemplateArgs(
            "template windows cannot be empty".to_string(),
        ));
    };

    tracing::debug!(session, window = %main.name, root, "creating session");
    mux.new_session(session, root, &main.name, main.root.as_deref())?;

    for window in rest {
        tracing::debug!(session, window = %window.name, "creating window");
        mux.new_window(session, root, &window.name, window.root.as_deref())?;
    }

    for window in &template.windows {
        for keys in template.commands.iter().chain(&window.commands) {
            mux.send_keys(session, &window.name, keys)?;
        }
    }

    if let Some(active) = &template.active_window {
        mux.select_window(session, active)?;
    }

    tracing::info!(session, windows = template.windows.len(), "session created");
    Ok(())
}
