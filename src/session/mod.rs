//! Session resolution and assembly engine.
//!
//! [`SessionEngine::attach_project`] walks a project through
//! `Resolving -> Probing -> (Assembling ->) Dispatching -> Done`; any step may
//! fail and end the walk. The engine never persists or mutates a project.

pub mod assembler;
pub mod dispatcher;
pub mod resolver;

pub use assembler::assemble;
pub use dispatcher::AttachCommand;
pub use resolver::resolve_session_name;

use crate::models::{LiveSession, Project, SessionName};
use crate::{Error, Result};
use std::fmt;

/// Operations the engine needs from a terminal multiplexer.
///
/// Every method returns the error variant matching its step:
/// probing yields [`Error::FailedToCheckSession`], building yields
/// [`Error::Assembly`], attaching yields [`Error::Dispatch`].
pub trait Multiplexer {
    /// Whether a session answering to `name` is running.
    fn has_session(&self, name: &str) -> Result<bool>;

    /// Create a detached session whose first window is `window`.
    ///
    /// When `window_root` is set and differs from `root`, the window starts
    /// in `window_root` while the session keeps `root`.
    fn new_session(
        &self,
        name: &str,
        root: &str,
        window: &str,
        window_root: Option<&str>,
    ) -> Result<()>;

    /// Add a detached window, rooted at `window_root` or else `root`.
    fn new_window(
        &self,
        name: &str,
        root: &str,
        window: &str,
        window_root: Option<&str>,
    ) -> Result<()>;

    /// Type `keys` into a window followed by Enter.
    fn send_keys(&self, name: &str, window: &str, keys: &str) -> Result<()>;

    fn select_window(&self, name: &str, window: &str) -> Result<()>;

    /// Attach the calling terminal. Blocks until detach.
    fn attach_session(&self, name: &str) -> Result<()>;

    /// Move the calling tmux client to `name`. Blocks until it returns.
    fn switch_session(&self, name: &str) -> Result<()>;

    /// Running sessions. No server means no sessions.
    fn list_sessions(&self) -> Result<Vec<LiveSession>>;

    fn kill_session(&self, name: &str) -> Result<()>;
}

impl<T: Multiplexer + ?Sized> Multiplexer for &T {
    fn has_session(&self, name: &str) -> Result<bool> {
        (**self).has_session(name)
    }

    fn new_session(
        &self,
        name: &str,
        root: &str,
        window: &str,
        window_root: Option<&str>,
    ) -> Result<()> {
        (**self).new_session(name, root, window, window_root)
    }

    fn new_window(
        &self,
        name: &str,
        root: &str,
        window: &str,
        window_root: Option<&str>,
    ) -> Result<()> {
        (**self).new_window(name, root, window, window_root)
    }

    fn send_keys(&self, name: &str, window: &str, keys: &str) -> Result<()> {
        (**self).send_keys(name, window, keys)
    }

    fn select_window(&self, name: &str, window: &str) -> Result<()> {
        (**self).select_window(name, window)
    }

    fn attach_session(&self, name: &str) -> Result<()> {
        (**self).attach_session(name)
    }

    fn switch_session(&self, name: &str) -> Result<()> {
        (**self).switch_session(name)
    }

    fn list_sessions(&self) -> Result<Vec<LiveSession>> {
        (**self).list_sessions()
    }

    fn kill_session(&self, name: &str) -> Result<()> {
        (**self).kill_session(name)
    }
}

/// Steps of attaching a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachState {
    Resolving,
    Probing,
    Assembling,
    Dispatching,
    Done,
}

impl fmt::Display for AttachState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AttachState::Resolving => "resolving",
            AttachState::Probing => "probing",
            AttachState::Assembling => "assembling",
            AttachState::Dispatching => "dispatching",
            AttachState::Done => "done",
        };
        f.write_str(s)
    }
}

/// Resolves, builds, attaches to and kills sessions.
pub struct SessionEngine<M: Multiplexer> {
    mux: M,
    inside_multiplexer: bool,
}

impl<M: Multiplexer> SessionEngine<M> {
    /// `inside_multiplexer` is read once at startup (see
    /// [`crate::tmux::is_inside_tmux`]).
    pub fn new(mux: M, inside_multiplexer: bool) -> Self {
        Self {
            mux,
            inside_multiplexer,
        }
    }

    pub fn inside_multiplexer(&self) -> bool {
        self.inside_multiplexer
    }

    fn enter(&self, state: AttachState, session: Option<&SessionName>) {
        match session {
            Some(name) => tracing::debug!(%state, session = %name, "attach state"),
            None => tracing::debug!(%state, "attach state"),
        }
    }

    /// Open `project`: reuse its running session, or build one first.
    ///
    /// Returns the session name that was attached to.
    pub fn attach_project(&self, project: &Project) -> Result<SessionName> {
        self.enter(AttachState::Resolving, None);
        let name = resolve_session_name(project).inspect_err(|e| {
            tracing::debug!(error = %e, "attach failed");
        })?;
        let result = self.run_attach(&name, project);
        if let Err(e) = &result {
            tracing::debug!(session = %name, error = %e, "attach failed");
        }
        result.map(|()| name)
    }

    fn run_attach(&self, name: &SessionName, project: &Project) -> Result<()> {
        let template = project.template.as_ref().ok_or_else(|| {
            Error::InvalidTemplateArgs("project template cannot be missing".to_string())
        })?;

        self.enter(AttachState::Probing, Some(name));
        if self.mux.has_session(name.as_str())? {
            tracing::debug!(session = %name, "session already running");
        } else {
            self.enter(AttachState::Assembling, Some(name));
            assemble(&self.mux, name, template)?;
        }

        self.enter(AttachState::Dispatching, Some(name));
        AttachCommand::for_caller(name.clone(), self.inside_multiplexer).run(&self.mux)?;

        self.enter(AttachState::Done, Some(name));
        Ok(())
    }

    /// Attach to a session that has no template behind it.
    ///
    /// Never builds anything: a session that disappeared since it was listed
    /// is [`Error::NotFound`].
    pub fn attach_live(&self, session: &LiveSession) -> Result<()> {
        let name = &session.name;
        self.enter(AttachState::Probing, Some(name));
        if !self.mux.has_session(name.as_str())? {
            return Err(Error::NotFound(format!("session '{}' is not running", name)));
        }
        self.enter(AttachState::Dispatching, Some(name));
        AttachCommand::for_caller(name.clone(), self.inside_multiplexer).run(&self.mux)?;
        self.enter(AttachState::Done, Some(name));
        Ok(())
    }

    pub fn list_active_sessions(&self) -> Result<Vec<LiveSession>> {
        let sessions = self.mux.list_sessions()?;
        tracing::debug!(count = sessions.len(), "listed live sessions");
        Ok(sessions)
    }

    pub fn kill_session(&self, session: &LiveSession) -> Result<()> {
        self.mux.kill_session(session.name.as_str())?;
        tracing::info!(session = %session.name, "session killed");
        Ok(())
    }
}
