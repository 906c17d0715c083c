//! Tmux client.
//!
//! Runs [`TmuxCommand`]s through a [`CommandExecutor`] and maps each tmux
//! exit status onto the matching [`Error`] variant.

use crate::exec::{CommandExecutor, ExecOutput};
use crate::models::{LiveSession, SessionName};
use crate::session::Multiplexer;
use crate::tmux::command::{TmuxCommand, cd_and_exec_shell, window_target};
use crate::{Error, Result};

/// Stderr fragments tmux prints when no server is running.
const NO_SERVER_MARKERS: [&str; 2] = ["no server running", "error connecting to"];

/// [`Multiplexer`] backed by the tmux binary.
#[derive(Debug, Clone)]
pub struct TmuxClient<E: CommandExecutor> {
    executor: E,
    tmux_path: String,
}

impl<E: CommandExecutor> TmuxClient<E> {
    pub fn new(executor: E, tmux_path: impl Into<String>) -> Self {
        Self {
            executor,
            tmux_path: tmux_path.into(),
        }
    }

    pub fn tmux_path(&self) -> &str {
        &self.tmux_path
    }

    fn run(&self, cmd: &TmuxCommand) -> Result<ExecOutput> {
        tracing::debug!(command = %cmd.build(), "tmux");
        self.executor.execute(&self.tmux_path, cmd.args())
    }

    /// Run a session-building step, turning any failure into [`Error::Assembly`].
    fn run_assembly_step(&self, cmd: &TmuxCommand) -> Result<()> {
        let output = self
            .run(cmd)
            .map_err(|e| Error::Assembly(format!("{}: {}", cmd.build(), e)))?;
        if !output.success() {
            return Err(Error::Assembly(format!(
                "{} failed with {}",
                cmd.build(),
                output.failure_reason()
            )));
        }
        Ok(())
    }

    fn run_dispatch(&self, cmd: &TmuxCommand) -> Result<()> {
        tracing::debug!(command = %cmd.build(), "tmux (interactive)");
        let code = self
            .executor
            .execute_interactive(&self.tmux_path, cmd.args())
            .map_err(|e| Error::Dispatch(format!("{}: {}", cmd.build(), e)))?;
        match code {
            Some(0) => Ok(()),
            Some(code) => Err(Error::Dispatch(format!(
                "{} failed with exit status {}",
                cmd.build(),
                code
            ))),
            None => Err(Error::Dispatch(format!(
                "{} terminated by signal",
                cmd.build()
            ))),
        }
    }
}

fn require(value: &str, what: &str) -> Result<()> {
    if value.is_empty() {
        return Err(Error::InvalidTemplateArgs(format!(
            "{} cannot be empty",
            what
        )));
    }
    Ok(())
}

impl<E: CommandExecutor> Multiplexer for TmuxClient<E> {
    fn has_session(&self, name: &str) -> Result<bool> {
        require(name, "session name")?;
        let cmd = TmuxCommand::has_session(name);
        let output = self
            .run(&cmd)
            .map_err(|e| Error::FailedToCheckSession(e.to_string()))?;
        match output.code {
            Some(0) => Ok(true),
            Some(1) => Ok(false),
            _ => Err(Error::FailedToCheckSession(format!(
                "{} failed with {}",
                cmd.build(),
                output.failure_reason()
            ))),
        }
    }

    fn new_session(
        &self,
        name: &str,
        root: &str,
        window: &str,
        window_root: Option<&str>,
    ) -> Result<()> {
        require(name, "session name")?;
        require(root, "session root")?;
        require(window, "window name")?;

        let shell = window_root
            .filter(|dir| !dir.is_empty() && *dir != root)
            .map(cd_and_exec_shell);
        self.run_assembly_step(&TmuxCommand::new_session(
            name,
            root,
            window,
            shell.as_deref(),
        ))
    }

    fn new_window(
        &self,
        name: &str,
        root: &str,
        window: &str,
        window_root: Option<&str>,
    ) -> Result<()> {
        require(name, "session name")?;
        require(window, "window name")?;

        let dir = window_root.filter(|dir| !dir.is_empty()).unwrap_or(root);
        require(dir, "window root")?;
        self.run_assembly_step(&TmuxCommand::new_window(name, window, dir))
    }

    fn send_keys(&self, name: &str, window: &str, keys: &str) -> Result<()> {
        require(name, "session name")?;
        require(window, "window name")?;
        require(keys, "command")?;
        self.run_assembly_step(&TmuxCommand::send_keys(
            &window_target(name, window),
            keys,
        ))
    }

    fn select_window(&self, name: &str, window: &str) -> Result<()> {
        require(name, "session name")?;
        require(window, "window name")?;
        self.run_assembly_step(&TmuxCommand::select_window(&window_target(name, window)))
    }

    fn attach_session(&self, name: &str) -> Result<()> {
        require(name, "session name")?;
        self.run_dispatch(&TmuxCommand::attach_session(name))
    }

    fn switch_session(&self, name: &str) -> Result<()> {
        require(name, "session name")?;
        self.run_dispatch(&TmuxCommand::switch_client(name))
    }

    fn list_sessions(&self) -> Result<Vec<LiveSession>> {
        let cmd = TmuxCommand::list_sessions();
        let output = self
            .run(&cmd)
            .map_err(|e| Error::ListSessions(e.to_string()))?;

        if !output.success() {
            if NO_SERVER_MARKERS
                .iter()
                .any(|marker| output.stderr.contains(marker))
            {
                tracing::debug!("no tmux server running");
                return Ok(Vec::new());
            }
            return Err(Error::ListSessions(output.failure_reason()));
        }

        output
            .stdout
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| SessionName::new(line).map(LiveSession::new))
            .collect()
    }

    fn kill_session(&self, name: &str) -> Result<()> {
        require(name, "session name")?;
        let cmd = TmuxCommand::kill_session(name);
        let output = self
            .run(&cmd)
            .map_err(|e| Error::KillSession(e.to_string()))?;
        if !output.success() {
            return Err(Error::KillSession(format!(
                "{}: {}",
                name,
                output.failure_reason()
            )));
        }
        Ok(())
    }
}
