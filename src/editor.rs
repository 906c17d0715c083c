//! Editor invocation.

use crate::exec::CommandExecutor;
use crate::{Error, Result};
use std::path::Path;

/// Opens a file for the user to edit.
pub trait EditorLauncher {
    /// Block until the editor exits.
    fn edit(&self, path: &Path) -> Result<()>;
}

impl<T: EditorLauncher + ?Sized> EditorLauncher for &T {
    fn edit(&self, path: &Path) -> Result<()> {
        (**self).edit(path)
    }
}

/// Runs `<editor> <path>` in the foreground.
///
/// The editor value may carry arguments (`code --wait`); it is split on
/// whitespace.
#[derive(Debug, Clone)]
pub struct ShellEditor<E: CommandExecutor> {
    executor: E,
    editor: String,
}

impl<E: CommandExecutor> ShellEditor<E> {
    pub fn new(executor: E, editor: impl Into<String>) -> Self {
        Self {
            executor,
            editor: editor.into(),
        }
    }
}

impl<E: CommandExecutor> EditorLauncher for ShellEditor<E> {
    fn edit(&self, path: &Path) -> Result<()> {
        let mut parts = self.editor.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| Error::Config("editor command is empty".to_string()))?;
        let mut args: Vec<String> = parts.map(str::to_string).collect();
        args.push(path.to_string_lossy().into_owned());

        match self.executor.execute_interactive(program, &args)? {
            Some(0) => Ok(()),
            Some(code) => Err(Error::Editor(format!(
                "{} exited with status {}",
                program, code
            ))),
            None => Err(Error::Editor(format!("{} terminated by signal", program))),
        }
    }
}
