//! Interactive selection.

use crate::exec::CommandExecutor;
use crate::{Error, Result};

/// Default fuzzy finder, looked up in PATH.
pub const DEFAULT_SELECTOR: &str = "fzf";

/// Exit status fzf uses when the user aborts with Esc or Ctrl-C.
const FZF_INTERRUPTED: i32 = 130;

/// Lets the user pick one label out of many.
pub trait Selector {
    /// Block until the user picks one of `items`.
    ///
    /// Returns the chosen label exactly as given, or [`Error::Cancelled`].
    fn select(&self, items: &[String], prompt: &str) -> Result<String>;
}

impl<T: Selector + ?Sized> Selector for &T {
    fn select(&self, items: &[String], prompt: &str) -> Result<String> {
        (**self).select(items, prompt)
    }
}

/// [`Selector`] that pipes labels into fzf.
#[derive(Debug, Clone)]
pub struct FzfSelector<E: CommandExecutor> {
    executor: E,
    program: String,
}

impl<E: CommandExecutor> FzfSelector<E> {
    pub fn new(executor: E, program: impl Into<String>) -> Self {
        Self {
            executor,
            program: program.into(),
        }
    }
}

impl<E: CommandExecutor> Selector for FzfSelector<E> {
    fn select(&self, items: &[String], prompt: &str) -> Result<String> {
        let args = vec!["--prompt".to_string(), prompt.to_string()];
        let mut input = items.join("\n");
        input.push('\n');

        let output = self
            .executor
            .execute_with_input(&self.program, &args, &input)?;

        match output.code {
            Some(0) => {}
            Some(FZF_INTERRUPTED) => return Err(Error::Cancelled),
            _ => {
                return Err(Error::Selector(format!(
                    "{} failed with {}",
                    self.program,
                    output.failure_reason()
                )));
            }
        }

        let choice = output.stdout.trim_end_matches(['\n', '\r']);
        if choice.is_empty() {
            return Err(Error::Cancelled);
        }
        tracing::debug!(choice, "selected");
        Ok(choice.to_string())
    }
}
