//! Tmux command generation.
//!
//! This module provides a builder for the tmux invocations hopper makes.
//! It does not execute anything; [`TmuxClient`](super::client::TmuxClient)
//! runs the argument vectors through a command executor.

/// Builder for tmux argument vectors.
///
/// The tmux binary itself is not part of the arguments; it is configurable
/// and supplied by the client at execution time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TmuxCommand {
    args: Vec<String>,
}

impl TmuxCommand {
    fn new(command: &str) -> Self {
        Self {
            args: vec![command.to_string()],
        }
    }

    fn flag(mut self, flag: &str) -> Self {
        self.args.push(flag.to_string());
        self
    }

    fn flag_with_value(mut self, flag: &str, value: &str) -> Self {
        self.args.push(flag.to_string());
        self.args.push(value.to_string());
        self
    }

    fn arg(mut self, arg: &str) -> Self {
        self.args.push(arg.to_string());
        self
    }

    /// Render the command as a single line, for logs and error messages.
    pub fn build(&self) -> String {
        format!("tmux {}", self.args.join(" "))
    }

    /// Get the arguments as a slice for execution.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Check whether a session exists.
    ///
    /// # Example
    /// ```
    /// use hopper::tmux::command::TmuxCommand;
    /// let cmd = TmuxCommand::has_session("my-session");
    /// assert_eq!(cmd.build(), "tmux has-session -t my-session");
    /// ```
    pub fn has_session(session_name: &str) -> Self {
        Self::new("has-session").flag_with_value("-t", session_name)
    }

    /// Create a detached session whose first window is `window_name`.
    ///
    /// # Arguments
    /// * `session_name` - Name of the session to create
    /// * `start_directory` - Working directory of the session
    /// * `window_name` - Name of the first window
    /// * `shell_command` - Optional command the first window runs instead of
    ///   the default shell
    ///
    /// # Example
    /// ```
    /// use hopper::tmux::command::TmuxCommand;
    /// let cmd = TmuxCommand::new_session("foo", "/workspace", "main", None);
    /// assert_eq!(cmd.build(), "tmux new-session -d -s foo -c /workspace -n main");
    /// ```
    pub fn new_session(
        session_name: &str,
        start_directory: &str,
        window_name: &str,
        shell_command: Option<&str>,
    ) -> Self {
        let mut cmd = Self::new("new-session")
            .flag("-d")
            .flag_with_value("-s", session_name)
            .flag_with_value("-c", start_directory)
            .flag_with_value("-n", window_name);
        if let Some(shell) = shell_command {
            cmd = cmd.arg(shell);
        }
        cmd
    }

    /// Create a detached window in an existing session.
    ///
    /// # Example
    /// ```
    /// use hopper::tmux::command::TmuxCommand;
    /// let cmd = TmuxCommand::new_window("foo", "editor", "/workspace");
    /// assert_eq!(cmd.build(), "tmux new-window -d -t foo -n editor -c /workspace");
    /// ```
    pub fn new_window(session_name: &str, window_name: &str, start_directory: &str) -> Self {
        Self::new("new-window")
            .flag("-d")
            .flag_with_value("-t", session_name)
            .flag_with_value("-n", window_name)
            .flag_with_value("-c", start_directory)
    }

    /// Type `keys` into a window and press Enter.
    ///
    /// # Example
    /// ```
    /// use hopper::tmux::command::TmuxCommand;
    /// let cmd = TmuxCommand::send_keys("foo:main", "echo hello");
    /// assert_eq!(cmd.build(), "tmux send-keys -t foo:main echo hello Enter");
    /// ```
    pub fn send_keys(target: &str, keys: &str) -> Self {
        Self::new("send-keys")
            .flag_with_value("-t", target)
            .arg(keys)
            .arg("Enter")
    }

    /// Select a window.
    ///
    /// # Example
    /// ```
    /// use hopper::tmux::command::TmuxCommand;
    /// let cmd = TmuxCommand::select_window("foo:baz");
    /// assert_eq!(cmd.build(), "tmux select-window -t foo:baz");
    /// ```
    pub fn select_window(target: &str) -> Self {
        Self::new("select-window").flag_with_value("-t", target)
    }

    /// Attach the current terminal to a session.
    pub fn attach_session(session_name: &str) -> Self {
        Self::new("attach-session").flag_with_value("-t", session_name)
    }

    /// Switch the current tmux client to another session.
    pub fn switch_client(session_name: &str) -> Self {
        Self::new("switch-client").flag_with_value("-t", session_name)
    }

    /// List the names of all running sessions, one per line.
    pub fn list_sessions() -> Self {
        Self::new("list-sessions").flag_with_value("-F", "#{session_name}")
    }

    /// Kill a session.
    pub fn kill_session(session_name: &str) -> Self {
        Self::new("kill-session").flag_with_value("-t", session_name)
    }
}

/// Target string addressing a window of a session.
pub fn window_target(session_name: &str, window_name: &str) -> String {
    format!("{}:{}", session_name, window_name)
}

/// Shell command that moves into `dir` and replaces itself with the user's
/// shell. The directory is single-quoted.
pub fn cd_and_exec_shell(dir: &str) -> String {
    format!("cd {} && exec $SHELL", shell_quote(dir))
}

fn shell_quote(value: &str) -> String {
    format!("'{}'", value.replace('\'', r"'\''"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_has_session() {
        let cmd = TmuxCommand::has_session("foo");
        assert_eq!(cmd.args(), ["has-session", "-t", "foo"]);
    }

    #[test]
    fn test_new_session_minimal() {
        let cmd = TmuxCommand::new_session("foo", "/home/test", "main", None);
        assert_eq!(
            cmd.args(),
            ["new-session", "-d", "-s", "foo", "-c", "/home/test", "-n", "main"]
        );
    }

    #[test]
    fn test_new_session_with_shell_command() {
        let shell = cd_and_exec_shell("/project");
        let cmd = TmuxCommand::new_session("foo", "/home/test", "main", Some(&shell));
        assert_eq!(
            cmd.build(),
            "tmux new-session -d -s foo -c /home/test -n main cd '/project' && exec $SHELL"
        );
        assert_eq!(cmd.args().len(), 9);
    }

    #[test]
    fn test_new_window() {
        let cmd = TmuxCommand::new_window("foo", "baz", "/home/test");
        assert_eq!(
            cmd.args(),
            ["new-window", "-d", "-t", "foo", "-n", "baz", "-c", "/home/test"]
        );
    }

    #[test]
    fn test_send_keys_keeps_text_as_one_argument() {
        let cmd = TmuxCommand::send_keys("foo:main", "echo hello && ls");
        assert_eq!(
            cmd.args(),
            ["send-keys", "-t", "foo:main", "echo hello && ls", "Enter"]
        );
    }

    #[test]
    fn test_select_window() {
        let cmd = TmuxCommand::select_window(&window_target("foo", "baz"));
        assert_eq!(cmd.build(), "tmux select-window -t foo:baz");
    }

    #[test]
    fn test_attach_and_switch() {
        assert_eq!(
            TmuxCommand::attach_session("foo").build(),
            "tmux attach-session -t foo"
        );
        assert_eq!(
            TmuxCommand::switch_client("foo").build(),
            "tmux switch-client -t foo"
        );
    }

    #[test]
    fn test_list_sessions_format() {
        let cmd = TmuxCommand::list_sessions();
        assert_eq!(cmd.args(), ["list-sessions", "-F", "#{session_name}"]);
    }

    #[test]
    fn test_kill_session() {
        assert_eq!(
            TmuxCommand::kill_session("foo").build(),
            "tmux kill-session -t foo"
        );
    }

    #[test]
    fn test_cd_and_exec_shell_quotes_path() {
        assert_eq!(cd_and_exec_shell("/my dir"), "cd '/my dir' && exec $SHELL");
        assert_eq!(
            cd_and_exec_shell("/it's"),
            r"cd '/it'\''s' && exec $SHELL"
        );
    }
}
