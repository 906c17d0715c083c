//! Common test utilities for hopper integration tests.
//!
//! Provides `TestEnv` for isolated test environments that don't touch the
//! user's `~/.config/hopper/` directory or their tmux server.

#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
pub use tempfile::TempDir;

/// Stand-in for tmux. Logs each invocation as `[arg][arg]...` and answers
/// `has-session` / `list-sessions` from environment variables.
const FAKE_TMUX: &str = r#"#!/bin/sh
line=""
for arg in "$@"; do
  line="$line[$arg]"
done
printf '%s\n' "$line" >> "$FAKE_TMUX_LOG"
case "$1" in
  has-session)
    exit "${FAKE_HAS_SESSION:-1}"
    ;;
  list-sessions)
    if [ -z "$FAKE_SESSIONS" ]; then
      echo "no server running on /tmp/tmux-fake/default" >&2
      exit 1
    fi
    for s in $FAKE_SESSIONS; do
      printf '%s\n' "$s"
    done
    ;;
  attach-session|switch-client)
    exit "${FAKE_ATTACH_EXIT:-0}"
    ;;
esac
exit 0
"#;

/// Stand-in for fzf. Records its input and prints `$FAKE_FZF_CHOICE`.
const FAKE_FZF: &str = r#"#!/bin/sh
cat > "$FAKE_FZF_INPUT"
if [ -n "$FAKE_FZF_CANCEL" ]; then
  exit 130
fi
printf '%s\n' "$FAKE_FZF_CHOICE"
"#;

/// Stand-in for an editor. Records the path and optionally overwrites it.
const FAKE_EDITOR: &str = r#"#!/bin/sh
printf '%s\n' "$1" > "$FAKE_EDITOR_LOG"
if [ -n "$FAKE_EDITOR_CONTENT" ]; then
  printf '%s' "$FAKE_EDITOR_CONTENT" > "$1"
fi
exit "${FAKE_EDITOR_EXIT:-0}"
"#;

/// A test environment with isolated config and fake external programs.
///
/// - `config_dir`: passed as `HOP_CONFIG_DIR`
/// - `work_dir`: the working directory of every `hop` invocation
/// - `bin_dir`: fake `tmux`, `fzf` and `editor` scripts plus their logs
pub struct TestEnv {
    pub config_dir: TempDir,
    pub work_dir: TempDir,
    pub bin_dir: TempDir,
}

fn install_script(dir: &Path, name: &str, body: &str) {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    let mut perms = fs::metadata(&path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(&path, perms).unwrap();
}

impl TestEnv {
    pub fn new() -> Self {
        let env = Self {
            config_dir: TempDir::new().unwrap(),
            work_dir: TempDir::new().unwrap(),
            bin_dir: TempDir::new().unwrap(),
        };
        install_script(env.bin_dir.path(), "tmux", FAKE_TMUX);
        install_script(env.bin_dir.path(), "fzf", FAKE_FZF);
        install_script(env.bin_dir.path(), "editor", FAKE_EDITOR);
        env
    }

    /// Get a Command for the hop binary wired to the fakes.
    ///
    /// Runs outside tmux unless the test sets `TMUX` itself.
    pub fn hop(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_hop"));
        cmd.current_dir(self.work_dir.path());
        cmd.env("HOP_CONFIG_DIR", self.config_dir.path());
        cmd.env("HOP_TMUX", self.bin("tmux"));
        cmd.env("HOP_SELECTOR", self.bin("fzf"));
        cmd.env("FAKE_TMUX_LOG", self.bin("tmux.log"));
        cmd.env("FAKE_FZF_INPUT", self.bin("fzf.input"));
        cmd.env("FAKE_EDITOR_LOG", self.bin("editor.log"));
        cmd.env_remove("TMUX");
        cmd.env_remove("EDITOR");
        cmd.env_remove("HOP_LOG");
        cmd
    }

    pub fn bin(&self, name: &str) -> PathBuf {
        self.bin_dir.path().join(name)
    }

    pub fn config_path(&self) -> &Path {
        self.config_dir.path()
    }

    pub fn work_path(&self) -> &Path {
        self.work_dir.path()
    }

    /// Store a template file by hand under `uuid`.
    pub fn write_template(&self, uuid: &str, yaml: &str) -> PathBuf {
        let dir = self.config_dir.path().join("templates").join(uuid);
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("template.yaml");
        fs::write(&path, yaml).unwrap();
        path
    }

    /// Every fake tmux invocation so far, one `[arg][arg]...` line each.
    pub fn tmux_calls(&self) -> Vec<String> {
        fs::read_to_string(self.bin("tmux.log"))
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Lines the fake fzf received on stdin.
    pub fn fzf_input(&self) -> Vec<String> {
        fs::read_to_string(self.bin("fzf.input"))
            .map(|text| text.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn editor_log(&self) -> Option<String> {
        fs::read_to_string(self.bin("editor.log"))
            .ok()
            .map(|s| s.trim_end().to_string())
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}
