//! Attach dispatch.

use crate::Result;
use crate::models::SessionName;
use crate::session::Multiplexer;

/// How the caller's terminal gets bound to a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttachCommand {
    /// Caller is already a tmux client: move that client over.
    SwitchClient(SessionName),
    /// Caller is a plain terminal: attach it.
    Attach(SessionName),
}

impl AttachCommand {
    pub fn for_caller(name: SessionName, inside_multiplexer: bool) -> Self {
        if inside_multiplexer {
            AttachCommand::SwitchClient(name)
        } else {
            AttachCommand::Attach(name)
        }
    }

    /// Run the command, blocking until the user detaches.
    pub fn run<M: Multiplexer>(&self, mux: &M) -> Result<()> {
        match self {
            AttachCommand::SwitchClient(name) => {
                tracing::info!(session = %name, "switching client");
                mux.switch_session(name.as_str())
            }
            AttachCommand::Attach(name) => {
                tracing::info!(session = %name, "attaching");
                mux.attach_session(name.as_str())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::fake::{FakeMux, MuxCall};

    #[test]
    fn test_inside_switches() {
        let mux = FakeMux::new();
        let name = SessionName::new("foo").unwrap();
        AttachCommand::for_caller(name, true).run(&mux).unwrap();
        assert_eq!(mux.calls(), vec![MuxCall::Switch("foo".to_string())]);
    }

    #[test]
    fn test_outside_attaches() {
        let mux = FakeMux::new();
        let name = SessionName::new("foo").unwrap();
        AttachCommand::for_caller(name, false).run(&mux).unwrap();
        assert_eq!(mux.calls(), vec![MuxCall::Attach("foo".to_string())]);
    }
}
