//! [`WindowManager`] implementation backed by i3 IPC.

use super::ipc::{socket_path, Connection, I3Error, MessageType};
use crate::command::WorkspaceInfo;
use crate::traits::WindowManager;
use crate::tree::Node;
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// i3-backed window manager.
///
/// No connection is held; each method call opens a short-lived IPC
/// connection, so a restarted i3 is picked up transparently.
#[derive(Debug, Clone)]
pub struct I3Wm {
    socket: PathBuf,
}

impl I3Wm {
    /// Use the socket at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            socket: path.as_ref().to_path_buf(),
        }
    }

    /// Use the socket of the running i3 (see [`socket_path`]).
    pub fn from_env() -> Result<Self, I3Error> {
        Ok(Self::new(socket_path()?))
    }

    /// The filesystem path of the socket.
    pub fn path(&self) -> &Path {
        &self.socket
    }

    fn query(&self, msg_type: MessageType, payload: &[u8]) -> Result<Vec<u8>, I3Error> {
        let mut conn = Connection::connect(&self.socket)?;
        conn.request(msg_type, payload)
    }
}

/// One entry of the `RUN_COMMAND` reply.
#[derive(Deserialize)]
struct CommandOutcome {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

impl WindowManager for I3Wm {
    type Error = I3Error;

    fn workspaces(&self) -> Result<Vec<WorkspaceInfo>, Self::Error> {
        let reply = self.query(MessageType::GetWorkspaces, b"")?;
        Ok(serde_json::from_slice(&reply)?)
    }

    fn tree(&self) -> Result<Node, Self::Error> {
        let reply = self.query(MessageType::GetTree, b"")?;
        Ok(serde_json::from_slice(&reply)?)
    }

    fn run_command(&self, command: &str) -> Result<(), Self::Error> {
        let reply = self.query(MessageType::RunCommand, command.as_bytes())?;
        let outcomes: Vec<CommandOutcome> = serde_json::from_slice(&reply)?;
        debug!("command produced {} result(s)", outcomes.len());
        let errors: Vec<String> = outcomes
            .into_iter()
            .filter(|o| !o.success)
            .map(|o| o.error.unwrap_or_else(|| "unknown error".into()))
            .collect();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(I3Error::Command(errors.join("; ")))
        }
    }
}
