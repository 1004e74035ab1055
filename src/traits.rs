//! Core traits that decouple wsnamer from any specific window manager or
//! transport mechanism.
//!
//! Every concrete backend (i3 IPC, a test harness, …) implements one of
//! these traits.  The [`Renamer`](crate::renamer::Renamer) only depends on
//! these abstractions.

use crate::command::{WindowEvent, WorkspaceInfo};
use crate::tree::Node;
use std::sync::mpsc;

/// Abstraction over a window manager that can describe its layout and run
/// commands.
///
/// An implementation might talk to i3 or sway via IPC, or it might be a
/// recording stub used in tests.
pub trait WindowManager {
    /// The error type produced by this window manager.
    type Error: std::error::Error + Send + 'static;

    /// Return every workspace with its id and number.
    fn workspaces(&self) -> Result<Vec<WorkspaceInfo>, Self::Error>;

    /// Return a snapshot of the full layout tree.
    fn tree(&self) -> Result<Node, Self::Error>;

    /// Run a (possibly `; `-separated) command string.
    ///
    /// Fails if the command could not be delivered or if the window manager
    /// rejected any part of it.
    fn run_command(&self, command: &str) -> Result<(), Self::Error>;
}

/// A source of [`WindowEvent`]s.
///
/// # Contract
///
/// * [`run`](EventSource::run) **blocks** until the subscription ends or an
///   unrecoverable error occurs.
/// * Each received event is sent through `sink` exactly once, in arrival
///   order.
/// * Implementations must be [`Send`] so they can run on a dedicated thread.
pub trait EventSource: Send {
    /// The error type produced by this source.
    type Error: std::error::Error + Send + 'static;

    /// Subscribe and forward every window event into `sink`.
    fn run(&mut self, sink: mpsc::Sender<WindowEvent>) -> Result<(), Self::Error>;
}
