//! Commands and types used throughout wsnamer.
//!
//! This module defines the vocabulary that all components share:
//! [`WindowEvent`] describes what the window manager tells us,
//! [`WorkspaceInfo`] what it reports about workspaces, and
//! [`RenameDirective`] / [`batch`] what we send back.

use serde::Deserialize;
use std::fmt;

/// What happened to a window, from the `change` field of a window event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WindowChange {
    New,
    Close,
    Focus,
    Title,
    FullscreenMode,
    Move,
    Floating,
    Urgent,
    Mark,
    /// Any change kind this crate does not know about.
    #[serde(other)]
    Other,
}

impl WindowChange {
    /// Whether this change can alter the set or order of windows on a
    /// workspace, and therefore its label.
    pub fn triggers_rename(self) -> bool {
        match self {
            WindowChange::New | WindowChange::Close | WindowChange::Title | WindowChange::Move => {
                true
            }
            WindowChange::Focus
            | WindowChange::FullscreenMode
            | WindowChange::Floating
            | WindowChange::Urgent
            | WindowChange::Mark
            | WindowChange::Other => false,
        }
    }
}

impl fmt::Display for WindowChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowChange::New => write!(f, "new"),
            WindowChange::Close => write!(f, "close"),
            WindowChange::Focus => write!(f, "focus"),
            WindowChange::Title => write!(f, "title"),
            WindowChange::FullscreenMode => write!(f, "fullscreen_mode"),
            WindowChange::Move => write!(f, "move"),
            WindowChange::Floating => write!(f, "floating"),
            WindowChange::Urgent => write!(f, "urgent"),
            WindowChange::Mark => write!(f, "mark"),
            WindowChange::Other => write!(f, "other"),
        }
    }
}

/// A window event as delivered by the event subscription.
///
/// Only the change kind is kept; the container snapshot that comes with it
/// is ignored because every pass fetches a fresh tree anyway.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WindowEvent {
    pub change: WindowChange,
}

/// Subset of one entry of the `GET_WORKSPACES` reply.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WorkspaceInfo {
    /// Container id, matching the workspace node's `id` in the tree.
    pub id: i64,
    /// Workspace number, `-1` for workspaces without a numeric prefix.
    pub num: i64,
    pub name: String,
}

/// One `rename workspace` instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameDirective {
    pub old_name: String,
    pub new_name: String,
}

impl RenameDirective {
    pub fn new(old_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        Self {
            old_name: old_name.into(),
            new_name: new_name.into(),
        }
    }
}

impl fmt::Display for RenameDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&build_rename_command(&self.old_name, &self.new_name))
    }
}

fn escape_quotes(s: &str) -> String {
    s.replace('"', "\\\"")
}

/// Build `rename workspace "<old>" to "<new>"`, escaping double quotes in
/// both names.
pub fn build_rename_command(old_name: &str, new_name: &str) -> String {
    format!(
        "rename workspace \"{}\" to \"{}\"",
        escape_quotes(old_name),
        escape_quotes(new_name)
    )
}

/// Join directives into a single `; `-separated command.
///
/// Returns `None` when there is nothing to rename, so that no command is
/// sent at all.
pub fn batch(directives: &[RenameDirective]) -> Option<String> {
    if directives.is_empty() {
        return None;
    }
    Some(
        directives
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; "),
    )
}
