//! The orchestrator that ties the tree walk, naming, and window manager
//! together.
//!
//! [`Renamer`] reacts to [`WindowEvent`]s by recomputing every workspace
//! label from a fresh snapshot and sending one batched rename command to the
//! [`WindowManager`].  Nothing is cached between passes.

use crate::command::{batch, RenameDirective, WindowEvent};
use crate::config::Config;
use crate::naming::{build_label, resolve};
use crate::traits::WindowManager;
use crate::tree::find_workspaces;
use log::{debug, error, info};
use std::collections::HashMap;
use std::sync::mpsc;

/// Name of i3's hidden scratchpad workspace, which is never renamed.
pub const SCRATCH_WORKSPACE: &str = "__i3_scratch";

/// Possible errors from a rename pass.
#[derive(Debug, thiserror::Error)]
pub enum RenameError {
    /// The window manager returned an error.
    #[error("window manager error: {0}")]
    WindowManager(String),

    /// A workspace in the tree is missing from the workspace list.
    #[error("workspace {name} not found in workspace map")]
    MissingWorkspaceNumber { name: String },
}

/// Recomputes workspace labels on demand.
///
/// The renamer is generic over any [`WindowManager`] implementation, making
/// it independent of i3 or any other concrete backend.
///
/// # Typical usage
///
/// ```ignore
/// let renamer = Renamer::new(I3Wm::from_env()?, Config::default());
/// renamer.rename()?;
/// ```
pub struct Renamer<W: WindowManager> {
    wm: W,
    config: Config,
}

impl<W: WindowManager> Renamer<W> {
    pub fn new(wm: W, config: Config) -> Self {
        Self { wm, config }
    }

    /// Compute the rename directives for the current layout without sending
    /// anything.
    ///
    /// Fails without returning any directive if the window manager cannot be
    /// queried or a workspace has no number.
    pub fn plan(&self) -> Result<Vec<RenameDirective>, RenameError> {
        let numbers: HashMap<i64, i64> = self
            .wm
            .workspaces()
            .map_err(|e| RenameError::WindowManager(e.to_string()))?
            .into_iter()
            .map(|ws| (ws.id, ws.num))
            .collect();

        let tree = self
            .wm
            .tree()
            .map_err(|e| RenameError::WindowManager(e.to_string()))?;

        let mut directives = Vec::new();
        for summary in find_workspaces(&tree) {
            let old_name = summary.workspace.name();
            if old_name == SCRATCH_WORKSPACE {
                continue;
            }
            let num = *numbers.get(&summary.workspace.id).ok_or_else(|| {
                RenameError::MissingWorkspaceNumber {
                    name: old_name.to_string(),
                }
            })?;

            let names: Vec<&str> = summary
                .windows
                .iter()
                .map(|w| resolve(w.window_class(), &self.config.app_names))
                .collect();
            let new_name = build_label(num, &names, &self.config.separator, self.config.unique);
            debug!("workspace {:?} -> {:?}", old_name, new_name);
            directives.push(RenameDirective::new(old_name, new_name));
        }
        Ok(directives)
    }

    /// Run one full rename pass.
    ///
    /// Returns the command that was sent, or `None` if there was nothing to
    /// rename.
    pub fn rename(&self) -> Result<Option<String>, RenameError> {
        let directives = self.plan()?;
        let Some(command) = batch(&directives) else {
            debug!("no workspaces to rename");
            return Ok(None);
        };
        debug!("running {}", command);
        self.wm
            .run_command(&command)
            .map_err(|e| RenameError::WindowManager(format!("failed to run command: {}", e)))?;
        Ok(Some(command))
    }

    /// Process a single [`WindowEvent`].
    ///
    /// Returns `Ok(None)` for change kinds that cannot affect labels.
    pub fn handle(&self, event: &WindowEvent) -> Result<Option<String>, RenameError> {
        if !event.change.triggers_rename() {
            debug!("ignoring window event {}", event.change);
            return Ok(None);
        }
        debug!("window event {}, renaming", event.change);
        self.rename()
    }

    /// Handle events one at a time until every sender has been dropped.
    ///
    /// A failed pass is logged and the loop moves on to the next event.
    pub fn run(&self, events: mpsc::Receiver<WindowEvent>) {
        for event in events {
            if let Err(e) = self.handle(&event) {
                error!("failed to rename workspaces: {}", e);
            }
        }
        info!("event source closed, exiting");
    }
}
