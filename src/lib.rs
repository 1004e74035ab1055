//! **wsnamer**: names workspaces after the applications running in them.
//!
//! Every time a window is opened, closed, moved or retitled, each workspace
//! is renamed to `"<num>: <app><sep><app>..."`, listing the window classes
//! found in it (optionally mapped to friendlier names and deduplicated).
//!
//! # Architecture
//!
//! The crate is organised around two core traits:
//!
//! * [`traits::WindowManager`]: abstracts the layout queries and the
//!   command channel so the renaming logic is not coupled to any specific
//!   window manager.
//! * [`traits::EventSource`]: abstracts the event subscription so the main
//!   loop is not coupled to any specific transport.
//!
//! The renaming pipeline itself is [`tree`] (find workspaces and windows),
//! [`naming`] (resolve and join names) and [`command`] (build the batched
//! rename command), driven by [`renamer::Renamer`].  Concrete i3 IPC
//! implementations live in [`i3`].

pub mod command;
pub mod config;
pub mod i3;
pub mod naming;
pub mod renamer;
pub mod traits;
pub mod tree;
