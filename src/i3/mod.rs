//! i3-specific implementations.
//!
//! This module provides concrete backends for the
//! [`WindowManager`](crate::traits::WindowManager) and
//! [`EventSource`](crate::traits::EventSource) traits, powered by i3's IPC
//! socket.
//!
//! Nothing outside this module should reference i3's wire format directly.

pub mod events;
pub mod ipc;
pub mod wm;
