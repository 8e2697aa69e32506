//! # utilkit demos
//!
//! Configuration loading and a scripted editing session for the
//! `undo_trace` binary.
//!
//! ## Binaries
//!
//! - `undo_trace` - runs [`session::run`] under a [`TracingUndoManager`]
//!   and prints the recorded trace
//!
//! [`TracingUndoManager`]: utilkit_undo::TracingUndoManager

mod config;
pub mod session;

pub use config::{ConfigError, UtilConfig};

/// Demos library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
