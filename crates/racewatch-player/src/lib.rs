//! Racewatch Player - Control-channel client for the media player
//!
//! This crate owns everything that talks to the external media player:
//!
//! - `command` - the typed remote-control command vocabulary
//! - `client` - the TCP control-socket client with bounded connect retry
//! - `launcher` - spawning the player process with its RC interface bound
//!
//! All production code follows the panic-free policy: no `.unwrap()`,
//! `.expect()`, `panic!()`, `unreachable!()`, or `todo!()`.

pub mod client;
pub mod command;
pub mod error;
pub mod launcher;

// Re-exports for convenience
pub use client::{PlayerClient, PlayerConfig};
pub use command::RcCommand;
pub use error::{PlayerError, Result};
pub use launcher::{PlayerExit, PlayerProcess};
