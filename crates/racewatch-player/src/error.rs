//! Error types for the player control channel.

use std::io;

use thiserror::Error;

/// Errors raised by the control-socket client and the process launcher.
#[derive(Error, Debug)]
pub enum PlayerError {
    /// The connect retry budget was exhausted without reaching the player.
    ///
    /// Transient failures during the retry window are expected pre-success
    /// noise and are never surfaced individually; only exhaustion is.
    #[error("Could not connect to player RC interface after {attempts} attempts")]
    Connect {
        /// How many attempts were made before giving up.
        attempts: u32,
    },

    /// A command was issued while the client was disconnected.
    #[error("Not connected to player")]
    NotConnected,

    /// A transport-level failure while writing a command.
    #[error("Failed to send command to player: {0}")]
    Write(#[source] io::Error),

    /// The player process could not be spawned.
    ///
    /// Callers log this and carry on; the player simply never becomes
    /// reachable and the connect retry exhausts its budget.
    #[error("Failed to start player process: {0}")]
    Spawn(#[source] io::Error),

    /// Connection retry was cancelled by shutdown.
    #[error("Connection retry cancelled")]
    Cancelled,

    /// I/O error passthrough (socket shutdown, close).
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Convenience Result type alias for player operations.
pub type Result<T> = std::result::Result<T, PlayerError>;
