//! Error types for the folder watch coordinator.

use std::io;
use std::path::PathBuf;

use racewatch_player::PlayerError;
use thiserror::Error;

/// Errors raised while watching the folder and acting on its events.
#[derive(Error, Debug)]
pub enum WatchError {
    /// The OS watch subscription failed. Fatal at startup.
    #[error("Filesystem watch failed: {0}")]
    Watch(#[from] notify::Error),

    /// A rename into the next race slot failed.
    ///
    /// Local to the event that triggered it; the watch loop carries on.
    #[error("Failed to rename {} to {}: {source}", .from.display(), .to.display())]
    Rename {
        /// The path that was being renamed.
        from: PathBuf,
        /// The rename target.
        to: PathBuf,
        /// The underlying filesystem error.
        #[source]
        source: io::Error,
    },

    /// A player command issued for this event failed.
    #[error(transparent)]
    Player(#[from] PlayerError),
}

/// Convenience Result type alias for watch operations.
pub type Result<T> = std::result::Result<T, WatchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rename_error_display() {
        let error = WatchError::Rename {
            from: PathBuf::from("/v/clip.mp4"),
            to: PathBuf::from("/v/race 01.mp4"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only"),
        };
        let display = format!("{error}");
        assert!(display.contains("/v/clip.mp4"));
        assert!(display.contains("/v/race 01.mp4"));
        assert!(display.contains("read-only"));
    }

    #[test]
    fn test_player_error_passes_through() {
        let error: WatchError = PlayerError::NotConnected.into();
        assert_eq!(format!("{error}"), "Not connected to player");
    }
}
