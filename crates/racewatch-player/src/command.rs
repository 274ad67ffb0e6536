//! Typed remote-control command vocabulary.
//!
//! The player's RC interface accepts plain-text, newline-terminated
//! commands. Modeling them as an enum keeps the wire strings in one place
//! and testable without a socket; the client appends the trailing newline
//! when sending.

use std::fmt;
use std::path::PathBuf;

/// Volume delta applied by [`RcCommand::VolumeUp`] and [`RcCommand::VolumeDown`].
pub const VOLUME_STEP: u32 = 10;

/// Commands understood by the player's remote-control interface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RcCommand {
    /// Start or resume playback.
    Play,
    /// Pause playback.
    Pause,
    /// Stop playback.
    Stop,
    /// Skip to the next playlist entry.
    Next,
    /// Go back to the previous playlist entry.
    Previous,
    /// Append a file to the playlist.
    Add(PathBuf),
    /// Remove the playlist entry at the given index.
    Remove(usize),
    /// Clear the playlist.
    Clear,
    /// Print the playlist.
    ShowPlaylist,
    /// Raise the volume by [`VOLUME_STEP`].
    VolumeUp,
    /// Lower the volume by [`VOLUME_STEP`].
    VolumeDown,
    /// Mute audio.
    Mute,
    /// Unmute audio.
    Unmute,
    /// Set the volume to an absolute level.
    SetVolume(u32),
    /// Toggle fullscreen.
    Fullscreen,
    /// Loop the playlist.
    Loop,
}

impl fmt::Display for RcCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RcCommand::Play => f.write_str("play"),
            RcCommand::Pause => f.write_str("pause"),
            RcCommand::Stop => f.write_str("stop"),
            RcCommand::Next => f.write_str("next"),
            RcCommand::Previous => f.write_str("prev"),
            RcCommand::Add(path) => write!(f, "add {}", path.display()),
            RcCommand::Remove(index) => write!(f, "del {index}"),
            RcCommand::Clear => f.write_str("clear"),
            RcCommand::ShowPlaylist => f.write_str("playlist"),
            RcCommand::VolumeUp => write!(f, "volup {VOLUME_STEP}"),
            RcCommand::VolumeDown => write!(f, "voldown {VOLUME_STEP}"),
            RcCommand::Mute => f.write_str("mute"),
            RcCommand::Unmute => f.write_str("unmute"),
            RcCommand::SetVolume(level) => write!(f, "volume {level}"),
            RcCommand::Fullscreen => f.write_str("fullscreen"),
            RcCommand::Loop => f.write_str("loop"),
        }
    }
}
