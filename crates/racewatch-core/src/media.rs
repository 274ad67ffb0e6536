//! Media path classification.
//!
//! Every path observed by the watcher falls into exactly one category:
//! image, race video (already named `race NN.<ext>`), generic video, or
//! other. Classification is purely textual - patterns are applied to the
//! full path, case-insensitively, and require a path separator before the
//! file name.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use regex::Regex;

/// Video extensions recognized by the watcher.
pub const VIDEO_EXTENSIONS: [&str; 10] = [
    "mp4", "mkv", "avi", "mov", "wmv", "flv", "webm", "mpg", "mpeg", "3gp",
];

/// Image extensions recognized by the watcher (banner candidates).
pub const IMAGE_EXTENSIONS: [&str; 7] = ["jpg", "jpeg", "png", "bmp", "gif", "tiff", "webp"];

/// How a path is classified. Categories are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaKind {
    /// An image file - a banner candidate.
    Image,
    /// A video already named `race NN.<ext>`; carries the parsed race number.
    RaceVideo(u32),
    /// A video file that does not follow the race naming scheme.
    Video,
    /// Neither an image nor a video; ignored.
    Other,
}

fn race_video_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(r"(?i)[\\/]race (\d{{2}})\.({})$", VIDEO_EXTENSIONS.join("|"));
        Regex::new(&pattern).ok()
    })
    .as_ref()
}

fn video_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(r"(?i)[\\/].+\.({})$", VIDEO_EXTENSIONS.join("|"));
        Regex::new(&pattern).ok()
    })
    .as_ref()
}

fn image_re() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        let pattern = format!(r"(?i)[\\/].+\.({})$", IMAGE_EXTENSIONS.join("|"));
        Regex::new(&pattern).ok()
    })
    .as_ref()
}

/// Classifies a path into exactly one [`MediaKind`].
///
/// The race pattern is checked before the generic video pattern so that a
/// conforming file is never treated as a rename candidate again. Image and
/// video extension sets are disjoint, so a path can never match both.
pub fn classify(path: &Path) -> MediaKind {
    let text = path.to_string_lossy();

    if let Some(number) = race_video_re()
        .and_then(|re| re.captures(&text))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
    {
        return MediaKind::RaceVideo(number);
    }

    if video_re().is_some_and(|re| re.is_match(&text)) {
        return MediaKind::Video;
    }

    if image_re().is_some_and(|re| re.is_match(&text)) {
        return MediaKind::Image;
    }

    MediaKind::Other
}

/// Extracts the race number from a `race NN.<ext>` path, if it has one.
pub fn race_number(path: &Path) -> Option<u32> {
    match classify(path) {
        MediaKind::RaceVideo(number) => Some(number),
        _ => None,
    }
}

/// Builds the canonical file name for a race slot, e.g. `race 01.mp4`.
///
/// The number is zero-padded to two digits; the extension is kept exactly
/// as found on the source file.
pub fn race_file_name(number: u32, extension: &str) -> String {
    format!("race {number:02}.{extension}")
}

/// Computes the rename target for `path` in its own directory.
///
/// Returns `None` when the path has no extension to carry over.
pub fn rename_target(path: &Path, number: u32) -> Option<PathBuf> {
    let extension = path.extension()?.to_str()?;
    let parent = path.parent()?;
    Some(parent.join(race_file_name(number, extension)))
}
