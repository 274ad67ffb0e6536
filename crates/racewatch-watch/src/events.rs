//! Filesystem event model.
//!
//! The coordinator only cares about two things happening to a path: it
//! appeared, or it went away. Everything notify reports is folded into
//! that model here. Renames count on both sides - the old name is removed
//! and the new name added - so an in-place rename into the race naming
//! scheme reliably produces the add event the coordinator expects, even on
//! platforms that report renames as moves rather than creates.

use std::path::PathBuf;

use notify::event::{EventKind, ModifyKind, RenameMode};
use notify::Event;

/// What happened to a path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FsEventKind {
    /// The path appeared (created, or renamed to this name).
    Added,
    /// The path went away (removed, or renamed away from this name).
    Removed,
}

/// A single add/remove observation. Transient; not retained.
#[derive(Debug, Clone)]
pub struct FsEvent {
    /// The affected path as reported by the OS.
    pub path: PathBuf,

    /// What happened to it.
    pub kind: FsEventKind,
}

/// Folds a notify event into zero or more [`FsEvent`]s.
///
/// Access, data-modification, and catch-all kinds are discarded. A
/// coalesced rename (`RenameMode::Both`) carries `[from, to]` in its path
/// list and yields a removal followed by an addition.
pub fn convert(event: Event) -> Vec<FsEvent> {
    let kind = match event.kind {
        EventKind::Create(_) => FsEventKind::Added,
        EventKind::Remove(_) => FsEventKind::Removed,
        EventKind::Modify(ModifyKind::Name(RenameMode::To)) => FsEventKind::Added,
        EventKind::Modify(ModifyKind::Name(RenameMode::From)) => FsEventKind::Removed,
        EventKind::Modify(ModifyKind::Name(RenameMode::Both)) => {
            let mut paths = event.paths.into_iter();
            let mut out = Vec::new();
            if let Some(from) = paths.next() {
                out.push(FsEvent {
                    path: from,
                    kind: FsEventKind::Removed,
                });
            }
            if let Some(to) = paths.next() {
                out.push(FsEvent {
                    path: to,
                    kind: FsEventKind::Added,
                });
            }
            return out;
        }
        _ => return Vec::new(),
    };

    event
        .paths
        .into_iter()
        .map(|path| FsEvent { path, kind })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind, DataChange, RemoveKind};

    fn event(kind: EventKind, paths: &[&str]) -> Event {
        let mut e = Event::new(kind);
        for path in paths {
            e = e.add_path(PathBuf::from(path));
        }
        e
    }

    #[test]
    fn test_create_maps_to_added() {
        let converted = convert(event(EventKind::Create(CreateKind::File), &["/w/clip.mp4"]));

        assert_eq!(converted.len(), 1);
        assert_eq!(converted[0].kind, FsEventKind::Added);
        assert_eq!(converted[0].path, PathBuf::from("/w/clip.mp4"));
    }

    #[test]
    fn test_remove_maps_to_removed() {
        let converted = convert(event(EventKind::Remove(RemoveKind::File), &["/w/clip.mp4"]));

        assert_eq!(converted.len(), 1);
        assert_eq!(converted[0].kind, FsEventKind::Removed);
    }

    #[test]
    fn test_rename_to_maps_to_added() {
        let converted = convert(event(
            EventKind::Modify(ModifyKind::Name(RenameMode::To)),
            &["/w/race 01.mp4"],
        ));

        assert_eq!(converted.len(), 1);
        assert_eq!(converted[0].kind, FsEventKind::Added);
    }

    #[test]
    fn test_rename_from_maps_to_removed() {
        let converted = convert(event(
            EventKind::Modify(ModifyKind::Name(RenameMode::From)),
            &["/w/clip.mp4"],
        ));

        assert_eq!(converted.len(), 1);
        assert_eq!(converted[0].kind, FsEventKind::Removed);
    }

    #[test]
    fn test_coalesced_rename_yields_remove_then_add() {
        let converted = convert(event(
            EventKind::Modify(ModifyKind::Name(RenameMode::Both)),
            &["/w/clip.mp4", "/w/race 01.mp4"],
        ));

        assert_eq!(converted.len(), 2);
        assert_eq!(converted[0].kind, FsEventKind::Removed);
        assert_eq!(converted[0].path, PathBuf::from("/w/clip.mp4"));
        assert_eq!(converted[1].kind, FsEventKind::Added);
        assert_eq!(converted[1].path, PathBuf::from("/w/race 01.mp4"));
    }

    #[test]
    fn test_noise_kinds_are_discarded() {
        assert!(convert(event(
            EventKind::Access(AccessKind::Close(notify::event::AccessMode::Write)),
            &["/w/clip.mp4"],
        ))
        .is_empty());
        assert!(convert(event(
            EventKind::Modify(ModifyKind::Data(DataChange::Content)),
            &["/w/clip.mp4"],
        ))
        .is_empty());
        assert!(convert(event(EventKind::Any, &["/w/clip.mp4"])).is_empty());
    }
}
