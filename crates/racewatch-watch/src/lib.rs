//! Racewatch Watch - Folder watch coordinator
//!
//! This crate turns OS file notifications into playlist actions:
//!
//! - `events` - the add/remove event model and the notify mapping
//! - `watcher` - the OS watcher bridged into a tokio channel
//! - `coordinator` - the single-consumer loop that classifies each added
//!   path and either forwards it to the player or renames it into the
//!   next race slot
//!
//! All production code follows the panic-free policy: no `.unwrap()`,
//! `.expect()`, `panic!()`, `unreachable!()`, or `todo!()`.

pub mod coordinator;
pub mod error;
pub mod events;
pub mod watcher;

// Re-exports for convenience
pub use coordinator::Coordinator;
pub use error::{Result, WatchError};
pub use events::{FsEvent, FsEventKind};
pub use watcher::FolderWatcher;
