//! OS watcher bridged into a tokio channel.
//!
//! notify delivers events on its own thread; the callback converts them to
//! [`FsEvent`]s and forwards them into an unbounded channel the coordinator
//! consumes from. The `FolderWatcher` value keeps the OS subscription
//! alive; dropping it stops the stream.

use std::path::PathBuf;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{error, info};

use crate::error::Result;
use crate::events::{self, FsEvent};

/// Owns the OS-level watch subscription.
pub struct FolderWatcher {
    _watcher: RecommendedWatcher,
}

impl FolderWatcher {
    /// Starts watching the given paths recursively.
    ///
    /// Returns the watcher handle (keep it alive for as long as events are
    /// wanted) and the receiving end of the event stream. Watching runs
    /// until the handle is dropped or the process terminates; there is no
    /// explicit stop.
    pub fn spawn(paths: &[PathBuf]) -> Result<(Self, mpsc::UnboundedReceiver<FsEvent>)> {
        let (tx, rx) = mpsc::unbounded_channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: std::result::Result<Event, notify::Error>| match res {
                Ok(event) => {
                    for fs_event in events::convert(event) {
                        if tx.send(fs_event).is_err() {
                            // Receiver dropped during shutdown
                            return;
                        }
                    }
                }
                Err(e) => error!(error = %e, "Watch error"),
            },
            Config::default(),
        )?;

        for path in paths {
            watcher.watch(path, RecursiveMode::Recursive)?;
            info!(path = %path.display(), "Watching path");
        }

        Ok((Self { _watcher: watcher }, rx))
    }
}
