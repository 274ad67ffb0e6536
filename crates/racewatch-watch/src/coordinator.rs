//! The folder watch coordinator.
//!
//! A single consumer drains the event stream in arrival order and decides,
//! per added path:
//!
//! 1. no banner yet and the path is an image - it becomes the banner and
//!    goes on the playlist; nothing else happens for this event
//! 2. a video already named `race NN.<ext>` - recorded and added to the
//!    playlist
//! 3. any other video - renamed in place to the next free race slot; the
//!    rename produces a fresh add event for the new name, which case 2
//!    then picks up
//! 4. anything else - ignored
//!
//! Removals are logged and otherwise ignored; the player's playlist is
//! index-addressed and opaque from here, so there is nothing safe to
//! reconcile against.
//!
//! **Panic-Free Policy:** This module follows the project's panic-free
//! guidelines. No `.unwrap()`, `.expect()`, `panic!()`, `unreachable!()`,
//! or `todo!()`.

use std::fs;
use std::path::{Path, PathBuf};

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use racewatch_core::media::{self, MediaKind};
use racewatch_core::session::SessionState;
use racewatch_player::client::PlayerClient;

use crate::error::{Result, WatchError};
use crate::events::{FsEvent, FsEventKind};

/// Classifies filesystem events and drives the player accordingly.
///
/// Owns the session state and the injected player client for the lifetime
/// of the watch loop. Per-event failures (a rename that did not stick, a
/// command sent while the player was away) are logged and confined to the
/// event that raised them; the loop itself only ends on cancellation or
/// when the event stream closes.
pub struct Coordinator {
    state: SessionState,
    client: PlayerClient,
}

impl Coordinator {
    /// Creates a coordinator around a connected player client.
    #[must_use]
    pub fn new(client: PlayerClient) -> Self {
        Self {
            state: SessionState::new(),
            client,
        }
    }

    /// The accumulated session state.
    pub fn state(&self) -> &SessionState {
        &self.state
    }

    /// Runs the watch loop until cancellation or the stream closing.
    ///
    /// Returns the player client so the caller can disconnect it
    /// gracefully on shutdown.
    pub async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<FsEvent>,
        cancel_token: CancellationToken,
    ) -> PlayerClient {
        loop {
            tokio::select! {
                maybe_event = events.recv() => {
                    match maybe_event {
                        Some(event) => self.handle_event(event).await,
                        None => {
                            warn!("Event stream closed");
                            break;
                        }
                    }
                }
                _ = cancel_token.cancelled() => {
                    info!("Watch loop shutting down");
                    break;
                }
            }
        }

        self.client
    }

    /// Dispatches one event, confining any failure to it.
    pub async fn handle_event(&mut self, event: FsEvent) {
        match event.kind {
            FsEventKind::Added => {
                info!(path = %event.path.display(), "File added");
                if let Err(e) = self.handle_added(&event.path).await {
                    warn!(
                        path = %event.path.display(),
                        error = %e,
                        "Failed to handle added file"
                    );
                }
            }
            FsEventKind::Removed => self.handle_removed(&event.path),
        }
    }

    /// Applies the classification policy to an added path.
    pub async fn handle_added(&mut self, path: &Path) -> Result<()> {
        match media::classify(path) {
            MediaKind::Image => {
                if self.state.set_banner(path) {
                    info!(path = %path.display(), "Set banner");
                    self.client.add_to_playlist(path).await?;
                }
                Ok(())
            }
            MediaKind::RaceVideo(number) => {
                self.state.record_race_video(path.to_path_buf(), number);
                self.client.add_to_playlist(path).await?;
                Ok(())
            }
            MediaKind::Video => self.rename_into_next_slot(path),
            MediaKind::Other => Ok(()),
        }
    }

    /// Renames a non-conforming video to the next free race slot.
    ///
    /// The rename neither records the video nor touches the playlist; the
    /// add event it triggers for the new name does both via the race-video
    /// branch.
    fn rename_into_next_slot(&mut self, path: &Path) -> Result<()> {
        let Some(target) = self.next_free_target(path) else {
            debug!(path = %path.display(), "Video has no usable extension, skipping");
            return Ok(());
        };

        info!(
            from = %path.display(),
            to = %target.display(),
            "Renaming video into next race slot"
        );
        fs::rename(path, &target).map_err(|source| WatchError::Rename {
            from: path.to_path_buf(),
            to: target.clone(),
            source,
        })?;

        Ok(())
    }

    /// Claims slots until one maps to a target that is free on disk.
    ///
    /// Claimed numbers are never reused, so two adds handled back to back
    /// get distinct targets even before their re-add events arrive.
    fn next_free_target(&mut self, path: &Path) -> Option<PathBuf> {
        loop {
            let slot = self.state.claim_slot();
            let target = media::rename_target(path, slot)?;
            if !target.exists() {
                return Some(target);
            }
            debug!(target = %target.display(), "Race slot already taken on disk, skipping");
        }
    }

    /// Removals are logged only; playlist state is not reconciled.
    fn handle_removed(&self, path: &Path) {
        info!(path = %path.display(), "File removed");
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tokio::io::{AsyncBufReadExt, BufReader};
    use tokio::net::TcpListener;
    use tokio::time::timeout;

    use racewatch_player::client::PlayerConfig;
    use racewatch_player::PlayerError;

    const TEST_TIMEOUT: Duration = Duration::from_secs(5);

    /// Fake RC endpoint: forwards every received line into a channel.
    async fn spawn_rc_endpoint() -> (PlayerConfig, mpsc::UnboundedReceiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind listener");
        let port = listener.local_addr().expect("local addr").port();

        let (tx, rx) = mpsc::unbounded_channel();
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let mut lines = BufReader::new(stream).lines();
                    while let Ok(Some(line)) = lines.next_line().await {
                        if tx.send(line).is_err() {
                            return;
                        }
                    }
                });
            }
        });

        let config = PlayerConfig {
            host: "127.0.0.1".to_string(),
            port,
            retry_interval: Duration::from_millis(10),
            max_attempts: 3,
        };
        (config, rx)
    }

    async fn connected_coordinator() -> (Coordinator, mpsc::UnboundedReceiver<String>) {
        let (config, lines) = spawn_rc_endpoint().await;
        let mut client = PlayerClient::new(config, CancellationToken::new());
        client.connect().await.expect("connect");
        (Coordinator::new(client), lines)
    }

    async fn next_line(rx: &mut mpsc::UnboundedReceiver<String>) -> String {
        timeout(TEST_TIMEOUT, rx.recv())
            .await
            .expect("line within timeout")
            .expect("channel open")
    }

    fn assert_no_line(rx: &mut mpsc::UnboundedReceiver<String>) {
        assert!(rx.try_recv().is_err(), "expected no command to be sent");
    }

    #[tokio::test]
    async fn test_first_image_becomes_banner() {
        let (mut coordinator, mut lines) = connected_coordinator().await;

        coordinator
            .handle_added(Path::new("/watch/banner.jpg"))
            .await
            .expect("handle banner");

        assert_eq!(next_line(&mut lines).await, "add /watch/banner.jpg");
        assert_eq!(
            coordinator.state().banner(),
            Some(Path::new("/watch/banner.jpg"))
        );
    }

    #[tokio::test]
    async fn test_second_image_is_ignored() {
        let (mut coordinator, mut lines) = connected_coordinator().await;

        coordinator
            .handle_added(Path::new("/watch/banner.jpg"))
            .await
            .expect("first image");
        assert_eq!(next_line(&mut lines).await, "add /watch/banner.jpg");

        coordinator
            .handle_added(Path::new("/watch/second.png"))
            .await
            .expect("second image");

        assert_eq!(
            coordinator.state().banner(),
            Some(Path::new("/watch/banner.jpg"))
        );
        assert_no_line(&mut lines);
    }

    #[tokio::test]
    async fn test_race_video_is_recorded_and_added() {
        let (mut coordinator, mut lines) = connected_coordinator().await;

        coordinator
            .handle_added(Path::new("/watch/race 03.mp4"))
            .await
            .expect("race video");

        assert_eq!(next_line(&mut lines).await, "add /watch/race 03.mp4");
        assert_eq!(coordinator.state().race_count(), 1);
        // Allocator moved past the observed number
        assert_eq!(coordinator.state().peek_slot(), 4);
    }

    #[tokio::test]
    async fn test_race_video_never_renamed_again() {
        let dir = tempfile::tempdir().expect("tempdir");
        let race = dir.path().join("race 01.mp4");
        std::fs::write(&race, b"video").expect("write");

        let (mut coordinator, mut lines) = connected_coordinator().await;
        coordinator.handle_added(&race).await.expect("race video");

        assert_eq!(
            next_line(&mut lines).await,
            format!("add {}", race.display())
        );
        assert!(race.exists(), "conforming file must stay in place");
    }

    #[tokio::test]
    async fn test_nonconforming_video_is_renamed_not_added() {
        let dir = tempfile::tempdir().expect("tempdir");
        let clip = dir.path().join("clip.mp4");
        std::fs::write(&clip, b"video").expect("write");

        let (mut coordinator, mut lines) = connected_coordinator().await;
        coordinator.handle_added(&clip).await.expect("clip");

        assert!(!clip.exists());
        assert!(dir.path().join("race 01.mp4").exists());
        // The rename itself does not touch playlist or state
        assert_eq!(coordinator.state().race_count(), 0);
        assert_no_line(&mut lines);
    }

    #[tokio::test]
    async fn test_two_quick_videos_get_distinct_slots() {
        let dir = tempfile::tempdir().expect("tempdir");
        let first = dir.path().join("quali.mp4");
        let second = dir.path().join("sprint.mkv");
        std::fs::write(&first, b"a").expect("write");
        std::fs::write(&second, b"b").expect("write");

        let (mut coordinator, _lines) = connected_coordinator().await;

        // Both handled before any rename-triggered re-add arrives
        coordinator.handle_added(&first).await.expect("first");
        coordinator.handle_added(&second).await.expect("second");

        assert!(dir.path().join("race 01.mp4").exists());
        assert!(dir.path().join("race 02.mkv").exists());
    }

    #[tokio::test]
    async fn test_slot_taken_on_disk_is_skipped() {
        let dir = tempfile::tempdir().expect("tempdir");
        let existing = dir.path().join("race 01.mp4");
        let clip = dir.path().join("clip.mp4");
        std::fs::write(&existing, b"a").expect("write");
        std::fs::write(&clip, b"b").expect("write");

        let (mut coordinator, _lines) = connected_coordinator().await;
        coordinator.handle_added(&clip).await.expect("clip");

        assert!(existing.exists(), "existing slot must not be overwritten");
        assert!(dir.path().join("race 02.mp4").exists());
    }

    #[tokio::test]
    async fn test_banner_then_clip_scenario() {
        let dir = tempfile::tempdir().expect("tempdir");
        let banner = dir.path().join("banner.jpg");
        let clip = dir.path().join("clip.mp4");
        std::fs::write(&banner, b"img").expect("write");
        std::fs::write(&clip, b"video").expect("write");

        let (mut coordinator, mut lines) = connected_coordinator().await;

        coordinator.handle_added(&banner).await.expect("banner");
        assert_eq!(
            next_line(&mut lines).await,
            format!("add {}", banner.display())
        );

        coordinator.handle_added(&clip).await.expect("clip");
        let renamed = dir.path().join("race 01.mp4");
        assert!(renamed.exists());

        // The rename-triggered re-add event
        coordinator.handle_added(&renamed).await.expect("re-add");
        assert_eq!(
            next_line(&mut lines).await,
            format!("add {}", renamed.display())
        );
        assert_eq!(coordinator.state().race_count(), 1);
    }

    #[tokio::test]
    async fn test_unrelated_files_are_ignored() {
        let (mut coordinator, mut lines) = connected_coordinator().await;

        coordinator
            .handle_added(Path::new("/watch/notes.txt"))
            .await
            .expect("ignored file");

        assert_no_line(&mut lines);
        assert_eq!(coordinator.state().race_count(), 0);
    }

    #[tokio::test]
    async fn test_removed_event_only_logs() {
        let (mut coordinator, mut lines) = connected_coordinator().await;

        coordinator
            .handle_added(Path::new("/watch/race 01.mp4"))
            .await
            .expect("race video");
        assert_eq!(next_line(&mut lines).await, "add /watch/race 01.mp4");

        coordinator
            .handle_event(FsEvent {
                path: PathBuf::from("/watch/race 01.mp4"),
                kind: FsEventKind::Removed,
            })
            .await;

        assert_eq!(coordinator.state().race_count(), 1);
        assert_no_line(&mut lines);
    }

    #[tokio::test]
    async fn test_add_while_disconnected_surfaces_not_connected() {
        let client = PlayerClient::with_defaults(CancellationToken::new());
        let mut coordinator = Coordinator::new(client);

        let result = coordinator.handle_added(Path::new("/watch/race 01.mp4")).await;

        assert!(matches!(
            result,
            Err(WatchError::Player(PlayerError::NotConnected))
        ));
    }

    #[tokio::test]
    async fn test_run_stops_on_cancellation() {
        let (config, _lines) = spawn_rc_endpoint().await;
        let mut client = PlayerClient::new(config, CancellationToken::new());
        client.connect().await.expect("connect");

        let coordinator = Coordinator::new(client);
        let (_tx, rx) = mpsc::unbounded_channel();
        let cancel_token = CancellationToken::new();

        cancel_token.cancel();
        let client = timeout(TEST_TIMEOUT, coordinator.run(rx, cancel_token))
            .await
            .expect("loop exits promptly");

        assert!(client.is_connected());
    }
}
