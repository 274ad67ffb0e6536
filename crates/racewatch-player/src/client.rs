//! Control-socket client for the media player's remote-control interface.
//!
//! This module provides the `PlayerClient` which handles:
//! - TCP connection to the player's RC endpoint with bounded, fixed-interval
//!   retry (the player needs a moment to come up after being launched)
//! - Sending newline-terminated plain-text commands
//! - Detecting the socket closing, locally or remotely
//!
//! The client is an explicitly constructed, explicitly owned instance; the
//! coordinator receives it at startup rather than reaching for a global.
//!
//! **Panic-Free Policy:** This module follows the project's panic-free
//! guidelines. No `.unwrap()`, `.expect()`, `panic!()`, `unreachable!()`,
//! or `todo!()`.

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;
use tokio::time::sleep;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::command::RcCommand;
use crate::error::{PlayerError, Result};

// ============================================================================
// Configuration
// ============================================================================

/// Default host of the player's RC interface.
pub const DEFAULT_HOST: &str = "localhost";

/// Default port of the player's RC interface.
pub const DEFAULT_PORT: u16 = 4212;

/// Default delay between connect attempts.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(1);

/// Default connect attempt budget.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 10;

/// Configuration for the player client.
///
/// The endpoint is immutable once the client is constructed.
///
/// # Example
///
/// ```rust
/// use racewatch_player::client::PlayerConfig;
/// use std::time::Duration;
///
/// let config = PlayerConfig {
///     port: 9999,
///     retry_interval: Duration::from_millis(100),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct PlayerConfig {
    /// Host of the RC endpoint.
    pub host: String,

    /// Port of the RC endpoint.
    pub port: u16,

    /// Delay between connect attempts.
    pub retry_interval: Duration,

    /// Maximum number of connect attempts before giving up.
    pub max_attempts: u32,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl PlayerConfig {
    /// The `host:port` form of the endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

// ============================================================================
// Player Client
// ============================================================================

/// Outcome of a single connect attempt.
///
/// Transient failures are expected while the player process is still
/// starting; they are logged at debug level and otherwise suppressed. Only
/// attempt exhaustion surfaces an error to the caller.
enum Attempt {
    Connected(TcpStream),
    Transient(std::io::Error),
}

/// Client for the player's remote-control socket.
///
/// # Connection Lifecycle
///
/// `Disconnected -> (connect succeeds) -> Connected -> (socket closes,
/// locally or remotely) -> Disconnected`. Commands can only be sent while
/// connected; a close observed by the reader task flips the state back
/// without any action from the caller.
pub struct PlayerClient {
    /// Endpoint and retry configuration.
    config: PlayerConfig,

    /// Write half of the control socket while connected.
    writer: Option<OwnedWriteHalf>,

    /// Shared connection flag, flipped by the close-watch task on EOF.
    connected: Arc<AtomicBool>,

    /// Cancellation token aborting retry waits on shutdown.
    cancel_token: CancellationToken,
}

impl PlayerClient {
    /// Creates a new client for the given endpoint.
    #[must_use]
    pub fn new(config: PlayerConfig, cancel_token: CancellationToken) -> Self {
        Self {
            config,
            writer: None,
            connected: Arc::new(AtomicBool::new(false)),
            cancel_token,
        }
    }

    /// Creates a new client with default configuration.
    #[must_use]
    pub fn with_defaults(cancel_token: CancellationToken) -> Self {
        Self::new(PlayerConfig::default(), cancel_token)
    }

    /// The client's configuration.
    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    /// Whether the control socket is currently connected.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Connects to the RC endpoint, retrying on a fixed interval.
    ///
    /// One attempt is made per `retry_interval`, up to `max_attempts`.
    /// Transient failures during the retry window are debug-logged and
    /// swallowed; exhausting the budget yields [`PlayerError::Connect`].
    /// The wait between attempts aborts with [`PlayerError::Cancelled`]
    /// when the cancellation token fires.
    pub async fn connect(&mut self) -> Result<()> {
        for attempt in 1..=self.config.max_attempts {
            info!(
                attempt,
                endpoint = %self.config.endpoint(),
                "Attempting to connect to player RC interface"
            );

            match self.try_connect_once().await {
                Attempt::Connected(stream) => {
                    self.install(stream);
                    info!("Connected to player RC interface");
                    return Ok(());
                }
                Attempt::Transient(e) => {
                    debug!(attempt, error = %e, "Connection attempt failed");
                }
            }

            if attempt < self.config.max_attempts {
                tokio::select! {
                    _ = sleep(self.config.retry_interval) => {}
                    _ = self.cancel_token.cancelled() => {
                        info!("Connection retry cancelled");
                        return Err(PlayerError::Cancelled);
                    }
                }
            }
        }

        Err(PlayerError::Connect {
            attempts: self.config.max_attempts,
        })
    }

    /// Makes a single TCP connect attempt.
    async fn try_connect_once(&self) -> Attempt {
        match TcpStream::connect((self.config.host.as_str(), self.config.port)).await {
            Ok(stream) => Attempt::Connected(stream),
            Err(e) => Attempt::Transient(e),
        }
    }

    /// Takes ownership of a connected stream and arms close detection.
    fn install(&mut self, stream: TcpStream) {
        let (read_half, write_half) = stream.into_split();
        self.writer = Some(write_half);
        self.connected.store(true, Ordering::SeqCst);

        let connected = Arc::clone(&self.connected);
        tokio::spawn(async move {
            drain_until_close(read_half, connected).await;
        });
    }

    /// Sends a raw command line to the player.
    ///
    /// Writes `command` followed by a newline and flushes. Fails with
    /// [`PlayerError::NotConnected`] whenever the socket is not connected,
    /// regardless of prior connection history, and with
    /// [`PlayerError::Write`] on a transport-level failure.
    pub async fn send_command(&mut self, command: &str) -> Result<()> {
        if !self.is_connected() {
            return Err(PlayerError::NotConnected);
        }
        let writer = self.writer.as_mut().ok_or(PlayerError::NotConnected)?;

        writer
            .write_all(command.as_bytes())
            .await
            .map_err(PlayerError::Write)?;
        writer.write_all(b"\n").await.map_err(PlayerError::Write)?;
        writer.flush().await.map_err(PlayerError::Write)?;

        debug!(command, "Sent command to player");
        Ok(())
    }

    /// Sends a typed RC command.
    pub async fn send(&mut self, command: &RcCommand) -> Result<()> {
        self.send_command(&command.to_string()).await
    }

    /// Closes the control socket gracefully.
    ///
    /// Resolves immediately when already disconnected.
    pub async fn disconnect(&mut self) -> Result<()> {
        if !self.is_connected() {
            self.writer = None;
            return Ok(());
        }

        if let Some(mut writer) = self.writer.take() {
            writer.shutdown().await?;
        }
        self.connected.store(false, Ordering::SeqCst);
        info!("Disconnected from player RC interface");
        Ok(())
    }

    // ------------------------------------------------------------------------
    // Convenience commands
    // ------------------------------------------------------------------------

    /// Start or resume playback.
    pub async fn play(&mut self) -> Result<()> {
        self.send(&RcCommand::Play).await
    }

    /// Pause playback.
    pub async fn pause(&mut self) -> Result<()> {
        self.send(&RcCommand::Pause).await
    }

    /// Stop playback.
    pub async fn stop(&mut self) -> Result<()> {
        self.send(&RcCommand::Stop).await
    }

    /// Skip to the next playlist entry.
    pub async fn next(&mut self) -> Result<()> {
        self.send(&RcCommand::Next).await
    }

    /// Go back to the previous playlist entry.
    pub async fn previous(&mut self) -> Result<()> {
        self.send(&RcCommand::Previous).await
    }

    /// Append a file to the playlist.
    pub async fn add_to_playlist(&mut self, path: &Path) -> Result<()> {
        self.send(&RcCommand::Add(path.to_path_buf())).await
    }

    /// Remove the playlist entry at `index`.
    pub async fn remove_from_playlist(&mut self, index: usize) -> Result<()> {
        self.send(&RcCommand::Remove(index)).await
    }

    /// Clear the playlist.
    pub async fn clear_playlist(&mut self) -> Result<()> {
        self.send(&RcCommand::Clear).await
    }

    /// Print the playlist.
    pub async fn show_playlist(&mut self) -> Result<()> {
        self.send(&RcCommand::ShowPlaylist).await
    }

    /// Raise the volume by one step.
    pub async fn volume_up(&mut self) -> Result<()> {
        self.send(&RcCommand::VolumeUp).await
    }

    /// Lower the volume by one step.
    pub async fn volume_down(&mut self) -> Result<()> {
        self.send(&RcCommand::VolumeDown).await
    }

    /// Mute audio.
    pub async fn mute(&mut self) -> Result<()> {
        self.send(&RcCommand::Mute).await
    }

    /// Unmute audio.
    pub async fn unmute(&mut self) -> Result<()> {
        self.send(&RcCommand::Unmute).await
    }

    /// Set the volume to an absolute level.
    pub async fn set_volume(&mut self, level: u32) -> Result<()> {
        self.send(&RcCommand::SetVolume(level)).await
    }

    /// Toggle fullscreen.
    pub async fn fullscreen(&mut self) -> Result<()> {
        self.send(&RcCommand::Fullscreen).await
    }

    /// Loop the playlist.
    pub async fn loop_playback(&mut self) -> Result<()> {
        self.send(&RcCommand::Loop).await
    }
}

/// Drains the read half until the peer closes, then flips the flag.
///
/// The RC interface chatters (prompts, status lines); none of it is
/// interpreted, the read loop exists purely to observe the close.
async fn drain_until_close(mut read_half: OwnedReadHalf, connected: Arc<AtomicBool>) {
    let mut buf = [0u8; 1024];
    loop {
        match read_half.read(&mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                debug!(error = %e, "Control socket read failed");
                break;
            }
        }
    }
    connected.store(false, Ordering::SeqCst);
    info!("Connection to player closed");
}

// ============================================================================
// Tests
// ============================================================================
