//! Launching the external player process.
//!
//! The player is spawned with its remote-control interface bound to the
//! client's endpoint. Its stderr is captured: any error output is treated
//! as a fatal condition, so the driver supervises the process and shuts
//! down with a failing exit code when [`PlayerExit::reported_errors`]
//! holds.

use std::process::Stdio;

use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::client::PlayerConfig;
use crate::error::{PlayerError, Result};

/// Binary name of the external media player.
pub const PLAYER_BINARY: &str = "vlc";

/// Handle to a launched player process.
pub struct PlayerProcess {
    child: Child,
}

/// How a player process ended.
#[derive(Debug)]
pub struct PlayerExit {
    /// Whether the process exited with a success status.
    pub success: bool,

    /// Everything the process wrote to stderr.
    pub stderr: String,
}

impl PlayerExit {
    /// Whether the player reported error output or a failing status.
    pub fn reported_errors(&self) -> bool {
        !self.success || !self.stderr.trim().is_empty()
    }
}

/// Spawns the player with its RC interface bound to the configured endpoint.
///
/// Fails with [`PlayerError::Spawn`] when the process cannot be started;
/// callers log that and carry on, letting the connect retry exhaust its
/// budget against the unreachable endpoint.
pub fn launch(config: &PlayerConfig) -> Result<PlayerProcess> {
    let rc_host = config.endpoint();
    debug!(binary = PLAYER_BINARY, rc_host = %rc_host, "Starting player process");

    let child = Command::new(PLAYER_BINARY)
        .args(["--extraintf", "rc", "--rc-host", &rc_host])
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(PlayerError::Spawn)?;

    info!(rc_host = %rc_host, "Player process started");
    Ok(PlayerProcess { child })
}

impl PlayerProcess {
    /// Waits for the process to exit and collects its error output.
    pub async fn wait(mut self) -> PlayerExit {
        let mut stderr = String::new();
        if let Some(mut pipe) = self.child.stderr.take() {
            if let Err(e) = pipe.read_to_string(&mut stderr).await {
                debug!(error = %e, "Failed to read player stderr");
            }
        }

        let success = match self.child.wait().await {
            Ok(status) => status.success(),
            Err(e) => {
                warn!(error = %e, "Failed to wait on player process");
                false
            }
        };

        PlayerExit { success, stderr }
    }
}
