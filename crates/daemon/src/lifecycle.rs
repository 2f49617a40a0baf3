// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon lifecycle management: configuration, startup, shutdown.

use std::path::{Path, PathBuf};
use std::time::Instant;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tk_daemon::protocol::Response;
use tk_recorder::{Event, Recorder, Settings, WriteOutcome};
use tokio::net::UnixListener;
use tokio::sync::{mpsc, oneshot};
use tracing::{info, warn};

/// Capacity of the channel feeding the recorder loop
const COMMAND_QUEUE_SIZE: usize = 1024;

/// Annotated example written by `tkd --config-example`
pub const EXAMPLE_CONFIG: &str = r#"# Where daemon logs go: "stdout", "stderr" or a file path
log_file = "stdout"

# Unix socket that ingestion clients publish to
socket = "/tmp/tk/tk.sock"

[recorder]
# Root of the per-topic file tree; must already exist
rootdir = "./data"

# Rotate a topic file once it reaches this many KiB (0 disables rotation)
rotate_at_size = 1024

# Gzip rotated files in the background
gzip_rotated = true

# Only store topics matching one of these patterns (empty stores everything)
filters = [
    "home/**/power",
    "plug?/energy",
    "switch/*/enable",
    "home/doors/**",
]
"#;

/// Where log output is written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LogTarget {
    Stdout,
    Stderr,
    File(PathBuf),
}

impl From<String> for LogTarget {
    fn from(value: String) -> Self {
        match value.as_str() {
            "" | "stdout" => LogTarget::Stdout,
            "stderr" => LogTarget::Stderr,
            _ => LogTarget::File(PathBuf::from(value)),
        }
    }
}

impl From<LogTarget> for String {
    fn from(value: LogTarget) -> Self {
        match value {
            LogTarget::Stdout => "stdout".to_string(),
            LogTarget::Stderr => "stderr".to_string(),
            LogTarget::File(path) => path.to_string_lossy().into_owned(),
        }
    }
}

/// Daemon configuration file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Log destination
    pub log_file: LogTarget,
    /// Path to the ingestion socket
    pub socket: PathBuf,
    /// Recorder settings
    pub recorder: Settings,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_file: LogTarget::Stdout,
            socket: default_socket_path(),
            recorder: Settings::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, LifecycleError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| LifecycleError::ConfigRead(path.to_path_buf(), e))?;
        Self::parse(&content).map_err(|e| LifecycleError::ConfigParse(path.to_path_buf(), e))
    }

    pub fn parse(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }
}

/// Work handed from connection tasks to the recorder loop
#[derive(Debug)]
pub enum Command {
    Publish {
        event: Event,
        reply: oneshot::Sender<Response>,
    },
    Status {
        reply: oneshot::Sender<Response>,
    },
    Shutdown {
        reply: oneshot::Sender<Response>,
    },
}

/// Daemon state during operation
pub struct DaemonState {
    /// Configuration
    pub config: Config,
    /// Unix socket listener
    pub listener: UnixListener,
    /// The single writer; only the main loop touches it
    pub recorder: Recorder,
    /// Commands from connection tasks
    pub commands: mpsc::Receiver<Command>,
    /// Cloned into each connection task
    pub command_tx: mpsc::Sender<Command>,
    /// When daemon started
    pub start_time: Instant,
    /// Shutdown requested flag
    pub shutdown_requested: bool,
}

impl DaemonState {
    /// Run one command against the recorder and send the reply
    pub fn handle_command(&mut self, command: Command) {
        match command {
            Command::Publish { event, reply } => {
                let response = self.publish(&event);
                let _ = reply.send(response);
            }
            Command::Status { reply } => {
                let stats = self.recorder.stats();
                let _ = reply.send(Response::Status {
                    uptime_secs: self.start_time.elapsed().as_secs(),
                    stored: stats.stored,
                    unchanged: stats.unchanged,
                    filtered: stats.filtered,
                    rejected: stats.rejected,
                    background_failures: stats.background_failures,
                });
            }
            Command::Shutdown { reply } => {
                self.shutdown_requested = true;
                let _ = reply.send(Response::ShuttingDown);
            }
        }
    }

    fn publish(&mut self, event: &Event) -> Response {
        if self.config.recorder.verbose {
            info!(
                topic = %event.topic,
                payload = %String::from_utf8_lossy(&event.payload),
                "incoming"
            );
        }

        match self.recorder.write(event) {
            Ok(WriteOutcome::Stored) => Response::Stored,
            Ok(WriteOutcome::Unchanged) => Response::Unchanged,
            Ok(WriteOutcome::Filtered) => Response::Filtered,
            Err(e) => {
                warn!(topic = %event.topic, error = %e, "failed to record event");
                Response::Error {
                    message: e.to_string(),
                }
            }
        }
    }

    /// Shutdown the daemon gracefully
    ///
    /// Background archive jobs are not awaited.
    pub fn shutdown(&mut self) {
        info!("Shutting down daemon...");

        self.recorder.close();

        if self.config.socket.exists() {
            if let Err(e) = std::fs::remove_file(&self.config.socket) {
                warn!("Failed to remove socket file: {}", e);
            }
        }

        info!("Daemon shutdown complete");
    }
}

/// Lifecycle errors
#[derive(Debug, Error)]
pub enum LifecycleError {
    #[error("Failed to read config {0}: {1}")]
    ConfigRead(PathBuf, #[source] std::io::Error),

    #[error("Invalid config {0}: {1}")]
    ConfigParse(PathBuf, #[source] toml::de::Error),

    #[error("Recorder error: {0}")]
    Recorder(#[from] tk_recorder::ConfigError),

    #[error("Log file path has no file name: {0}")]
    BadLogPath(PathBuf),

    #[error("Failed to bind socket at {0}: {1}")]
    BindFailed(PathBuf, #[source] std::io::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Start the daemon
pub fn startup(config: &Config) -> Result<DaemonState, LifecycleError> {
    // 1. Open the recorder first; a bad root or filter is fatal
    let mut recorder = Recorder::new(config.recorder.clone());
    recorder.open()?;

    // 2. Remove stale socket and bind (LAST - only after all validation passes)
    if let Some(parent) = config.socket.parent() {
        std::fs::create_dir_all(parent)?;
    }
    if config.socket.exists() {
        std::fs::remove_file(&config.socket)?;
    }
    let listener = UnixListener::bind(&config.socket)
        .map_err(|e| LifecycleError::BindFailed(config.socket.clone(), e))?;

    let (command_tx, commands) = mpsc::channel(COMMAND_QUEUE_SIZE);

    info!(
        "Daemon started, recording to {}",
        config.recorder.root_dir.display()
    );

    Ok(DaemonState {
        config: config.clone(),
        listener,
        recorder,
        commands,
        command_tx,
        start_time: Instant::now(),
        shutdown_requested: false,
    })
}

/// Default socket location
///
/// Uses /tmp/tk by default to keep paths short (macOS SUN_LEN = 104).
/// Can be overridden with TK_SOCKET_DIR.
pub fn default_socket_path() -> PathBuf {
    let dir = std::env::var("TK_SOCKET_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp/tk"));
    dir.join("tk.sock")
}

#[cfg(test)]
#[path = "lifecycle_tests.rs"]
mod tests;
