// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Daemon client for CLI commands

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use tk_daemon::protocol::{self, ProtocolError, PROTOCOL_VERSION};
use tk_daemon::{Request, Response};
use tokio::net::UnixStream;

/// Timeout for IPC requests, overridable with TK_TIMEOUT_IPC_MS
pub fn timeout_ipc() -> Duration {
    std::env::var("TK_TIMEOUT_IPC_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
        .unwrap_or(protocol::DEFAULT_TIMEOUT)
}

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Daemon not running (no socket at {0})")]
    DaemonNotRunning(PathBuf),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("Rejected: {0}")]
    Rejected(String),

    #[error("Unexpected response from daemon")]
    UnexpectedResponse,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// What the daemon did with a published event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    Stored,
    Unchanged,
    Filtered,
}

/// Daemon counters reported by `status`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonStatus {
    pub uptime_secs: u64,
    pub stored: u64,
    pub unchanged: u64,
    pub filtered: u64,
    pub rejected: u64,
    pub background_failures: u32,
}

/// Daemon client
pub struct DaemonClient {
    socket_path: PathBuf,
}

impl DaemonClient {
    /// Connect to a running daemon
    pub fn connect(socket: Option<PathBuf>) -> Result<Self, ClientError> {
        let socket_path = resolve_socket_path(
            socket,
            std::env::var_os("TK_SOCKET").map(PathBuf::from),
            std::env::var_os("TK_SOCKET_DIR").map(PathBuf::from),
        );

        if !socket_path.exists() {
            return Err(ClientError::DaemonNotRunning(socket_path));
        }

        Ok(Self { socket_path })
    }

    pub fn socket_path(&self) -> &std::path::Path {
        &self.socket_path
    }

    /// Send a request and receive a response
    pub async fn send(&self, request: Request) -> Result<Response, ClientError> {
        let stream = UnixStream::connect(&self.socket_path).await?;
        let (mut reader, mut writer) = stream.into_split();

        let timeout = timeout_ipc();
        protocol::write_request(&mut writer, &request, timeout).await?;
        Ok(protocol::read_response(&mut reader, timeout).await?)
    }

    /// Publish one event
    pub async fn publish(
        &self,
        topic: &str,
        payload: Vec<u8>,
        timestamp_ms: Option<i64>,
    ) -> Result<PublishOutcome, ClientError> {
        match self
            .send(Request::Publish {
                topic: topic.to_string(),
                payload,
                timestamp_ms,
            })
            .await?
        {
            Response::Stored => Ok(PublishOutcome::Stored),
            Response::Unchanged => Ok(PublishOutcome::Unchanged),
            Response::Filtered => Ok(PublishOutcome::Filtered),
            Response::Error { message } => Err(ClientError::Rejected(message)),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    /// Get daemon status
    pub async fn status(&self) -> Result<DaemonStatus, ClientError> {
        match self.send(Request::Status).await? {
            Response::Status {
                uptime_secs,
                stored,
                unchanged,
                filtered,
                rejected,
                background_failures,
            } => Ok(DaemonStatus {
                uptime_secs,
                stored,
                unchanged,
                filtered,
                rejected,
                background_failures,
            }),
            Response::Error { message } => Err(ClientError::Rejected(message)),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    /// Check the daemon is answering
    pub async fn ping(&self) -> Result<(), ClientError> {
        match self.send(Request::Ping).await? {
            Response::Pong => Ok(()),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    /// Get daemon protocol version via Hello handshake
    pub async fn hello(&self) -> Result<String, ClientError> {
        match self
            .send(Request::Hello {
                version: PROTOCOL_VERSION.to_string(),
            })
            .await?
        {
            Response::Hello { version } => Ok(version),
            Response::Error { message } => Err(ClientError::Rejected(message)),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }

    /// Request daemon shutdown
    pub async fn shutdown(&self) -> Result<(), ClientError> {
        match self.send(Request::Shutdown).await? {
            Response::ShuttingDown => Ok(()),
            Response::Error { message } => Err(ClientError::Rejected(message)),
            _ => Err(ClientError::UnexpectedResponse),
        }
    }
}

/// Pick the socket path: explicit flag, then TK_SOCKET, then TK_SOCKET_DIR/tk.sock,
/// then /tmp/tk/tk.sock
fn resolve_socket_path(
    explicit: Option<PathBuf>,
    env_socket: Option<PathBuf>,
    env_dir: Option<PathBuf>,
) -> PathBuf {
    explicit.or(env_socket).unwrap_or_else(|| {
        env_dir
            .unwrap_or_else(|| PathBuf::from("/tmp/tk"))
            .join("tk.sock")
    })
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
