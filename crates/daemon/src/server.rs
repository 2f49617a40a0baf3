// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Socket server and connection handling.
//!
//! Each connection runs in its own task and forwards work to the recorder
//! loop over a channel, so the recorder only ever sees one writer.

use std::time::Duration;

use thiserror::Error;
use tk_daemon::protocol::{self, Request, Response, DEFAULT_TIMEOUT, PROTOCOL_VERSION};
use tk_recorder::Event;
use tokio::net::UnixStream;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, error, warn};

use crate::lifecycle::Command;

/// How long an idle publisher connection is kept open
const IDLE_TIMEOUT: Duration = Duration::from_secs(300);

/// Serve one client connection on a new task
pub fn spawn_connection(stream: UnixStream, commands: mpsc::Sender<Command>) {
    tokio::spawn(async move {
        if let Err(e) = handle_connection(stream, commands).await {
            error!("Error handling connection: {}", e);
        }
    });
}

/// Handle requests on a connection until the client hangs up
pub async fn handle_connection(
    stream: UnixStream,
    commands: mpsc::Sender<Command>,
) -> Result<(), ServerError> {
    let (mut reader, mut writer) = stream.into_split();

    loop {
        let request = match protocol::read_request(&mut reader, IDLE_TIMEOUT).await {
            Ok(req) => req,
            Err(protocol::ProtocolError::Timeout) => {
                debug!("Closing idle connection");
                return Ok(());
            }
            Err(protocol::ProtocolError::ConnectionClosed) => {
                debug!("Client disconnected");
                return Ok(());
            }
            Err(e) => return Err(ServerError::Protocol(e)),
        };

        debug!("Received request: {:?}", request);

        let shutdown = matches!(request, Request::Shutdown);
        let response = handle_request(&commands, request).await?;

        protocol::write_response(&mut writer, &response, DEFAULT_TIMEOUT).await?;

        if shutdown {
            return Ok(());
        }
    }
}

/// Handle a single request and return a response
async fn handle_request(
    commands: &mpsc::Sender<Command>,
    request: Request,
) -> Result<Response, ServerError> {
    let response = match request {
        Request::Ping => Response::Pong,

        Request::Hello { version: _ } => Response::Hello {
            version: PROTOCOL_VERSION.to_string(),
        },

        Request::Publish {
            topic,
            payload,
            timestamp_ms,
        } => {
            let event = match timestamp_ms {
                Some(ms) => match Event::try_from_millis(ms, topic, payload) {
                    Some(event) => event,
                    None => {
                        warn!(timestamp_ms = ms, "publish with out-of-range timestamp");
                        return Ok(Response::Error {
                            message: format!("timestamp out of range: {ms}"),
                        });
                    }
                },
                None => Event::now(topic, payload),
            };
            dispatch(commands, |reply| Command::Publish { event, reply }).await?
        }

        Request::Status => dispatch(commands, |reply| Command::Status { reply }).await?,

        Request::Shutdown => dispatch(commands, |reply| Command::Shutdown { reply }).await?,
    };
    Ok(response)
}

/// Send a command to the recorder loop and wait for its reply
async fn dispatch(
    commands: &mpsc::Sender<Command>,
    command: impl FnOnce(oneshot::Sender<Response>) -> Command,
) -> Result<Response, ServerError> {
    let (reply, response) = oneshot::channel();
    commands
        .send(command(reply))
        .await
        .map_err(|_| ServerError::Stopped)?;
    response.await.map_err(|_| ServerError::Stopped)
}

/// Server errors
#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Protocol error: {0}")]
    Protocol(#[from] protocol::ProtocolError),

    #[error("Daemon is shutting down")]
    Stopped,
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
