// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for daemon client behavior.

use super::*;
use tk_daemon::protocol::{read_request, write_response, DEFAULT_TIMEOUT};
use tokio::net::UnixListener;

/// Serve exactly one request with a canned response, returning what was received
fn serve_once(
    listener: UnixListener,
    response: Response,
) -> tokio::task::JoinHandle<Request> {
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let (mut reader, mut writer) = stream.into_split();
        let request = read_request(&mut reader, DEFAULT_TIMEOUT).await.unwrap();
        write_response(&mut writer, &response, DEFAULT_TIMEOUT)
            .await
            .unwrap();
        request
    })
}

fn bind(dir: &tempfile::TempDir) -> (UnixListener, PathBuf) {
    let path = dir.path().join("tk.sock");
    (UnixListener::bind(&path).unwrap(), path)
}

#[test]
fn explicit_socket_wins() {
    let path = resolve_socket_path(
        Some(PathBuf::from("/a.sock")),
        Some(PathBuf::from("/b.sock")),
        Some(PathBuf::from("/c")),
    );
    assert_eq!(path, PathBuf::from("/a.sock"));
}

#[test]
fn env_socket_beats_socket_dir() {
    let path = resolve_socket_path(
        None,
        Some(PathBuf::from("/b.sock")),
        Some(PathBuf::from("/c")),
    );
    assert_eq!(path, PathBuf::from("/b.sock"));
}

#[test]
fn socket_dir_and_default() {
    assert_eq!(
        resolve_socket_path(None, None, Some(PathBuf::from("/c"))),
        PathBuf::from("/c/tk.sock")
    );
    assert_eq!(
        resolve_socket_path(None, None, None),
        PathBuf::from("/tmp/tk/tk.sock")
    );
}

#[test]
fn connect_without_socket_is_not_running() {
    let dir = tempfile::tempdir().unwrap();
    let result = DaemonClient::connect(Some(dir.path().join("missing.sock")));
    assert!(matches!(result, Err(ClientError::DaemonNotRunning(_))));
}

#[tokio::test]
async fn publish_sends_event_and_maps_outcome() {
    let dir = tempfile::tempdir().unwrap();
    let (listener, path) = bind(&dir);
    let server = serve_once(listener, Response::Unchanged);

    let client = DaemonClient::connect(Some(path)).unwrap();
    let outcome = client
        .publish("home/power", b"42".to_vec(), Some(1_000))
        .await
        .unwrap();

    assert_eq!(outcome, PublishOutcome::Unchanged);
    assert_eq!(
        server.await.unwrap(),
        Request::Publish {
            topic: "home/power".to_string(),
            payload: b"42".to_vec(),
            timestamp_ms: Some(1_000),
        }
    );
}

#[tokio::test]
async fn publish_error_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (listener, path) = bind(&dir);
    let _server = serve_once(
        listener,
        Response::Error {
            message: "topic contains '..'".to_string(),
        },
    );

    let client = DaemonClient::connect(Some(path)).unwrap();
    let err = client.publish("a/../b", Vec::new(), None).await.unwrap_err();

    assert!(matches!(err, ClientError::Rejected(ref m) if m.contains("..")));
}

#[tokio::test]
async fn status_unpacks_counters() {
    let dir = tempfile::tempdir().unwrap();
    let (listener, path) = bind(&dir);
    let _server = serve_once(
        listener,
        Response::Status {
            uptime_secs: 9,
            stored: 5,
            unchanged: 4,
            filtered: 3,
            rejected: 2,
            background_failures: 1,
        },
    );

    let client = DaemonClient::connect(Some(path)).unwrap();
    let status = client.status().await.unwrap();

    assert_eq!(
        status,
        DaemonStatus {
            uptime_secs: 9,
            stored: 5,
            unchanged: 4,
            filtered: 3,
            rejected: 2,
            background_failures: 1,
        }
    );
}

#[tokio::test]
async fn mismatched_response_is_unexpected() {
    let dir = tempfile::tempdir().unwrap();
    let (listener, path) = bind(&dir);
    let _server = serve_once(listener, Response::Stored);

    let client = DaemonClient::connect(Some(path)).unwrap();
    assert!(matches!(
        client.ping().await,
        Err(ClientError::UnexpectedResponse)
    ));
}
