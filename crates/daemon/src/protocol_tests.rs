// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Protocol unit tests

use super::*;

#[test]
fn encode_decode_roundtrip_request() {
    let request = Request::Publish {
        topic: "home/kitchen/power".to_string(),
        payload: b"21.5\n".to_vec(),
        timestamp_ms: Some(1_577_840_400_100),
    };

    let encoded = encode(&request).expect("encode failed");
    let decoded: Request = decode(&encoded).expect("decode failed");

    assert_eq!(request, decoded);
}

#[test]
fn encode_decode_roundtrip_response() {
    let response = Response::Status {
        uptime_secs: 3600,
        stored: 120,
        unchanged: 40,
        filtered: 7,
        rejected: 1,
        background_failures: 0,
    };

    let encoded = encode(&response).expect("encode failed");
    let decoded: Response = decode(&encoded).expect("decode failed");

    assert_eq!(response, decoded);
}

#[test]
fn publish_timestamp_is_optional_on_the_wire() {
    let decoded: Request =
        decode(br#"{"type":"Publish","topic":"t","payload":[104,105]}"#).expect("decode failed");

    assert_eq!(
        decoded,
        Request::Publish {
            topic: "t".to_string(),
            payload: b"hi".to_vec(),
            timestamp_ms: None,
        }
    );
}

#[test]
fn encode_returns_json_without_length_prefix() {
    let response = Response::Stored;
    let encoded = encode(&response).expect("encode failed");

    // encode() returns raw JSON, no length prefix
    let json_str = std::str::from_utf8(&encoded).expect("should be valid UTF-8");
    assert!(
        json_str.starts_with('{'),
        "should be JSON object: {}",
        json_str
    );
}

#[tokio::test]
async fn read_write_message_roundtrip() {
    let original = b"hello world";

    let mut buffer = Vec::new();
    write_message(&mut buffer, original)
        .await
        .expect("write failed");

    // write_message adds 4-byte length prefix
    assert_eq!(buffer.len(), 4 + original.len());

    let mut cursor = std::io::Cursor::new(buffer);
    let read_back = read_message(&mut cursor).await.expect("read failed");

    assert_eq!(read_back, original);
}

#[tokio::test]
async fn write_message_adds_length_prefix() {
    let data = b"test data";

    let mut buffer = Vec::new();
    write_message(&mut buffer, data)
        .await
        .expect("write failed");

    // First 4 bytes are the length prefix
    let len = u32::from_be_bytes([buffer[0], buffer[1], buffer[2], buffer[3]]) as usize;

    assert_eq!(len, data.len());
    assert_eq!(&buffer[4..], data);
}

#[tokio::test]
async fn read_message_on_empty_stream_is_connection_closed() {
    let mut cursor = std::io::Cursor::new(Vec::new());
    let err = read_message(&mut cursor).await.unwrap_err();
    assert!(matches!(err, ProtocolError::ConnectionClosed));
}

#[tokio::test]
async fn read_message_rejects_oversized_length() {
    let len = (MAX_MESSAGE_SIZE as u32 + 1).to_be_bytes();
    let mut cursor = std::io::Cursor::new(len.to_vec());
    let err = read_message(&mut cursor).await.unwrap_err();
    assert!(matches!(err, ProtocolError::TooLarge(_)));
}

#[tokio::test]
async fn request_response_over_stream() {
    let mut buffer = Vec::new();
    write_request(&mut buffer, &Request::Ping, DEFAULT_TIMEOUT)
        .await
        .expect("write failed");
    write_response(&mut buffer, &Response::Pong, DEFAULT_TIMEOUT)
        .await
        .expect("write failed");

    let mut cursor = std::io::Cursor::new(buffer);
    assert_eq!(
        read_request(&mut cursor, DEFAULT_TIMEOUT).await.unwrap(),
        Request::Ping
    );
    assert_eq!(
        read_response(&mut cursor, DEFAULT_TIMEOUT).await.unwrap(),
        Response::Pong
    );
}
