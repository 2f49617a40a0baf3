// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use proptest::prelude::*;

#[test]
fn format_line_pads_timestamp_to_thirteen_columns() {
    let event = Event::from_millis(1_577_840_400_100, "t", "21.5");
    assert_eq!(format_line(&event), b"1577840400.10,21.5\n");

    let early = Event::from_millis(1_500, "t", "x");
    assert_eq!(format_line(&early), b"         1.50,x\n");
}

#[test]
fn format_line_escapes_newlines_only() {
    let event = Event::from_millis(0, "t", "a\nb\r\tc\n");
    assert_eq!(format_line(&event), b"         0.00,a\\nb\r\tc\\n\n");
}

#[test]
fn escape_borrows_when_nothing_to_escape() {
    assert!(matches!(escape_newlines(b"plain"), Cow::Borrowed(_)));
    assert!(matches!(escape_newlines(b"two\nlines"), Cow::Owned(_)));
}

#[test]
fn append_creates_directories_and_appends() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("home/kitchen/power");

    create_parent(&path).unwrap();
    append(&path, &Event::from_millis(1_000, "home/kitchen/power", "1")).unwrap();
    append(&path, &Event::from_millis(2_000, "home/kitchen/power", "2")).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content, "         1.00,1\n         2.00,2\n");
}

#[test]
fn append_into_directory_path_fails_on_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("occupied");
    std::fs::create_dir(&path).unwrap();

    let err = append(&path, &Event::from_millis(0, "occupied", "x")).unwrap_err();
    assert!(matches!(err, WriteError::Open { .. }), "{err}");
}

#[test]
fn parent_below_a_file_fails_on_create_dir() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("leaf"), b"").unwrap();
    let path = dir.path().join("leaf/child");

    let err = create_parent(&path).unwrap_err();
    assert!(matches!(err, WriteError::CreateDir { .. }), "{err}");
}

#[test]
fn parse_line_reverses_format_line() {
    let event = Event::from_millis(1_577_840_400_120, "t", "first\nsecond");
    let (seconds, payload) = parse_line(&format_line(&event)).unwrap();
    assert!((seconds - 1_577_840_400.12).abs() < 1e-6);
    assert_eq!(payload, b"first\nsecond");
}

#[test]
fn parse_line_keeps_commas_in_payload() {
    let (_, payload) = parse_line(b"         1.00,a,b,c\n").unwrap();
    assert_eq!(payload, b"a,b,c");
}

#[test]
fn parse_line_rejects_garbage() {
    assert!(parse_line(b"no comma here").is_none());
    assert!(parse_line(b"not-a-number,1").is_none());
}

proptest! {
    #[test]
    fn newline_escaping_roundtrips(payload in proptest::collection::vec(any::<u8>(), 0..256)) {
        // A literal backslash-n in the input is the documented ambiguity
        prop_assume!(!payload.windows(2).any(|w| w == b"\\n"));

        let escaped = escape_newlines(&payload);
        prop_assert!(!escaped.contains(&b'\n'));
        prop_assert_eq!(unescape_newlines(&escaped), payload);
    }
}
