// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::budget::MAX_BACKGROUND_FAILURES;
use yare::parameterized;

const KIB: usize = 1024;

fn rotator(threshold_kib: u64) -> (Rotator, ErrorBudget) {
    let budget = ErrorBudget::new();
    let archiver = Archiver::new(false, budget.clone());
    (Rotator::new(threshold_kib, budget.clone(), archiver), budget)
}

fn write_bytes(path: &Path, len: usize) {
    std::fs::write(path, vec![b'x'; len]).unwrap();
}

#[parameterized(
    plain = { "power", "power.7", Some(7) },
    archived = { "power", "power.12.gz", Some(12) },
    live_file = { "power", "power", None },
    other_topic = { "power", "powerful.3", None },
    no_digits = { "power", "power.", None },
    non_numeric = { "power", "power.old", None },
    trailing_junk = { "power", "power.3.tmp", None },
    zero = { "power", "power.0", Some(0) },
)]
fn slot_parsing(base: &str, name: &str, expected: Option<u64>) {
    assert_eq!(parse_slot(base, name), expected);
}

#[test]
fn missing_file_is_not_rotated() {
    let dir = tempfile::tempdir().unwrap();
    let (rotator, budget) = rotator(1);

    assert_eq!(rotator.maybe_rotate(&dir.path().join("power")).unwrap(), None);
    assert_eq!(budget.failures(), 0);
}

#[test]
fn small_file_is_not_rotated() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("power");
    write_bytes(&path, KIB - 1);

    let (rotator, _) = rotator(1);
    assert_eq!(rotator.maybe_rotate(&path).unwrap(), None);
    assert!(path.exists());
}

#[test]
fn zero_threshold_disables_rotation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("power");
    write_bytes(&path, 10 * KIB);

    let (rotator, _) = rotator(0);
    assert_eq!(rotator.maybe_rotate(&path).unwrap(), None);
    assert!(path.exists());
}

#[test]
fn full_file_moves_to_first_slot() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("power");
    write_bytes(&path, KIB);

    let (rotator, _) = rotator(1);
    let rotation = rotator.maybe_rotate(&path).unwrap().unwrap();

    assert_eq!(rotation.rotated_to, dir.path().join("power.1"));
    assert_eq!(rotation.archived, None);
    assert!(!path.exists());
    assert!(dir.path().join("power.1").exists());
}

#[test]
fn numbering_continues_past_gaps_and_archives() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("power");
    write_bytes(&path, 2 * KIB);
    write_bytes(&dir.path().join("power.2"), 1);
    write_bytes(&dir.path().join("power.5.gz"), 1);
    write_bytes(&dir.path().join("powerful.9"), 1);

    let (rotator, _) = rotator(1);
    let rotation = rotator.maybe_rotate(&path).unwrap().unwrap();

    assert_eq!(rotation.rotated_to, dir.path().join("power.6"));
    // power.5 only exists as an archive, so there is nothing left to compress
    assert_eq!(rotation.archived, None);
}

#[test]
fn directories_do_not_count_as_slots() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("power");
    write_bytes(&path, KIB);
    std::fs::create_dir(dir.path().join("power.9")).unwrap();

    let (rotator, _) = rotator(1);
    let rotation = rotator.maybe_rotate(&path).unwrap().unwrap();
    assert_eq!(rotation.rotated_to, dir.path().join("power.1"));
}

#[test]
fn previous_slot_is_handed_to_archiver() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("power");
    write_bytes(&path, KIB);
    write_bytes(&dir.path().join("power.1"), KIB);

    let budget = ErrorBudget::new();
    let rotator = Rotator::new(1, budget.clone(), Archiver::new(false, budget));
    let rotation = rotator.maybe_rotate(&path).unwrap().unwrap();

    assert_eq!(rotation.rotated_to, dir.path().join("power.2"));
    assert_eq!(rotation.archived, Some(dir.path().join("power.1")));
}

#[test]
fn non_file_is_an_error_and_counted() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("power");
    std::fs::create_dir(&path).unwrap();

    let (rotator, budget) = rotator(1);
    let err = rotator.maybe_rotate(&path).unwrap_err();

    assert!(matches!(err, RotationError::NotAFile(_)), "{err}");
    assert_eq!(budget.failures(), 1);
}

#[test]
fn exhausted_budget_disables_rotation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("power");
    write_bytes(&path, KIB);

    let (rotator, budget) = rotator(1);
    for _ in 0..=MAX_BACKGROUND_FAILURES {
        budget.record_failure();
    }

    assert_eq!(rotator.maybe_rotate(&path).unwrap(), None);
    assert!(path.exists());
}

#[test]
fn slot_path_appends_suffix() {
    assert_eq!(
        slot_path(Path::new("/data/home/power"), 3),
        PathBuf::from("/data/home/power.3")
    );
}
