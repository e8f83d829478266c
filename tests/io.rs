/*!
 * Integer File Tests
 */

use lockbench::io::{read_integers, write_count, write_integers};
use lockbench::InputError;
use std::fs;

#[test]
fn test_read_mixed_whitespace() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("input.txt");
    fs::write(&path, "5 3\n3\t9\n\n-1\n").unwrap();

    assert_eq!(read_integers(&path).unwrap(), vec![5, 3, 3, 9, -1]);
}

#[test]
fn test_write_then_read() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sorted.txt");

    write_integers(&path, &[-4, 0, 17]).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "-4\n0\n17\n");
    assert_eq!(read_integers(&path).unwrap(), vec![-4, 0, 17]);
}

#[test]
fn test_write_count() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("count.txt");

    write_count(&path, 6).unwrap();
    assert_eq!(fs::read_to_string(&path).unwrap(), "6\n");
}

#[test]
fn test_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.txt");
    fs::write(&path, "").unwrap();

    assert!(read_integers(&path).unwrap().is_empty());
}

#[test]
fn test_write_into_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let err = write_count(dir.path().join("missing").join("count.txt"), 1).unwrap_err();
    assert!(matches!(err, InputError::Write { .. }));
}
