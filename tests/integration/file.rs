//! Tests for `load` and `save`.

use memmap2::Mmap;
use npy_codec::{from_buffer, load, save, NpyArray, ReadNpyError, WriteNpyError};
use std::fs::{self, File};
use std::io;
use tempfile::tempdir;

#[test]
fn save_then_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("array.npy");
    let arr = NpyArray::from_vec(vec![2, 3], true, vec![1u32, 2, 3, 4, 5, 6]).unwrap();
    save(&path, &arr).unwrap();
    let loaded = load(&path).unwrap();
    assert_eq!(loaded, arr);
    assert!(!loaded.data().is_view());
}

#[test]
fn save_overwrites() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("array.npy");
    fs::write(&path, vec![0xaa; 4096]).unwrap();
    let arr = NpyArray::from_vec(vec![1], false, vec![9i8]).unwrap();
    save(&path, &arr).unwrap();
    assert_eq!(fs::metadata(&path).unwrap().len(), 129);
    assert_eq!(load(&path).unwrap().to_vec::<i8>().unwrap(), vec![9]);
}

#[test]
fn load_missing_file() {
    let dir = tempdir().unwrap();
    match load(dir.path().join("missing.npy")) {
        Err(ReadNpyError::Io(err)) => assert_eq!(err.kind(), io::ErrorKind::NotFound),
        other => panic!("unexpected result: {:?}", other),
    }
}

#[test]
fn load_corrupt_file_is_not_io_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("corrupt.npy");
    fs::write(&path, b"definitely not npy").unwrap();
    assert!(matches!(load(&path), Err(ReadNpyError::ParseHeader(_))));
}

#[test]
fn save_into_missing_directory() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("no").join("such").join("dir.npy");
    let arr = NpyArray::from_vec(vec![1], false, vec![1.0f64]).unwrap();
    assert!(matches!(save(&path, &arr), Err(WriteNpyError::Io(_))));
}

#[test]
fn view_memory_mapped_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("mapped.npy");
    let data: Vec<f64> = (0..1000).map(|i| i as f64 * 0.5).collect();
    let arr = NpyArray::from_slice(vec![10, 100], false, &data).unwrap();
    save(&path, &arr).unwrap();

    let file = File::open(&path).unwrap();
    // The file is not modified while the map is alive.
    let mmap = unsafe { Mmap::map(&file) }.unwrap();
    let view = from_buffer(&mmap).unwrap();
    if cfg!(target_endian = "little") {
        assert!(view.data().is_view());
    }
    assert_eq!(view.as_slice::<f64>(), Some(&data[..]));
}
