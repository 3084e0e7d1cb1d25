//! Tests against concrete byte layouts.

use crate::npy_from_parts;
use npy_codec::{from_buffer, to_buffer, DType, NpyArray, Version};

fn header_len(bytes: &[u8]) -> usize {
    u16::from_le_bytes([bytes[8], bytes[9]]) as usize
}

#[test]
fn write_f32_2x2() {
    let arr = NpyArray::from_vec(vec![2, 2], false, vec![1.0f32, 2.0, 3.0, 4.0]).unwrap();
    let bytes = to_buffer(&arr).unwrap();

    assert_eq!(&bytes[..6], &[0x93, 0x4e, 0x55, 0x4d, 0x50, 0x59]);
    assert_eq!(&bytes[6..8], &[0x01, 0x00]);

    // The 61-character header text does not fit in 54 bytes, so the data
    // starts at the second 64-byte boundary.
    let header_len = header_len(&bytes);
    assert_eq!(header_len, 118);
    assert_eq!(bytes.len(), 128 + 2 * 2 * 4);

    let text = std::str::from_utf8(&bytes[10..10 + header_len]).unwrap();
    assert_eq!(
        text.trim_end_matches(&[' ', '\n'][..]),
        "{'descr': '<f4', 'fortran_order': False, 'shape': (2, 2,), }"
    );
    assert!(text.ends_with(" \n"));

    let mut data = Vec::new();
    for value in &[1.0f32, 2.0, 3.0, 4.0] {
        data.extend_from_slice(&value.to_le_bytes());
    }
    assert_eq!(&bytes[bytes.len() - 16..], &data[..]);
    assert_eq!(
        &bytes[bytes.len() - 16..bytes.len() - 12],
        &[0x00, 0x00, 0x80, 0x3f]
    );
}

#[test]
fn write_u8_fortran() {
    let arr = NpyArray::from_vec(vec![3, 1], true, vec![7u8, 8, 9]).unwrap();
    let bytes = to_buffer(&arr).unwrap();
    let header_len = header_len(&bytes);
    assert_eq!((10 + header_len) % 64, 0);
    assert_eq!(bytes[9 + header_len], b'\n');
    let text = std::str::from_utf8(&bytes[10..10 + header_len]).unwrap();
    assert!(text.starts_with("{'descr': '|u1', 'fortran_order': True, 'shape': (3, 1,), } "));
    assert_eq!(&bytes[10 + header_len..], &[7, 8, 9]);
}

#[test]
fn read_numpy_f8_standard() {
    let mut data = Vec::new();
    for i in 0..6 {
        data.extend_from_slice(&(i as f64).to_le_bytes());
    }
    let bytes = npy_from_parts(
        "{'descr': '<f8', 'fortran_order': False, 'shape': (2, 3), }",
        &data,
    );
    let arr = from_buffer(&bytes).unwrap();
    assert_eq!(arr.dtype(), DType::F64);
    assert_eq!(arr.shape(), &[2, 3]);
    assert!(!arr.fortran_order());
    assert_eq!(arr.version(), Version::V1_0);
    assert_eq!(arr.to_vec::<f64>().unwrap(), vec![0., 1., 2., 3., 4., 5.]);
}

#[test]
fn read_numpy_i1_one_dimensional() {
    let bytes = npy_from_parts(
        "{'descr': '|i1', 'fortran_order': True, 'shape': (4,), }",
        &[0xff, 0x00, 0x80, 0x7f],
    );
    let arr = from_buffer(&bytes).unwrap();
    assert!(arr.fortran_order());
    assert_eq!(arr.as_slice::<i8>(), Some(&[-1i8, 0, -128, 127][..]));
    // One-byte elements never need copying.
    assert!(arr.data().is_view());
}

#[test]
fn read_compact_header() {
    // Minimal whitespace, keys out of order, no trailing commas.
    let bytes = npy_from_parts(
        "{'shape':(2,),'descr':'<u2','fortran_order':False}",
        &[0x01, 0x00, 0x00, 0x01],
    );
    let arr = from_buffer(&bytes).unwrap();
    assert_eq!(arr.to_vec::<u16>().unwrap(), vec![1, 256]);
}

#[test]
fn read_other_version() {
    let mut bytes = npy_from_parts(
        "{'descr': '<i4', 'fortran_order': False, 'shape': (1,), }",
        &(-2i32).to_le_bytes(),
    );
    bytes[6] = 2;
    let arr = from_buffer(&bytes).unwrap();
    assert_eq!(arr.version(), Version { major: 2, minor: 0 });
    assert_eq!(arr.to_vec::<i32>().unwrap(), vec![-2]);
}

#[test]
fn read_unaligned_header_length() {
    // A header region that does not end on a 64-byte boundary is still
    // accepted.
    let text = "{'descr': '<u4', 'fortran_order': False, 'shape': (1,), }\n";
    let mut bytes = b"\x93NUMPY\x01\x00".to_vec();
    bytes.extend_from_slice(&(text.len() as u16).to_le_bytes());
    bytes.extend_from_slice(text.as_bytes());
    bytes.extend_from_slice(&0xdead_beef_u32.to_le_bytes());
    assert_ne!((10 + text.len()) % 64, 0);
    let arr = from_buffer(&bytes).unwrap();
    assert_eq!(arr.to_vec::<u32>().unwrap(), vec![0xdead_beef]);
}
