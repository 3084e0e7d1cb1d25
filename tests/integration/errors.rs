//! Tests that malformed input is rejected with the right kind of error.

use crate::npy_from_parts;
use npy_codec::{
    encode_raw, from_buffer, to_buffer, NpyArray, ParseHeaderError, ReadNpyError,
    TruncatedBufferError, WriteNpyError,
};

fn valid_f32_buffer() -> Vec<u8> {
    let arr = NpyArray::from_vec(vec![2, 2], false, vec![1.0f32, 2.0, 3.0, 4.0]).unwrap();
    to_buffer(&arr).unwrap()
}

#[test]
fn bad_magic() {
    let mut bytes = valid_f32_buffer();
    for i in 0..6 {
        let original = bytes[i];
        bytes[i] ^= 0x20;
        assert!(matches!(
            from_buffer(&bytes),
            Err(ReadNpyError::ParseHeader(ParseHeaderError::MagicString))
        ));
        bytes[i] = original;
    }
    assert!(matches!(
        from_buffer(b"PK\x03\x04"),
        Err(ReadNpyError::ParseHeader(ParseHeaderError::MagicString))
    ));
}

#[test]
fn short_preamble() {
    let bytes = valid_f32_buffer();
    for len in 0..10 {
        assert!(matches!(
            from_buffer(&bytes[..len]),
            Err(ReadNpyError::Truncated(TruncatedBufferError::Preamble { .. }))
        ));
    }
}

#[test]
fn header_length_beyond_end() {
    let mut bytes = valid_f32_buffer();
    bytes[8..10].copy_from_slice(&u16::MAX.to_le_bytes());
    match from_buffer(&bytes) {
        Err(ReadNpyError::Truncated(TruncatedBufferError::HeaderRegion {
            header_len,
            available,
        })) => {
            assert_eq!(header_len, u16::MAX as usize);
            assert_eq!(available, bytes.len() - 10);
        }
        other => panic!("unexpected result: {:?}", other),
    }
    // Cutting the buffer inside the header region has the same effect.
    let bytes = valid_f32_buffer();
    assert!(matches!(
        from_buffer(&bytes[..40]),
        Err(ReadNpyError::Truncated(TruncatedBufferError::HeaderRegion { .. }))
    ));
}

#[test]
fn partial_element() {
    let bytes = valid_f32_buffer();
    for cut in 1..4 {
        match from_buffer(&bytes[..bytes.len() - cut]) {
            Err(ReadNpyError::Truncated(TruncatedBufferError::PartialElement {
                data_len,
                width,
            })) => {
                assert_eq!(data_len, 16 - cut);
                assert_eq!(width, 4);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}

#[test]
fn missing_and_extra_elements() {
    let bytes = valid_f32_buffer();
    assert!(matches!(
        from_buffer(&bytes[..bytes.len() - 4]),
        Err(ReadNpyError::Truncated(TruncatedBufferError::MissingBytes(4)))
    ));
    let mut bytes = bytes;
    bytes.extend_from_slice(&5.0f32.to_le_bytes());
    assert!(matches!(
        from_buffer(&bytes),
        Err(ReadNpyError::ExtraBytes(4))
    ));
}

#[test]
fn unsupported_descr_on_read() {
    for descr in &["<i8", ">f4", "|b1", "<c8", "|O"] {
        let text = format!(
            "{{'descr': '{}', 'fortran_order': False, 'shape': (1,), }}",
            descr
        );
        let bytes = npy_from_parts(&text, &[0; 8]);
        match from_buffer(&bytes) {
            Err(ReadNpyError::UnsupportedType(err)) => {
                assert_eq!(err.descr(), descr.to_lowercase())
            }
            other => panic!("unexpected result for {}: {:?}", descr, other),
        }
    }
}

#[test]
fn structured_descr_is_malformed() {
    let bytes = npy_from_parts(
        "{'descr': [('x', '<f4')], 'fortran_order': False, 'shape': (1,), }",
        &[0; 4],
    );
    assert!(matches!(
        from_buffer(&bytes),
        Err(ReadNpyError::ParseHeader(ParseHeaderError::IllegalValue { key: "descr", .. }))
    ));
}

#[test]
fn malformed_header() {
    for text in &[
        "{'descr': '<f4', 'fortran_order': False, 'shape': (1,)",
        "{'descr': '<f4', 'fortran_order': False}",
        "not a dict at all",
        "{'descr': '<f4', 'fortran_order': Maybe, 'shape': (1,), }",
    ] {
        let bytes = npy_from_parts(text, &[0; 4]);
        match from_buffer(&bytes) {
            Err(ReadNpyError::ParseHeader(_)) => {}
            other => panic!("unexpected result for {:?}: {:?}", text, other),
        }
    }
}

#[test]
fn unsupported_descr_on_write() {
    match encode_raw("<i8", &[1], false, &[0; 8]) {
        Err(WriteNpyError::UnsupportedType(err)) => assert_eq!(err.descr(), "<i8"),
        other => panic!("unexpected result: {:?}", other),
    }
    assert!(matches!(
        encode_raw("float32", &[1], false, &[0; 4]),
        Err(WriteNpyError::UnsupportedType(_))
    ));
}

#[test]
fn error_messages() {
    let err = from_buffer(b"\x93NUMPX\x01\x00").unwrap_err();
    assert_eq!(
        err.to_string(),
        "error parsing header: bad magic: start does not match magic string"
    );
    let err = encode_raw("<c16", &[1], false, &[0; 16]).unwrap_err();
    assert_eq!(err.to_string(), "unsupported element type: \"<c16\"");
}
