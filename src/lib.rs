//! This crate provides a codec for the [`.npy`] file format: decoding a byte
//! buffer into a shaped, typed [`NpyArray`] and encoding such an array back
//! into the same byte layout.
//!
//! [`.npy`]: https://numpy.org/doc/stable/reference/generated/numpy.lib.format.html
//!
//! See [`from_buffer`] and [`to_buffer`] for the codec itself, and [`load`]
//! and [`save`] for reading/writing whole files.
//!
//! Decoding borrows the input buffer where possible: on little-endian hosts,
//! when the data after the header is aligned for its element type, the
//! returned array is a view into the buffer rather than a copy. Encoded
//! headers are padded so that the data starts at a multiple of 64 bytes,
//! which makes this the common case for buffers from an allocator or a
//! memory map.
//!
//! With the `ndarray` feature, [`WriteNpyExt`] encodes any `ArrayBase` and
//! [`NpyArray::to_ndarray`] converts a decoded array into an `ArrayD`.
//!
//! # Limitations
//!
//! * Only the element types `|u1`, `|i1`, `<u2`, `<i2`, `<u4`, `<i4`,
//!   `<f4` and `<f8` are supported. Structured types, big-endian types and
//!   pickled object arrays are not.
//!
//! * Only the version 1.0 header layout (2-byte header length) is
//!   supported. Headers of other versions are read with that layout.
//!
//! * The `fortran_order` flag is recorded and reproduced but elements are
//!   never reordered; interpreting the flat data is up to the caller.

mod npy;
#[cfg(feature = "fs")]
mod file;
#[cfg(feature = "ndarray")]
mod ndarray_ext;

pub use crate::npy::elements::Clamped;
pub use crate::npy::header::{ParseHeaderError, Version};
pub use crate::npy::{
    encode_raw, encode_slice, from_buffer, to_buffer, ArrayData, DType, NpyArray, ReadNpyError,
    ReadableElement, ShapeMismatchError, TruncatedBufferError, UnsupportedTypeError,
    WritableElement, WriteNpyError,
};
#[cfg(feature = "fs")]
pub use crate::file::{load, save};
#[cfg(feature = "ndarray")]
pub use crate::ndarray_ext::WriteNpyExt;
