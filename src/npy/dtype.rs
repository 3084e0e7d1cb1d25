//! The closed table of supported element types.

use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::str::FromStr;

/// Element type of an `.npy` array, identified in the header by its `descr`
/// tag.
///
/// Only the eight fixed-width little-endian (or byte-sized) numeric types
/// below are supported.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DType {
    /// `|u1`
    U8,
    /// `|i1`
    I8,
    /// `<u2`
    U16,
    /// `<i2`
    I16,
    /// `<u4`
    U32,
    /// `<i4`
    I32,
    /// `<f4`
    F32,
    /// `<f8`
    F64,
}

impl DType {
    /// All supported element types.
    pub const ALL: [DType; 8] = [
        DType::U8,
        DType::I8,
        DType::U16,
        DType::I16,
        DType::U32,
        DType::I32,
        DType::F32,
        DType::F64,
    ];

    /// Looks up the element type for a `descr` tag.
    pub fn from_descr(descr: &str) -> Result<DType, UnsupportedTypeError> {
        match descr {
            "|u1" => Ok(DType::U8),
            "|i1" => Ok(DType::I8),
            "<u2" => Ok(DType::U16),
            "<i2" => Ok(DType::I16),
            "<u4" => Ok(DType::U32),
            "<i4" => Ok(DType::I32),
            "<f4" => Ok(DType::F32),
            "<f8" => Ok(DType::F64),
            other => Err(UnsupportedTypeError {
                descr: other.to_owned(),
            }),
        }
    }

    /// The `descr` tag written to the header for this element type.
    pub fn descr(self) -> &'static str {
        match self {
            DType::U8 => "|u1",
            DType::I8 => "|i1",
            DType::U16 => "<u2",
            DType::I16 => "<i2",
            DType::U32 => "<u4",
            DType::I32 => "<i4",
            DType::F32 => "<f4",
            DType::F64 => "<f8",
        }
    }

    /// Number of bytes occupied by one element.
    pub fn width(self) -> usize {
        match self {
            DType::U8 | DType::I8 => 1,
            DType::U16 | DType::I16 => 2,
            DType::U32 | DType::I32 | DType::F32 => 4,
            DType::F64 => 8,
        }
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.descr())
    }
}

impl FromStr for DType {
    type Err = UnsupportedTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DType::from_descr(s)
    }
}

/// An element type tag that is not in the supported table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnsupportedTypeError {
    descr: String,
}

impl UnsupportedTypeError {
    /// The rejected `descr` tag.
    pub fn descr(&self) -> &str {
        &self.descr
    }
}

impl Error for UnsupportedTypeError {}

impl fmt::Display for UnsupportedTypeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "unsupported element type: {:?}", self.descr)
    }
}

/// Flat element data of an array, tagged with its element type.
///
/// Data decoded from a buffer borrows that buffer when the bytes can be
/// reinterpreted in place (little-endian host, suitably aligned data) and is
/// an owned copy otherwise.
#[derive(Clone, Debug, PartialEq)]
pub enum ArrayData<'a> {
    /// `|u1` elements.
    U8(Cow<'a, [u8]>),
    /// `|i1` elements.
    I8(Cow<'a, [i8]>),
    /// `<u2` elements.
    U16(Cow<'a, [u16]>),
    /// `<i2` elements.
    I16(Cow<'a, [i16]>),
    /// `<u4` elements.
    U32(Cow<'a, [u32]>),
    /// `<i4` elements.
    I32(Cow<'a, [i32]>),
    /// `<f4` elements.
    F32(Cow<'a, [f32]>),
    /// `<f8` elements.
    F64(Cow<'a, [f64]>),
}

/// Evaluates `$body` with `$elems` bound to the `Cow` slice of whichever
/// variant `$data` holds.
macro_rules! with_elems {
    ($data:expr, $elems:ident => $body:expr) => {
        match $data {
            $crate::ArrayData::U8($elems) => $body,
            $crate::ArrayData::I8($elems) => $body,
            $crate::ArrayData::U16($elems) => $body,
            $crate::ArrayData::I16($elems) => $body,
            $crate::ArrayData::U32($elems) => $body,
            $crate::ArrayData::I32($elems) => $body,
            $crate::ArrayData::F32($elems) => $body,
            $crate::ArrayData::F64($elems) => $body,
        }
    };
}

impl<'a> ArrayData<'a> {
    /// Element type of the data.
    pub fn dtype(&self) -> DType {
        match self {
            ArrayData::U8(_) => DType::U8,
            ArrayData::I8(_) => DType::I8,
            ArrayData::U16(_) => DType::U16,
            ArrayData::I16(_) => DType::I16,
            ArrayData::U32(_) => DType::U32,
            ArrayData::I32(_) => DType::I32,
            ArrayData::F32(_) => DType::F32,
            ArrayData::F64(_) => DType::F64,
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        with_elems!(self, elems => elems.len())
    }

    /// Returns `true` if there are no elements.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns `true` if the data borrows the buffer it was decoded from.
    pub fn is_view(&self) -> bool {
        with_elems!(self, elems => matches!(elems, Cow::Borrowed(_)))
    }

    /// Copies borrowed data so that the result owns its storage.
    pub fn into_owned(self) -> ArrayData<'static> {
        match self {
            ArrayData::U8(e) => ArrayData::U8(Cow::Owned(e.into_owned())),
            ArrayData::I8(e) => ArrayData::I8(Cow::Owned(e.into_owned())),
            ArrayData::U16(e) => ArrayData::U16(Cow::Owned(e.into_owned())),
            ArrayData::I16(e) => ArrayData::I16(Cow::Owned(e.into_owned())),
            ArrayData::U32(e) => ArrayData::U32(Cow::Owned(e.into_owned())),
            ArrayData::I32(e) => ArrayData::I32(Cow::Owned(e.into_owned())),
            ArrayData::F32(e) => ArrayData::F32(Cow::Owned(e.into_owned())),
            ArrayData::F64(e) => ArrayData::F64(Cow::Owned(e.into_owned())),
        }
    }

    /// Interprets `bytes` as little-endian elements of type `dtype`.
    ///
    /// `bytes.len()` must be a multiple of `dtype.width()`.
    pub(crate) fn from_le_bytes(dtype: DType, bytes: &'a [u8]) -> ArrayData<'a> {
        use crate::ReadableElement;
        debug_assert_eq!(bytes.len() % dtype.width(), 0);
        match dtype {
            DType::U8 => u8::into_data(u8::read_le_slice(bytes)),
            DType::I8 => i8::into_data(i8::read_le_slice(bytes)),
            DType::U16 => u16::into_data(u16::read_le_slice(bytes)),
            DType::I16 => i16::into_data(i16::read_le_slice(bytes)),
            DType::U32 => u32::into_data(u32::read_le_slice(bytes)),
            DType::I32 => i32::into_data(i32::read_le_slice(bytes)),
            DType::F32 => f32::into_data(f32::read_le_slice(bytes)),
            DType::F64 => f64::into_data(f64::read_le_slice(bytes)),
        }
    }
}
