//! Trait implementations for primitive element types.

use super::view_le_bytes;
use crate::{ArrayData, DType, ReadableElement, WritableElement};
use byteorder::{ByteOrder, LittleEndian};
use std::borrow::Cow;
use std::slice;

macro_rules! impl_primitive_multi_byte {
    ($elem:ty, $dtype:ident, $read_into:ident, $write_into:ident) => {
        impl WritableElement for $elem {
            fn dtype() -> DType {
                DType::$dtype
            }

            fn write_slice(slice: &[Self], out: &mut [u8]) {
                LittleEndian::$write_into(slice, out);
            }
        }

        impl ReadableElement for $elem {
            fn read_le_slice(bytes: &[u8]) -> Cow<'_, [Self]> {
                // Every bit pattern is a valid value of this type.
                match unsafe { view_le_bytes::<Self>(bytes) } {
                    Some(view) => Cow::Borrowed(view),
                    None => {
                        let mut out = vec![0 as $elem; bytes.len() / std::mem::size_of::<Self>()];
                        LittleEndian::$read_into(bytes, &mut out);
                        Cow::Owned(out)
                    }
                }
            }

            fn into_data(elems: Cow<'_, [Self]>) -> ArrayData<'_> {
                ArrayData::$dtype(elems)
            }

            fn data_as_slice<'s>(data: &'s ArrayData<'_>) -> Option<&'s [Self]> {
                match data {
                    ArrayData::$dtype(elems) => Some(&**elems),
                    _ => None,
                }
            }
        }
    };
}

impl WritableElement for u8 {
    fn dtype() -> DType {
        DType::U8
    }

    fn write_slice(slice: &[Self], out: &mut [u8]) {
        out.copy_from_slice(slice);
    }
}

impl ReadableElement for u8 {
    fn read_le_slice(bytes: &[u8]) -> Cow<'_, [Self]> {
        Cow::Borrowed(bytes)
    }

    fn into_data(elems: Cow<'_, [Self]>) -> ArrayData<'_> {
        ArrayData::U8(elems)
    }

    fn data_as_slice<'s>(data: &'s ArrayData<'_>) -> Option<&'s [Self]> {
        match data {
            ArrayData::U8(elems) => Some(&**elems),
            _ => None,
        }
    }
}

impl WritableElement for i8 {
    fn dtype() -> DType {
        DType::I8
    }

    fn write_slice(slice: &[Self], out: &mut [u8]) {
        for (byte, &elem) in out.iter_mut().zip(slice) {
            *byte = elem as u8;
        }
    }
}

impl ReadableElement for i8 {
    fn read_le_slice(bytes: &[u8]) -> Cow<'_, [Self]> {
        // `i8` has the same size and alignment as `u8`, and every byte is a
        // valid `i8`.
        Cow::Borrowed(unsafe { slice::from_raw_parts(bytes.as_ptr().cast::<i8>(), bytes.len()) })
    }

    fn into_data(elems: Cow<'_, [Self]>) -> ArrayData<'_> {
        ArrayData::I8(elems)
    }

    fn data_as_slice<'s>(data: &'s ArrayData<'_>) -> Option<&'s [Self]> {
        match data {
            ArrayData::I8(elems) => Some(&**elems),
            _ => None,
        }
    }
}

impl_primitive_multi_byte!(u16, U16, read_u16_into, write_u16_into);
impl_primitive_multi_byte!(i16, I16, read_i16_into, write_i16_into);
impl_primitive_multi_byte!(u32, U32, read_u32_into, write_u32_into);
impl_primitive_multi_byte!(i32, I32, read_i32_into, write_i32_into);
impl_primitive_multi_byte!(f32, F32, read_f32_into, write_f32_into);
impl_primitive_multi_byte!(f64, F64, read_f64_into, write_f64_into);
