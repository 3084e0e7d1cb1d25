use crate::{DType, WritableElement};

/// An 8-bit unsigned value that saturates at `0` and `255` when produced from
/// wider values, like the pixel channels of an RGBA image.
///
/// It is stored exactly like `u8`, so it is written with the `|u1` tag.
/// Reading never produces `Clamped`; read the data as `u8` instead.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct Clamped(pub u8);

impl Clamped {
    /// Rounds `value` to the nearest integer, with exact halves going to the
    /// even neighbour, and clamps it to `0..=255`. NaN maps to `0`.
    ///
    /// This matches the conversion of a JavaScript `Uint8ClampedArray`, so
    /// `0.5` becomes `0` and `2.5` becomes `2`.
    pub fn from_f64(value: f64) -> Clamped {
        if value.is_nan() {
            return Clamped(0);
        }
        // `f64::round` sends halves away from zero.
        let mut rounded = value.round();
        if (value - value.trunc()).abs() == 0.5 && rounded % 2.0 != 0.0 {
            rounded -= (rounded - value).signum();
        }
        // Float-to-int `as` casts saturate.
        Clamped(rounded as u8)
    }

    /// Clamps `value` to `0..=255`.
    pub fn from_i64(value: i64) -> Clamped {
        Clamped(value.clamp(0, 255) as u8)
    }
}

impl From<u8> for Clamped {
    fn from(value: u8) -> Clamped {
        Clamped(value)
    }
}

impl From<Clamped> for u8 {
    fn from(value: Clamped) -> u8 {
        value.0
    }
}

impl WritableElement for Clamped {
    fn dtype() -> DType {
        DType::U8
    }

    fn write_slice(slice: &[Self], out: &mut [u8]) {
        for (byte, elem) in out.iter_mut().zip(slice) {
            *byte = elem.0;
        }
    }
}
