//! Conversions between [`NpyArray`] and `ndarray`'s `ArrayBase`.

use crate::{encode_slice, NpyArray, ReadNpyError, ReadableElement, WritableElement, WriteNpyError};
use ndarray::prelude::*;
use ndarray::Data;

/// Extension trait for encoding `ArrayBase` as an `.npy` buffer.
///
/// Arrays in standard layout are written with `fortran_order: False`,
/// arrays in Fortran layout are written as is with `fortran_order: True`,
/// and any other layout is copied in logical (row-major) order.
///
/// # Example
///
/// ```
/// use ndarray::array;
/// use npy_codec::{from_buffer, WriteNpyExt};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let arr = array![[1.0f32, 2.0], [3.0, 4.0]];
/// let bytes = arr.to_npy_buffer()?;
/// let decoded = from_buffer(&bytes)?;
/// assert_eq!(decoded.to_ndarray::<f32>()?, arr.into_dyn());
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub trait WriteNpyExt {
    /// Encodes the array into a new `.npy` buffer.
    fn to_npy_buffer(&self) -> Result<Vec<u8>, WriteNpyError>;
}

impl<A, S, D> WriteNpyExt for ArrayBase<S, D>
where
    A: WritableElement + Clone,
    S: Data<Elem = A>,
    D: Dimension,
{
    fn to_npy_buffer(&self) -> Result<Vec<u8>, WriteNpyError> {
        if let Some(slice) = self.as_slice() {
            encode_slice(self.shape(), false, slice)
        } else if let Some(slice) = self.view().reversed_axes().to_slice() {
            encode_slice(self.shape(), true, slice)
        } else {
            let elems: Vec<A> = self.iter().cloned().collect();
            encode_slice(self.shape(), false, &elems)
        }
    }
}

impl<'a> NpyArray<'a> {
    /// Copies the elements into an `ArrayD` with this array's shape.
    ///
    /// The flat data is interpreted in column-major order when
    /// `fortran_order` is set and in row-major order otherwise.
    pub fn to_ndarray<A: ReadableElement>(&self) -> Result<ArrayD<A>, ReadNpyError> {
        let data = self.to_vec::<A>()?;
        let shape = self.shape().to_vec();
        let shape = if self.fortran_order() {
            shape.f()
        } else {
            shape.into_shape()
        };
        Ok(ArrayD::from_shape_vec(shape, data)?)
    }
}
