#[macro_use]
mod dtype;
pub mod elements;
pub mod header;

pub use self::dtype::{ArrayData, DType, UnsupportedTypeError};
use self::header::{Header, ParseHeaderError, Version};
use log::debug;
use std::borrow::Cow;
use std::error::Error;
use std::fmt;
use std::io;

/// An array element type that can be written to an `.npy` file.
pub trait WritableElement: Sized {
    /// The element type recorded in the header.
    fn dtype() -> DType;

    /// Writes the elements of `slice` to `out` as little-endian bytes.
    ///
    /// **Panics** if `out.len() != slice.len() * Self::dtype().width()`.
    fn write_slice(slice: &[Self], out: &mut [u8]);
}

/// An array element type that can be read from an `.npy` file.
pub trait ReadableElement: WritableElement + Clone + 'static {
    /// Reinterprets little-endian `bytes` as elements, borrowing `bytes` when
    /// possible and copying otherwise.
    ///
    /// `bytes.len()` must be a multiple of the element width.
    fn read_le_slice(bytes: &[u8]) -> Cow<'_, [Self]>;

    /// Wraps the elements in the matching `ArrayData` variant.
    fn into_data(elems: Cow<'_, [Self]>) -> ArrayData<'_>;

    /// Returns the elements if `data` holds this element type.
    fn data_as_slice<'s>(data: &'s ArrayData<'_>) -> Option<&'s [Self]>;
}

/// The buffer is too short for what its header describes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TruncatedBufferError {
    /// The buffer ends before the end of the 10-byte preamble.
    Preamble { len: usize },
    /// The header length field points past the end of the buffer.
    HeaderRegion { header_len: usize, available: usize },
    /// The data after the header is not a whole number of elements.
    PartialElement { data_len: usize, width: usize },
    /// The data holds fewer elements than the shape requires; this many
    /// bytes are missing.
    MissingBytes(usize),
}

impl Error for TruncatedBufferError {}

impl fmt::Display for TruncatedBufferError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use TruncatedBufferError::*;
        match self {
            Preamble { len } => write!(f, "buffer of {} bytes ends inside the preamble", len),
            HeaderRegion {
                header_len,
                available,
            } => write!(
                f,
                "header length {} exceeds the {} bytes after the preamble",
                header_len, available
            ),
            PartialElement { data_len, width } => write!(
                f,
                "{} data bytes are not a multiple of the element width {}",
                data_len, width
            ),
            MissingBytes(num) => write!(f, "missing {} bytes of data", num),
        }
    }
}

/// An error reading an `.npy` buffer or file.
#[derive(Debug)]
pub enum ReadNpyError {
    /// An error caused by I/O.
    Io(io::Error),
    /// The magic string or the header dictionary is invalid.
    ParseHeader(ParseHeaderError),
    /// The header names an element type that is not supported.
    UnsupportedType(UnsupportedTypeError),
    /// The buffer is shorter than the header claims.
    Truncated(TruncatedBufferError),
    /// Extra bytes are present after the elements described by the shape.
    ExtraBytes(usize),
    /// The array holds a different element type than was requested.
    WrongDescriptor { requested: DType, found: DType },
    /// The shape could not be applied to the data.
    #[cfg(feature = "ndarray")]
    Shape(ndarray::ShapeError),
}

impl Error for ReadNpyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        use ReadNpyError::*;
        match self {
            Io(err) => Some(err),
            ParseHeader(err) => Some(err),
            UnsupportedType(err) => Some(err),
            Truncated(err) => Some(err),
            ExtraBytes(_) => None,
            WrongDescriptor { .. } => None,
            #[cfg(feature = "ndarray")]
            Shape(err) => Some(err),
        }
    }
}

impl fmt::Display for ReadNpyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use ReadNpyError::*;
        match self {
            Io(err) => write!(f, "I/O error: {}", err),
            ParseHeader(err) => write!(f, "error parsing header: {}", err),
            UnsupportedType(err) => write!(f, "{}", err),
            Truncated(err) => write!(f, "truncated buffer: {}", err),
            ExtraBytes(num_extra_bytes) => {
                write!(f, "file had {} extra bytes after the data", num_extra_bytes)
            }
            WrongDescriptor { requested, found } => write!(
                f,
                "requested element type {} but the array holds {}",
                requested, found
            ),
            #[cfg(feature = "ndarray")]
            Shape(err) => write!(f, "data did not match shape in header: {}", err),
        }
    }
}

impl From<io::Error> for ReadNpyError {
    fn from(err: io::Error) -> ReadNpyError {
        ReadNpyError::Io(err)
    }
}

impl From<ParseHeaderError> for ReadNpyError {
    fn from(err: ParseHeaderError) -> ReadNpyError {
        ReadNpyError::ParseHeader(err)
    }
}

impl From<UnsupportedTypeError> for ReadNpyError {
    fn from(err: UnsupportedTypeError) -> ReadNpyError {
        ReadNpyError::UnsupportedType(err)
    }
}

impl From<TruncatedBufferError> for ReadNpyError {
    fn from(err: TruncatedBufferError) -> ReadNpyError {
        ReadNpyError::Truncated(err)
    }
}

#[cfg(feature = "ndarray")]
impl From<ndarray::ShapeError> for ReadNpyError {
    fn from(err: ndarray::ShapeError) -> ReadNpyError {
        ReadNpyError::Shape(err)
    }
}

/// The shape does not describe the given number of elements.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShapeMismatchError {
    pub shape: Vec<usize>,
    pub len: usize,
}

impl Error for ShapeMismatchError {}

impl fmt::Display for ShapeMismatchError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "shape {:?} does not describe {} elements",
            self.shape, self.len
        )
    }
}

/// An error writing an `.npy` buffer or file.
#[derive(Debug)]
pub enum WriteNpyError {
    /// An error caused by I/O.
    Io(io::Error),
    /// The element type has no tag in the supported table.
    UnsupportedType(UnsupportedTypeError),
    /// The shape does not match the number of elements.
    ShapeMismatch(ShapeMismatchError),
    /// A zero-dimensional shape cannot be written.
    EmptyShape,
    /// The header needs more bytes than a version 1.0 header length can
    /// express.
    HeaderTooLong(usize),
}

impl Error for WriteNpyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        use WriteNpyError::*;
        match self {
            Io(err) => Some(err),
            UnsupportedType(err) => Some(err),
            ShapeMismatch(err) => Some(err),
            EmptyShape => None,
            HeaderTooLong(_) => None,
        }
    }
}

impl fmt::Display for WriteNpyError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use WriteNpyError::*;
        match self {
            Io(err) => write!(f, "I/O error: {}", err),
            UnsupportedType(err) => write!(f, "{}", err),
            ShapeMismatch(err) => write!(f, "{}", err),
            EmptyShape => write!(f, "cannot write an array with an empty shape"),
            HeaderTooLong(len) => write!(
                f,
                "header of {} bytes does not fit a version 1.0 header length",
                len
            ),
        }
    }
}

impl From<io::Error> for WriteNpyError {
    fn from(err: io::Error) -> WriteNpyError {
        WriteNpyError::Io(err)
    }
}

impl From<UnsupportedTypeError> for WriteNpyError {
    fn from(err: UnsupportedTypeError) -> WriteNpyError {
        WriteNpyError::UnsupportedType(err)
    }
}

impl From<ShapeMismatchError> for WriteNpyError {
    fn from(err: ShapeMismatchError) -> WriteNpyError {
        WriteNpyError::ShapeMismatch(err)
    }
}

/// Returns the number of elements described by `shape`, or `None` on
/// overflow.
fn shape_len(shape: &[usize]) -> Option<usize> {
    shape.iter().try_fold(1usize, |acc, &len| acc.checked_mul(len))
}

fn check_shape(shape: &[usize], len: usize) -> Result<(), ShapeMismatchError> {
    if shape_len(shape) == Some(len) {
        Ok(())
    } else {
        Err(ShapeMismatchError {
            shape: shape.to_owned(),
            len,
        })
    }
}

/// A shaped array of one of the supported element types.
///
/// Arrays returned by [`from_buffer`] may borrow the decoded buffer; use
/// [`NpyArray::into_owned`] to detach them from it.
#[derive(Clone, Debug, PartialEq)]
pub struct NpyArray<'a> {
    shape: Vec<usize>,
    fortran_order: bool,
    data: ArrayData<'a>,
    version: Version,
}

impl<'a> NpyArray<'a> {
    /// Creates an array from its parts.
    ///
    /// Returns an error if the product of `shape` is not `data.len()`.
    pub fn new(
        shape: Vec<usize>,
        fortran_order: bool,
        data: ArrayData<'a>,
    ) -> Result<Self, ShapeMismatchError> {
        check_shape(&shape, data.len())?;
        Ok(NpyArray {
            shape,
            fortran_order,
            data,
            version: Version::V1_0,
        })
    }

    /// Creates an array that owns `data`.
    pub fn from_vec<A: ReadableElement>(
        shape: Vec<usize>,
        fortran_order: bool,
        data: Vec<A>,
    ) -> Result<NpyArray<'static>, ShapeMismatchError> {
        NpyArray::new(shape, fortran_order, A::into_data(Cow::Owned(data)))
    }

    /// Creates an array that borrows `data`.
    pub fn from_slice<A: ReadableElement>(
        shape: Vec<usize>,
        fortran_order: bool,
        data: &'a [A],
    ) -> Result<Self, ShapeMismatchError> {
        NpyArray::new(shape, fortran_order, A::into_data(Cow::Borrowed(data)))
    }

    /// The length of each axis.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Whether the elements are laid out in column-major order.
    ///
    /// This is recorded and reproduced as is; elements are never reordered.
    pub fn fortran_order(&self) -> bool {
        self.fortran_order
    }

    /// The element type.
    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    /// The format version the array was read with.
    pub fn version(&self) -> Version {
        self.version
    }

    /// The flat element data.
    pub fn data(&self) -> &ArrayData<'a> {
        &self.data
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the array has no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns the elements if the array holds element type `A`.
    pub fn as_slice<A: ReadableElement>(&self) -> Option<&[A]> {
        A::data_as_slice(&self.data)
    }

    /// Copies the elements out as element type `A`.
    pub fn to_vec<A: ReadableElement>(&self) -> Result<Vec<A>, ReadNpyError> {
        self.as_slice::<A>()
            .map(<[A]>::to_vec)
            .ok_or(ReadNpyError::WrongDescriptor {
                requested: A::dtype(),
                found: self.dtype(),
            })
    }

    /// Splits the array into its shape, order flag and data.
    pub fn into_parts(self) -> (Vec<usize>, bool, ArrayData<'a>) {
        (self.shape, self.fortran_order, self.data)
    }

    /// Copies borrowed data so that the result owns its storage.
    pub fn into_owned(self) -> NpyArray<'static> {
        NpyArray {
            shape: self.shape,
            fortran_order: self.fortran_order,
            data: self.data.into_owned(),
            version: self.version,
        }
    }
}

/// Decodes an `.npy` buffer.
///
/// The returned array borrows `bytes` when the host is little-endian and the
/// data is aligned for its element type; otherwise the elements are copied.
///
/// # Example
///
/// ```
/// use npy_codec::{from_buffer, to_buffer, NpyArray};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let arr = NpyArray::from_vec(vec![2, 3], false, vec![1i32, 2, 3, 4, 5, 6])?;
/// let bytes = to_buffer(&arr)?;
/// let decoded = from_buffer(&bytes)?;
/// assert_eq!(decoded.shape(), &[2, 3]);
/// assert_eq!(decoded.as_slice::<i32>(), Some(&[1, 2, 3, 4, 5, 6][..]));
/// # Ok(())
/// # }
/// # example().unwrap();
/// ```
pub fn from_buffer(bytes: &[u8]) -> Result<NpyArray<'_>, ReadNpyError> {
    let (header, version, data) = Header::from_bytes(bytes)?;
    let dtype = DType::from_descr(&header.type_descriptor)?;
    let width = dtype.width();
    if data.len() % width != 0 {
        return Err(TruncatedBufferError::PartialElement {
            data_len: data.len(),
            width,
        }
        .into());
    }

    // `Header` guarantees that the product does not overflow.
    let len = shape_len(&header.shape).unwrap_or(usize::MAX);
    let available = data.len() / width;
    if available < len {
        let missing = (len - available).saturating_mul(width);
        return Err(TruncatedBufferError::MissingBytes(missing).into());
    } else if available > len {
        return Err(ReadNpyError::ExtraBytes((available - len) * width));
    }

    let data = ArrayData::from_le_bytes(dtype, data);
    debug!(
        "decoded {} array of shape {:?} (fortran_order: {}, view: {})",
        dtype,
        header.shape,
        header.fortran_order,
        data.is_view()
    );
    Ok(NpyArray {
        shape: header.shape,
        fortran_order: header.fortran_order,
        data,
        version,
    })
}

/// Writes the preamble and header for `len` elements of `dtype`, then lets
/// `write_data` fill in the element bytes.
fn encode_with<F>(
    dtype: DType,
    shape: &[usize],
    fortran_order: bool,
    len: usize,
    write_data: F,
) -> Result<Vec<u8>, WriteNpyError>
where
    F: FnOnce(&mut [u8]),
{
    if shape.is_empty() {
        return Err(WriteNpyError::EmptyShape);
    }
    check_shape(shape, len)?;
    let header = Header {
        type_descriptor: dtype.descr().to_owned(),
        fortran_order,
        shape: shape.to_owned(),
    };
    let mut out = header.to_bytes()?;
    let data_start = out.len();
    // `len` elements already exist in memory, so this cannot overflow.
    out.resize(data_start + len * dtype.width(), 0);
    write_data(&mut out[data_start..]);
    debug!(
        "encoded {} array of shape {:?} into {} bytes",
        dtype,
        shape,
        out.len()
    );
    Ok(out)
}

/// Encodes `data` with the given shape and order flag.
///
/// The elements are written in their existing order.
pub fn encode_slice<A: WritableElement>(
    shape: &[usize],
    fortran_order: bool,
    data: &[A],
) -> Result<Vec<u8>, WriteNpyError> {
    encode_with(A::dtype(), shape, fortran_order, data.len(), |out| {
        A::write_slice(data, out)
    })
}

/// Encodes raw little-endian element bytes whose element type is given by its
/// `descr` tag.
///
/// Returns [`WriteNpyError::UnsupportedType`] if `descr` is not one of the
/// supported tags.
pub fn encode_raw(
    descr: &str,
    shape: &[usize],
    fortran_order: bool,
    bytes: &[u8],
) -> Result<Vec<u8>, WriteNpyError> {
    let dtype = DType::from_descr(descr)?;
    let width = dtype.width();
    if bytes.len() % width != 0 {
        return Err(ShapeMismatchError {
            shape: shape.to_owned(),
            len: bytes.len() / width,
        }
        .into());
    }
    encode_with(dtype, shape, fortran_order, bytes.len() / width, |out| {
        out.copy_from_slice(bytes)
    })
}

/// Encodes an array into a new `.npy` buffer.
///
/// The header is padded so that the data starts at a multiple of 64 bytes.
pub fn to_buffer(array: &NpyArray<'_>) -> Result<Vec<u8>, WriteNpyError> {
    with_elems!(&array.data, elems => encode_slice(&array.shape, array.fortran_order, &**elems))
}
