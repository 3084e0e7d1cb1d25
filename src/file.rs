//! Whole-file persistence on top of the buffer codec.

use crate::{from_buffer, to_buffer, NpyArray, ReadNpyError, WriteNpyError};
use log::debug;
use std::fs;
use std::path::Path;

/// Reads the `.npy` file at `path` and decodes it.
///
/// The whole file is read into memory first. Filesystem failures are
/// reported as [`ReadNpyError::Io`].
///
/// # Example
///
/// ```no_run
/// use npy_codec::{load, ReadNpyError};
///
/// # fn example() -> Result<(), ReadNpyError> {
/// let arr = load("array.npy")?;
/// println!("{} array of shape {:?}", arr.dtype(), arr.shape());
/// # Ok(())
/// # }
/// ```
pub fn load<P: AsRef<Path>>(path: P) -> Result<NpyArray<'static>, ReadNpyError> {
    let path = path.as_ref();
    let bytes = fs::read(path)?;
    debug!("read {} bytes from {}", bytes.len(), path.display());
    Ok(from_buffer(&bytes)?.into_owned())
}

/// Encodes `array` and writes it to `path`, replacing any existing file.
///
/// Nothing is written if encoding fails.
pub fn save<P: AsRef<Path>>(path: P, array: &NpyArray<'_>) -> Result<(), WriteNpyError> {
    let path = path.as_ref();
    let bytes = to_buffer(array)?;
    fs::write(path, &bytes)?;
    debug!("wrote {} bytes to {}", bytes.len(), path.display());
    Ok(())
}
